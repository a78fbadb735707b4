pub mod compact;
pub mod export;
pub mod grid;
pub mod import;
pub mod mbtiles;
pub mod sink;

pub use compact::{compact, compact_connection};
pub use export::{export_to_path, export_to_sink, metadata_json};
pub use import::import_directory;
pub use mbtiles::MBTilesConnection;
pub use sink::{SinkKind, TileSink, open_sink};
