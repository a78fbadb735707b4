mod blob;
mod tile_coord;
mod tile_path;
mod tile_scheme;

pub use blob::Blob;
pub use tile_coord::{TileCoord, flip_row};
pub use tile_path::TilePath;
pub use tile_scheme::TileScheme;
