//! Conversion engine between tile directories and MBTiles containers.
//!
//! - [`import_directory`] reads a `{z}/{x}/{y}` style pyramid (or an ArcGIS cache) into a container
//! - [`export_to_path`] writes a container into a directory, zip or tar archive
//! - [`compact`] deduplicates tile data inside a container
//!
//! Every operation takes a [`TilesRuntime`] that receives progress, step and warning events.
//!
//! ```no_run
//! use mbkit_container::{ExportOptions, ImportOptions, TilesRuntime, compact, export_to_path, import_directory};
//! use std::path::Path;
//!
//! let runtime = TilesRuntime::new();
//! let container = Path::new("world.mbtiles");
//! import_directory(Path::new("tiles"), container, &ImportOptions::default(), &runtime).unwrap();
//! compact(container, 256, &runtime).unwrap();
//! export_to_path(container, Path::new("tiles.zip"), &ExportOptions::default(), &runtime).unwrap();
//! ```

mod container;
pub use container::*;

mod progress;
pub use progress::*;

mod runtime;
pub use runtime::*;

mod types;
pub use types::*;
