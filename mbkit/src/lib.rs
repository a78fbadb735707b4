//! Convert map tile pyramids between directories and MBTiles containers.
//!
//! This crate bundles the `mbkit` command line tool and re-exports the library crates:
//!
//! - [`mbkit_core`]: coordinates, directory schemes, compression helpers
//! - [`mbkit_container`]: importer, exporter, compactor and output sinks

pub use mbkit_container::*;
pub use mbkit_core::{Blob, TileCoord, TilePath, TileScheme, flip_row, utils};
