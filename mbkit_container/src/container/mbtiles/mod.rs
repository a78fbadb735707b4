//! SQLite access for MBTiles containers.
//!
//! A container has one of two storage layouts:
//!
//! - **raw**: `tiles`, `metadata`, `grids` and `grid_data` tables, as written by the importer
//! - **compacted**: unique blobs in `images`, coordinates in `map`, and a `tiles` view joining
//!   both, as written by the [compactor](crate::compact)
//!
//! Readers (exporter, `meta`) only rely on `tiles` and `metadata`, so both layouts can be exported.

mod connection;

pub use connection::MBTilesConnection;
