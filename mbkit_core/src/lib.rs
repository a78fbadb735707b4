//! Contains the tile coordinate, address scheme and byte helpers shared by all mbkit crates.

pub mod types;
pub use types::*;

pub mod utils;
