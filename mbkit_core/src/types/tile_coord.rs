//! Canonical tile coordinates as stored in an MBTiles container.
//!
//! MBTiles stores rows in TMS orientation: row `0` is the southernmost row. Directory
//! layouts that count rows from the top (XYZ, ArcGIS caches) are converted with
//! [`flip_row`], which is its own inverse.
//!
//! Column and row values are kept literally. Only flipping a row requires it to lie inside
//! the zoom level.
//!
//! ```
//! use mbkit_core::{TileCoord, flip_row};
//!
//! let coord = TileCoord::new(2, 1, 3);
//! assert_eq!(coord.flipped().unwrap().row, 0);
//! assert_eq!(flip_row(2, flip_row(2, 3)), 3);
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// Flip a row between bottom-left (TMS) and top-left (XYZ) origin at the given zoom level.
///
/// `row` must be below `2^zoom`; use [`TileCoord::flipped`] for unchecked input.
#[must_use]
pub fn flip_row(zoom: u8, row: u32) -> u32 {
	max_index(zoom) - row
}

fn max_index(zoom: u8) -> u32 {
	((1u64 << zoom.min(31)) - 1) as u32
}

/// A tile address: zoom level, column and row in canonical (TMS) orientation.
#[derive(Eq, PartialEq, Clone, Hash, Copy, PartialOrd, Ord)]
pub struct TileCoord {
	pub zoom: u8,
	pub column: u32,
	pub row: u32,
}

impl TileCoord {
	/// Create a coordinate. Values are not checked against the zoom level.
	#[must_use]
	pub fn new(zoom: u8, column: u32, row: u32) -> TileCoord {
		TileCoord { zoom, column, row }
	}

	/// Return the same tile with its row counted from the opposite edge.
	///
	/// # Errors
	/// Returns an error if `zoom` > 31 or the row is `>= 2^zoom`, because such a row has no
	/// mirrored counterpart.
	pub fn flipped(&self) -> Result<TileCoord> {
		ensure!(self.zoom <= 31, "zoom ({}) must be <= 31 to flip a row", self.zoom);
		ensure!(
			self.row <= max_index(self.zoom),
			"row ({}) out of bounds for zoom {}",
			self.row,
			self.zoom
		);
		Ok(TileCoord {
			zoom: self.zoom,
			column: self.column,
			row: flip_row(self.zoom, self.row),
		})
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord(z:{}, col:{}, row:{})", self.zoom, self.column, self.row)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 0)]
	#[case(1, 1)]
	#[case(2, 3)]
	#[case(12, 4095)]
	#[case(31, 2147483647)]
	fn max_index_per_zoom(#[case] zoom: u8, #[case] expected: u32) {
		assert_eq!(max_index(zoom), expected);
	}

	#[test]
	fn flip_is_an_involution() {
		for zoom in 0..=10u8 {
			for row in 0..(1u32 << zoom) {
				assert_eq!(flip_row(zoom, flip_row(zoom, row)), row);
			}
		}
		assert_eq!(flip_row(31, 0), 2147483647);
		assert_eq!(flip_row(31, 2147483647), 0);
	}

	#[test]
	fn flip_examples() {
		assert_eq!(flip_row(0, 0), 0);
		assert_eq!(flip_row(1, 1), 0);
		assert_eq!(flip_row(2, 3), 0);
		assert_eq!(flip_row(3, 2), 5);
	}

	#[test]
	fn new_keeps_values_literally() {
		let coord = TileCoord::new(1, 2, 0);
		assert_eq!((coord.zoom, coord.column, coord.row), (1, 2, 0));
		let coord = TileCoord::new(0, 5, 7);
		assert_eq!((coord.zoom, coord.column, coord.row), (0, 5, 7));
	}

	#[test]
	fn flipped_checks_row_bounds() {
		assert_eq!(TileCoord::new(3, 99, 7).flipped().unwrap(), TileCoord::new(3, 99, 0));
		assert_eq!(
			TileCoord::new(3, 0, 8).flipped().unwrap_err().to_string(),
			"row (8) out of bounds for zoom 3"
		);
		assert_eq!(
			TileCoord::new(32, 0, 0).flipped().unwrap_err().to_string(),
			"zoom (32) must be <= 31 to flip a row"
		);
	}

	#[test]
	fn flipped_keeps_column() {
		let coord = TileCoord::new(4, 5, 2);
		assert_eq!(coord.flipped().unwrap(), TileCoord::new(4, 5, 13));
		assert_eq!(coord.flipped().unwrap().flipped().unwrap(), coord);
	}

	#[test]
	fn debug_format() {
		let coord = TileCoord::new(2, 1, 0);
		assert_eq!(format!("{coord:?}"), "TileCoord(z:2, col:1, row:0)");
	}
}
