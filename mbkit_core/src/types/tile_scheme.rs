//! Directory layouts of a tile pyramid and their translation to canonical coordinates.
//!
//! | scheme | layout                                   | row origin  |
//! |--------|------------------------------------------|-------------|
//! | `tms`  | `{z}/{x}/{y}.{ext}`                      | bottom-left |
//! | `xyz`  | `{z}/{x}/{y}.{ext}`                      | top-left    |
//! | `ags`  | `L{z:02}/R{y:08x}/C{x:08x}.{ext}`        | top-left    |
//! | `wms`  | `{z:02}/xxx/xxx/xxx/yyy/yyy/yyy.{ext}`   | bottom-left |
//!
//! `wms` is an export-only layout: column and row are split into three groups of three
//! decimal digits each. There is no way to import it.
//!
//! ```
//! use mbkit_core::{TileCoord, TileScheme};
//!
//! let coord = TileScheme::Ags.resolve("L01", "R00000001", "C00000002").unwrap();
//! assert_eq!(coord, TileCoord::new(1, 2, 0));
//!
//! let path = TileScheme::Xyz.format(&TileCoord::new(2, 1, 0), "png").unwrap();
//! assert_eq!(path.to_string(), "2/1/3.png");
//! ```

use super::{TileCoord, TilePath};
use anyhow::{Context, Result, bail};
#[cfg(feature = "cli")]
use clap::ValueEnum;
use mbkit_derive::context;
use serde::Deserialize;
use std::{fmt::Display, str::FromStr};

/// Directory layout used when reading or writing a tile pyramid.
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileScheme {
	/// `{z}/{x}/{y}` with rows counted from the bottom
	#[default]
	Tms,
	/// `{z}/{x}/{y}` with rows counted from the top
	Xyz,
	/// ArcGIS Server cache: `L{z}/R{hex y}/C{hex x}`
	Ags,
	/// bucketed decimal directories, export only
	Wms,
}

impl TileScheme {
	pub fn as_str(&self) -> &'static str {
		match self {
			TileScheme::Tms => "tms",
			TileScheme::Xyz => "xyz",
			TileScheme::Ags => "ags",
			TileScheme::Wms => "wms",
		}
	}

	/// Check whether a zoom directory name looks like this scheme.
	///
	/// Returns a warning message for an `L`-prefixed directory under a non-`ags` scheme
	/// and for an un-prefixed directory under `ags`. The caller is expected to log the
	/// warning and carry on; [`resolve`](Self::resolve) accepts both shapes.
	pub fn zoom_token_warning(&self, zoom_token: &str) -> Option<String> {
		let prefixed = zoom_token.starts_with(['L', 'l']);
		match (self, prefixed) {
			(TileScheme::Ags, false) => {
				Some(format!(
					"zoom directory '{zoom_token}' has no 'L' prefix; you appear to be using an ags scheme on a non-ArcGIS Server cache"
				))
			}
			(TileScheme::Ags, true) | (_, false) => None,
			(_, true) => Some(format!(
				"zoom directory '{zoom_token}' looks like an ArcGIS Server cache but the scheme is {self}; try using --scheme=ags instead"
			)),
		}
	}

	/// Parse a zoom directory name. A leading `L` is accepted under every scheme.
	#[context("parsing zoom directory '{}'", token)]
	pub fn parse_zoom(&self, token: &str) -> Result<u8> {
		let digits = token.strip_prefix(['L', 'l']).unwrap_or(token);
		Ok(digits.parse::<u8>()?)
	}

	/// Translate directory, sub-directory and file base name into a canonical coordinate.
	///
	/// For `tms`/`xyz` the sub-directory holds the column and the file the row, for `ags`
	/// it is the other way round.
	///
	/// # Errors
	/// Fails for the `wms` scheme, for tokens that are not numbers, and for `xyz`/`ags` rows
	/// that cannot be flipped at the given zoom level. `tms` values are taken literally.
	#[context("resolving '{}/{}/{}' with scheme {}", zoom_token, dir_token, file_token, self)]
	pub fn resolve(&self, zoom_token: &str, dir_token: &str, file_token: &str) -> Result<TileCoord> {
		let zoom = self.parse_zoom(zoom_token)?;
		match self {
			TileScheme::Tms => Ok(TileCoord::new(zoom, parse_decimal(dir_token)?, parse_decimal(file_token)?)),
			TileScheme::Xyz => TileCoord::new(zoom, parse_decimal(dir_token)?, parse_decimal(file_token)?).flipped(),
			TileScheme::Ags => {
				let row = parse_hex(dir_token, 'R')?;
				let column = parse_hex(file_token, 'C')?;
				TileCoord::new(zoom, column, row).flipped()
			}
			TileScheme::Wms => bail!("the wms scheme can only be used for export"),
		}
	}

	/// Build the relative directory and file name of a tile (inverse of [`resolve`](Self::resolve)).
	///
	/// `extension` is appended after a dot, e.g. `png` or `grid.json`.
	///
	/// # Errors
	/// Fails for `xyz`/`ags` when the row cannot be flipped at the coordinate's zoom level.
	pub fn format(&self, coord: &TileCoord, extension: &str) -> Result<TilePath> {
		let z = coord.zoom;
		Ok(match self {
			TileScheme::Tms => TilePath::new(
				format!("{z}/{}", coord.column),
				format!("{}.{extension}", coord.row),
			),
			TileScheme::Xyz => TilePath::new(
				format!("{z}/{}", coord.column),
				format!("{}.{extension}", coord.flipped()?.row),
			),
			TileScheme::Ags => TilePath::new(
				format!("L{z:02}/R{:08x}", coord.flipped()?.row),
				format!("C{:08x}.{extension}", coord.column),
			),
			TileScheme::Wms => {
				let [x0, x1, x2] = TileScheme::bucket(coord.column);
				let [y0, y1, y2] = TileScheme::bucket(coord.row);
				TilePath::new(format!("{z:02}/{x0}/{x1}/{x2}/{y0}/{y1}"), format!("{y2}.{extension}"))
			}
		})
	}

	/// Split a value into three zero-padded groups of three decimal digits.
	///
	/// ```
	/// use mbkit_core::TileScheme;
	/// assert_eq!(TileScheme::bucket(1234567), ["001", "234", "567"]);
	/// ```
	pub fn bucket(value: u32) -> [String; 3] {
		[
			format!("{:03}", value / 1_000_000),
			format!("{:03}", (value / 1_000) % 1_000),
			format!("{:03}", value % 1_000),
		]
	}
}

fn parse_decimal(token: &str) -> Result<u32> {
	token
		.parse::<u32>()
		.with_context(|| format!("'{token}' is not a decimal tile index"))
}

fn parse_hex(token: &str, prefix: char) -> Result<u32> {
	let digits = token
		.strip_prefix(prefix)
		.or_else(|| token.strip_prefix(prefix.to_ascii_lowercase()))
		.unwrap_or(token);
	u32::from_str_radix(digits, 16).with_context(|| format!("'{token}' is not a hexadecimal tile index"))
}

impl Display for TileScheme {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TileScheme {
	type Err = anyhow::Error;

	fn from_str(value: &str) -> Result<Self> {
		Ok(match value.to_lowercase().trim() {
			"tms" => TileScheme::Tms,
			"xyz" => TileScheme::Xyz,
			"ags" => TileScheme::Ags,
			"wms" => TileScheme::Wms,
			_ => bail!("unknown tile scheme '{value}'. Expected tms, xyz, ags or wms"),
		})
	}
}
