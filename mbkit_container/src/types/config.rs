use crate::{ExportOptions, ImportOptions};
use anyhow::Result;
use mbkit_core::TileScheme;
use mbkit_derive::context;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Default number of tiles loaded per compaction window
pub const DEFAULT_CHUNK_SIZE: u64 = 256;

/// Conversion settings, usually loaded from a YAML file and overridden by command-line flags.
///
/// ```yaml
/// scheme: xyz
/// format: jpg
/// callback: grid
/// chunk_size: 1024
/// compress: true
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
	/// Directory layout of the tile pyramid
	pub scheme: TileScheme,

	/// Tile file extension, e.g. `png`, `jpg` or `pbf`
	pub format: String,

	/// JSONP callback name used when exporting grids
	pub callback: Option<String>,

	/// Tiles per compaction window
	pub chunk_size: u64,

	/// Run the compactor right after an import
	pub compress: bool,
}

impl Default for ConvertConfig {
	fn default() -> Self {
		ConvertConfig {
			scheme: TileScheme::Tms,
			format: String::from("png"),
			callback: None,
			chunk_size: DEFAULT_CHUNK_SIZE,
			compress: false,
		}
	}
}

impl ConvertConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	#[context("reading config file {:?}", path)]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		ConvertConfig::from_reader(BufReader::new(file))
	}

	pub fn import_options(&self) -> ImportOptions {
		ImportOptions {
			scheme: self.scheme,
			format: self.format.clone(),
		}
	}

	pub fn export_options(&self) -> ExportOptions {
		ExportOptions {
			scheme: self.scheme,
			format: self.format.clone(),
			callback: self.callback.clone(),
		}
	}
}
