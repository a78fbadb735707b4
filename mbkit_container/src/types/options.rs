use mbkit_core::TileScheme;

/// How a directory pyramid is read by the importer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
	pub scheme: TileScheme,
	/// extension of tile files, e.g. `png`
	pub format: String,
}

impl Default for ImportOptions {
	fn default() -> Self {
		ImportOptions {
			scheme: TileScheme::Tms,
			format: String::from("png"),
		}
	}
}

/// How tiles, grids and metadata are laid out by the exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
	pub scheme: TileScheme,
	/// extension of tile files; a `format` metadata entry takes precedence
	pub format: String,
	/// JSONP callback for grid files
	pub callback: Option<String>,
}

impl Default for ExportOptions {
	fn default() -> Self {
		ExportOptions {
			scheme: TileScheme::Tms,
			format: String::from("png"),
			callback: None,
		}
	}
}
