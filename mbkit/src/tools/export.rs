use anyhow::Result;
use mbkit_container::{ConvertConfig, ExportOptions, TilesRuntime, export_to_path};
use mbkit_core::TileScheme;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// MBTiles container to read
	#[arg()]
	input_file: PathBuf,

	/// destination: *.zip, *.tar, *.tar.gz, *.tgz, *.tar.bz2, *.tbz2 or a directory
	#[arg()]
	output: PathBuf,

	/// directory layout to write [default: tms]
	#[arg(long, value_enum, display_order = 1)]
	scheme: Option<TileScheme>,

	/// extension of tile files, unless the container defines a format [default: png]
	#[arg(long, value_name = "EXTENSION", display_order = 1)]
	format: Option<String>,

	/// wrap grid files in a JSONP callback; "", "false" and "null" disable wrapping
	#[arg(long, value_name = "NAME", display_order = 2)]
	callback: Option<String>,
}

impl Subcommand {
	fn options(&self, config: &ConvertConfig) -> ExportOptions {
		let mut options = config.export_options();
		if let Some(scheme) = self.scheme {
			options.scheme = scheme;
		}
		if let Some(format) = &self.format {
			options.format.clone_from(format);
		}
		if self.callback.is_some() {
			options.callback.clone_from(&self.callback);
		}
		options
	}
}

pub fn run(arguments: &Subcommand, config: &ConvertConfig, runtime: &TilesRuntime) -> Result<()> {
	log::info!("export {:?} to {:?}", arguments.input_file, arguments.output);

	let report = export_to_path(&arguments.input_file, &arguments.output, &arguments.options(config), runtime)?;
	log::info!(
		"exported {} tiles and {} grids, skipped {} empty tiles",
		report.tiles_written,
		report.grids_written,
		report.tiles_skipped
	);
	Ok(())
}
