use anyhow::Result;
use mbkit_container::{ConvertConfig, ImportOptions, TilesRuntime, compact, import_directory};
use mbkit_core::TileScheme;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// directory containing the tile pyramid
	#[arg()]
	input_directory: PathBuf,

	/// MBTiles container to create or extend
	#[arg()]
	output_file: PathBuf,

	/// directory layout of the pyramid [default: tms]
	#[arg(long, value_enum, display_order = 1)]
	scheme: Option<TileScheme>,

	/// extension of tile files [default: png]
	#[arg(long, value_name = "EXTENSION", display_order = 1)]
	format: Option<String>,

	/// deduplicate tile data after importing
	#[arg(long, display_order = 2)]
	compress: bool,

	/// tiles per deduplication window [default: 256]
	#[arg(long, value_name = "int", display_order = 2)]
	chunk_size: Option<u64>,
}

impl Subcommand {
	fn options(&self, config: &ConvertConfig) -> ImportOptions {
		let mut options = config.import_options();
		if let Some(scheme) = self.scheme {
			options.scheme = scheme;
		}
		if let Some(format) = &self.format {
			options.format.clone_from(format);
		}
		options
	}
}

pub fn run(arguments: &Subcommand, config: &ConvertConfig, runtime: &TilesRuntime) -> Result<()> {
	log::info!("import {:?} into {:?}", arguments.input_directory, arguments.output_file);

	let options = arguments.options(config);
	let report = import_directory(&arguments.input_directory, &arguments.output_file, &options, runtime)?;
	log::info!(
		"imported {} tiles and {} grids",
		report.tiles_written,
		report.grids_written
	);

	if arguments.compress || config.compress {
		let chunk_size = arguments.chunk_size.unwrap_or(config.chunk_size);
		let report = compact(&arguments.output_file, chunk_size, runtime)?;
		log::info!(
			"stored {} tiles as {} unique blobs",
			report.total_tiles,
			report.unique_blobs
		);
	}

	Ok(())
}
