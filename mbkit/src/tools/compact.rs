use anyhow::Result;
use mbkit_container::{ConvertConfig, TilesRuntime, compact};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// MBTiles container to compact in place
	#[arg()]
	input_file: PathBuf,

	/// tiles per deduplication window; identical tiles in different windows are stored twice [default: 256]
	#[arg(long, value_name = "int")]
	chunk_size: Option<u64>,
}

pub fn run(arguments: &Subcommand, config: &ConvertConfig, runtime: &TilesRuntime) -> Result<()> {
	let chunk_size = arguments.chunk_size.unwrap_or(config.chunk_size);
	log::info!("compact {:?} with chunk size {chunk_size}", arguments.input_file);

	let report = compact(&arguments.input_file, chunk_size, runtime)?;
	log::info!(
		"{} tiles, {} unique blobs, {} duplicates",
		report.total_tiles,
		report.unique_blobs,
		report.overlapping
	);
	Ok(())
}
