mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use mbkit_container::{ConvertConfig, TilesRuntime};
use std::{
	io::IsTerminal,
	path::PathBuf,
	process::ExitCode,
};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// YAML file with default settings (scheme, format, callback, chunk_size, compress)
	#[arg(long, global = true, value_name = "FILE.yml")]
	config: Option<PathBuf>,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Import a tile directory into an MBTiles container
	Import(tools::import::Subcommand),

	/// Export an MBTiles container into a directory or archive
	Export(tools::export::Subcommand),

	/// Deduplicate the tile data of an MBTiles container
	Compact(tools::compact::Subcommand),

	/// Print the metadata of an MBTiles container as JSON
	Meta(tools::meta::Subcommand),
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	let runtime = create_runtime(&cli);
	match run(&cli, &runtime) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			runtime.error(format!("{err:?}"));
			ExitCode::FAILURE
		}
	}
}

fn create_runtime(cli: &Cli) -> TilesRuntime {
	let show_progress = cli.verbose.log_level() >= Some(log::Level::Warn) && std::io::stderr().is_terminal();
	TilesRuntime::builder().silent_progress(!show_progress).build()
}

fn run(cli: &Cli, runtime: &TilesRuntime) -> Result<()> {
	let config = match &cli.config {
		Some(path) => ConvertConfig::from_path(path)?,
		None => ConvertConfig::default(),
	};

	match &cli.command {
		Commands::Import(arguments) => tools::import::run(arguments, &config, runtime),
		Commands::Export(arguments) => tools::export::run(arguments, &config, runtime),
		Commands::Compact(arguments) => tools::compact::run(arguments, &config, runtime),
		Commands::Meta(arguments) => tools::meta::run(arguments),
	}
}
