use anyhow::Result;
use mbkit_container::metadata_json;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// MBTiles container to read
	#[arg()]
	input_file: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	println!("{}", metadata_json(&arguments.input_file)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;

	#[test]
	fn missing_container() {
		let err = run_command(vec!["mbkit", "meta", "/does/not/exist.mbtiles"]).unwrap_err();
		assert!(format!("{err:#}").contains("does not exist"));
	}
}
