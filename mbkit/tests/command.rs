use predicates::str;
use rstest::rstest;
use test_utilities::{BINARY_NAME, mbkit_cmd};

#[test]
fn command() -> Result<(), Box<dyn std::error::Error>> {
	mbkit_cmd()
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
	Ok(())
}

#[rstest]
#[case("import", "[OPTIONS] <INPUT_DIRECTORY> <OUTPUT_FILE>")]
#[case("export", "[OPTIONS] <INPUT_FILE> <OUTPUT>")]
#[case("compact", "[OPTIONS] <INPUT_FILE>")]
#[case("meta", "[OPTIONS] <INPUT_FILE>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) -> Result<(), Box<dyn std::error::Error>> {
	mbkit_cmd()
		.arg(sub_command)
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command} {usage}")));
	Ok(())
}

#[test]
fn unknown_scheme() -> Result<(), Box<dyn std::error::Error>> {
	mbkit_cmd()
		.args(["import", "in", "out.mbtiles", "--scheme", "google"])
		.assert()
		.failure()
		.code(2)
		.stderr(str::contains("invalid value 'google'"));
	Ok(())
}
