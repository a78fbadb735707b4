//! Read a directory pyramid into a raw MBTiles container.
//!
//! The directory is walked exactly two levels deep (zoom, then column or row) and every file in
//! those leaf directories is considered:
//!
//! - `{base}.{format}` becomes a row in `tiles`
//! - `{base}.grid.json` becomes a row in `grids` plus its `grid_data` rows
//! - everything else is ignored
//!
//! A `metadata.json` at the root is copied into `metadata`.

use super::{grid::encode_grid, mbtiles::MBTilesConnection};
use crate::{ImportOptions, ImportReport, TilesRuntime};
use anyhow::{Context, Result, bail, ensure};
use mbkit_core::{TileCoord, TileScheme};
use mbkit_derive::context;
use rusqlite::{Transaction, params};
use serde_json::Value;
use std::{
	fs::{self, DirEntry},
	path::{Path, PathBuf},
};

const GRID_EXTENSION: &str = "grid.json";

struct LeafFile {
	zoom_token: String,
	dir_token: String,
	base: String,
	extension: String,
	path: PathBuf,
}

/// Import all tiles, grids and metadata below `source_dir` into the container at `container_path`.
///
/// The container is created if needed. All rows are written in one transaction, followed by
/// `ANALYZE` and `VACUUM`.
#[context("importing {:?} into {:?}", source_dir, container_path)]
pub fn import_directory(
	source_dir: &Path,
	container_path: &Path,
	options: &ImportOptions,
	runtime: &TilesRuntime,
) -> Result<ImportReport> {
	ensure!(source_dir.is_dir(), "source {source_dir:?} is not a directory");
	if options.scheme == TileScheme::Wms {
		bail!("the wms scheme can only be used for export");
	}

	let mut connection = MBTilesConnection::open(container_path)?;
	connection.setup_raw_schema()?;

	runtime.step(format!(
		"importing {source_dir:?} with scheme {} and format {}",
		options.scheme, options.format
	));

	let files = collect_leaf_files(source_dir, options.scheme, runtime)?;
	let tile_count = files.iter().filter(|f| f.extension == options.format).count();
	let progress = runtime.create_progress("importing tiles", tile_count as u64);

	let mut report = ImportReport::default();
	let transaction = connection.transaction()?;
	import_metadata(&transaction, source_dir, runtime)?;

	for file in files {
		if file.extension == options.format {
			let coord = options.scheme.resolve(&file.zoom_token, &file.dir_token, &file.base)?;
			let data = fs::read(&file.path).with_context(|| format!("reading tile {:?}", file.path))?;
			log::trace!("read tile {coord:?} from {:?}", file.path);
			insert_tile(&transaction, &coord, &data)?;
			report.tiles_written += 1;
			progress.inc(1);
		} else if file.extension == GRID_EXTENSION {
			let coord = options.scheme.resolve(&file.zoom_token, &file.dir_token, &file.base)?;
			let text = fs::read_to_string(&file.path).with_context(|| format!("reading grid {:?}", file.path))?;
			log::trace!("read grid {coord:?} from {:?}", file.path);
			insert_grid(&transaction, &coord, &text).with_context(|| format!("importing grid {:?}", file.path))?;
			report.grids_written += 1;
		}
	}

	transaction.commit()?;
	progress.finish();

	log::debug!("tiles and grids inserted, optimizing");
	connection.optimize()?;
	connection.close()?;

	runtime.step(format!(
		"imported {} tiles and {} grids",
		report.tiles_written, report.grids_written
	));
	Ok(report)
}

fn import_metadata(transaction: &Transaction, source_dir: &Path, runtime: &TilesRuntime) -> Result<()> {
	let path = source_dir.join("metadata.json");
	if !path.is_file() {
		runtime.warn(format!("metadata.json not found in {source_dir:?}"));
		return Ok(());
	}

	let text = fs::read_to_string(&path).with_context(|| format!("reading {path:?}"))?;
	let json: Value = serde_json::from_str(&text).with_context(|| format!("parsing {path:?}"))?;
	let Value::Object(entries) = json else {
		bail!("{path:?} does not contain a JSON object");
	};

	let mut statement = transaction.prepare("INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)")?;
	for (name, value) in entries {
		let value = match value {
			Value::String(text) => text,
			other => other.to_string(),
		};
		statement.execute(params![name, value])?;
	}
	Ok(())
}

fn insert_tile(transaction: &Transaction, coord: &TileCoord, data: &[u8]) -> Result<()> {
	transaction
		.prepare_cached("INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)")?
		.execute(params![coord.zoom, coord.column, coord.row, data])
		.with_context(|| format!("inserting tile {coord:?}"))?;
	Ok(())
}

fn insert_grid(transaction: &Transaction, coord: &TileCoord, text: &str) -> Result<()> {
	let record = encode_grid(text)?;
	transaction
		.prepare_cached("INSERT INTO grids (zoom_level, tile_column, tile_row, grid) VALUES (?1, ?2, ?3, ?4)")?
		.execute(params![coord.zoom, coord.column, coord.row, record.envelope.as_slice()])?;

	let mut statement = transaction.prepare_cached(
		"INSERT INTO grid_data (zoom_level, tile_column, tile_row, key_name, key_json) VALUES (?1, ?2, ?3, ?4, ?5)",
	)?;
	for (key_name, key_json) in record.keys {
		statement.execute(params![coord.zoom, coord.column, coord.row, key_name, key_json])?;
	}
	Ok(())
}

/// Walk `{zoom}/{dir}/{file}` and return every leaf file that has an extension, in name order.
fn collect_leaf_files(source_dir: &Path, scheme: TileScheme, runtime: &TilesRuntime) -> Result<Vec<LeafFile>> {
	let mut files = Vec::new();

	for zoom_entry in sorted_entries(source_dir)? {
		if !zoom_entry.path().is_dir() {
			continue;
		}
		let zoom_token = zoom_entry.file_name().to_string_lossy().into_owned();
		if let Some(warning) = scheme.zoom_token_warning(&zoom_token) {
			runtime.warn(warning);
		}

		for dir_entry in sorted_entries(&zoom_entry.path())? {
			if !dir_entry.path().is_dir() {
				continue;
			}
			let dir_token = dir_entry.file_name().to_string_lossy().into_owned();

			for file_entry in sorted_entries(&dir_entry.path())? {
				let path = file_entry.path();
				if !path.is_file() {
					continue;
				}
				let name = file_entry.file_name().to_string_lossy().into_owned();
				let Some((base, extension)) = name.split_once('.') else {
					log::trace!("ignoring {path:?} without extension");
					continue;
				};
				files.push(LeafFile {
					zoom_token: zoom_token.clone(),
					dir_token: dir_token.clone(),
					base: base.to_string(),
					extension: extension.to_string(),
					path,
				});
			}
		}
	}

	Ok(files)
}

fn sorted_entries(path: &Path) -> Result<Vec<DirEntry>> {
	let mut entries = fs::read_dir(path)
		.with_context(|| format!("reading directory {path:?}"))?
		.collect::<std::io::Result<Vec<DirEntry>>>()?;
	entries.sort_by_key(|entry| entry.file_name());
	Ok(entries)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Event;
	use assert_fs::{TempDir, prelude::*};
	use pretty_assertions::assert_eq;
	use std::sync::{Arc, Mutex};

	fn options(scheme: TileScheme) -> ImportOptions {
		ImportOptions {
			scheme,
			format: "png".to_string(),
		}
	}

	fn tiles(container: &Path) -> Result<Vec<(u8, u32, u32, Vec<u8>)>> {
		let connection = MBTilesConnection::open(container)?;
		let mut statement = connection.connection().prepare(
			"SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles ORDER BY zoom_level, tile_column, tile_row",
		)?;
		let rows = statement
			.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
			.collect::<rusqlite::Result<Vec<_>>>()?;
		Ok(rows)
	}

	fn warnings(runtime: &TilesRuntime) -> Arc<Mutex<Vec<String>>> {
		let warnings = Arc::new(Mutex::new(Vec::new()));
		let warnings_clone = warnings.clone();
		runtime.events().subscribe(move |event| {
			if let Event::Warning { message } = event {
				warnings_clone.lock().unwrap().push(message.clone());
			}
		});
		warnings
	}

	#[test]
	fn tms_layout() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/0/0/0.png").write_binary(b"PNGDATA")?;
		dir.child("tiles/1/1/0.png").write_binary(b"B")?;
		let container = dir.child("out.mbtiles");

		let report = import_directory(
			&dir.path().join("tiles"),
			container.path(),
			&options(TileScheme::Tms),
			&TilesRuntime::new_silent(),
		)?;

		assert_eq!(report, ImportReport {
			tiles_written: 2,
			grids_written: 0
		});
		assert_eq!(tiles(container.path())?, vec![
			(0, 0, 0, b"PNGDATA".to_vec()),
			(1, 1, 0, b"B".to_vec())
		]);
		Ok(())
	}

	#[test]
	fn xyz_rows_are_flipped() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/2/1/3.png").write_binary(b"T")?;
		let container = dir.child("out.mbtiles");

		import_directory(
			&dir.path().join("tiles"),
			container.path(),
			&options(TileScheme::Xyz),
			&TilesRuntime::new_silent(),
		)?;

		assert_eq!(tiles(container.path())?, vec![(2, 1, 0, b"T".to_vec())]);
		Ok(())
	}

	#[test]
	fn ags_layout() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/L01/R00000001/C00000002.png").write_binary(b"T")?;
		let container = dir.child("out.mbtiles");

		import_directory(
			&dir.path().join("tiles"),
			container.path(),
			&options(TileScheme::Ags),
			&TilesRuntime::new_silent(),
		)?;

		assert_eq!(tiles(container.path())?, vec![(1, 2, 0, b"T".to_vec())]);
		Ok(())
	}

	#[test]
	fn metadata_is_copied() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/metadata.json")
			.write_str(r#"{"name":"World","minzoom":0,"bounds":"-180,-85,180,85"}"#)?;
		dir.child("tiles/0/0/0.png").write_binary(b"T")?;
		let container = dir.child("out.mbtiles");

		import_directory(
			&dir.path().join("tiles"),
			container.path(),
			&options(TileScheme::Tms),
			&TilesRuntime::new_silent(),
		)?;

		let metadata = MBTilesConnection::open(container.path())?.metadata()?;
		assert_eq!(metadata["name"], Value::from("World"));
		assert_eq!(metadata["minzoom"], Value::from("0"));
		assert_eq!(metadata["bounds"], Value::from("-180,-85,180,85"));
		Ok(())
	}

	#[test]
	fn missing_metadata_warns() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/0/0/0.png").write_binary(b"T")?;
		let runtime = TilesRuntime::new_silent();
		let warnings = warnings(&runtime);

		import_directory(
			&dir.path().join("tiles"),
			&dir.path().join("out.mbtiles"),
			&options(TileScheme::Tms),
			&runtime,
		)?;

		let warnings = warnings.lock().unwrap();
		assert_eq!(warnings.len(), 1);
		assert!(warnings[0].starts_with("metadata.json not found"));
		Ok(())
	}

	#[test]
	fn scheme_mismatch_warns_and_continues() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/metadata.json").write_str("{}")?;
		dir.child("tiles/L01/1/0.png").write_binary(b"T")?;
		let runtime = TilesRuntime::new_silent();
		let warnings = warnings(&runtime);
		let container = dir.child("out.mbtiles");

		import_directory(&dir.path().join("tiles"), container.path(), &options(TileScheme::Tms), &runtime)?;

		assert!(warnings.lock().unwrap()[0].contains("--scheme=ags"));
		assert_eq!(tiles(container.path())?, vec![(1, 1, 0, b"T".to_vec())]);
		Ok(())
	}

	#[test]
	fn other_files_are_ignored() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/README").write_str("x")?;
		dir.child("tiles/0/notes.txt").write_str("x")?;
		dir.child("tiles/0/0/0.png").write_binary(b"T")?;
		dir.child("tiles/0/0/0.jpg").write_binary(b"J")?;
		dir.child("tiles/0/0/LICENSE").write_str("x")?;
		dir.child("tiles/0/0/sub/1.png").write_binary(b"deep")?;
		let container = dir.child("out.mbtiles");

		let report = import_directory(
			&dir.path().join("tiles"),
			container.path(),
			&options(TileScheme::Tms),
			&TilesRuntime::new_silent(),
		)?;

		assert_eq!(report.tiles_written, 1);
		assert_eq!(tiles(container.path())?, vec![(0, 0, 0, b"T".to_vec())]);
		Ok(())
	}

	#[test]
	fn grids_are_split() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/1/0/1.grid.json")
			.write_str(r#"grid({"grid":[" !"],"keys":["","7"],"data":{"7":{"name":"Lake"}}});"#)?;
		let container = dir.child("out.mbtiles");

		let report = import_directory(
			&dir.path().join("tiles"),
			container.path(),
			&options(TileScheme::Xyz),
			&TilesRuntime::new_silent(),
		)?;
		assert_eq!(report.grids_written, 1);

		let connection = MBTilesConnection::open(container.path())?;
		let row: (u8, u32, u32, String, String) = connection.connection().query_row(
			"SELECT zoom_level, tile_column, tile_row, key_name, key_json FROM grid_data",
			[],
			|row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
		)?;
		assert_eq!(row, (1, 0, 0, "7".to_string(), r#"{"name":"Lake"}"#.to_string()));
		Ok(())
	}

	#[test]
	fn grid_with_trailing_text_after_callback() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/0/0/0.grid.json")
			.write_str("grid({\"grid\":[\" \"],\"keys\":[\"\"],\"data\":{}});\n// end")?;
		let report = import_directory(
			&dir.path().join("tiles"),
			&dir.path().join("out.mbtiles"),
			&options(TileScheme::Tms),
			&TilesRuntime::new_silent(),
		)?;
		assert_eq!(report.grids_written, 1);
		Ok(())
	}

	#[test]
	fn grid_without_data_aborts() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/0/0/0.grid.json").write_str(r#"{"grid":[" !"],"keys":["","7"]}"#)?;
		let result = import_directory(
			&dir.path().join("tiles"),
			&dir.path().join("out.mbtiles"),
			&options(TileScheme::Tms),
			&TilesRuntime::new_silent(),
		);
		assert!(format!("{:#}", result.unwrap_err()).contains("grid has no 'data' member"));
		Ok(())
	}

	#[test]
	fn invalid_names_abort() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/0/zero/0.png").write_binary(b"T")?;

		let result = import_directory(
			&dir.path().join("tiles"),
			&dir.path().join("out.mbtiles"),
			&options(TileScheme::Tms),
			&TilesRuntime::new_silent(),
		);
		assert!(format!("{:#}", result.unwrap_err()).contains("'zero' is not a decimal tile index"));
		Ok(())
	}

	#[test]
	fn wms_is_rejected() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/00/000/000/000/000/000/000.png").write_binary(b"T")?;
		let result = import_directory(
			&dir.path().join("tiles"),
			&dir.path().join("out.mbtiles"),
			&options(TileScheme::Wms),
			&TilesRuntime::new_silent(),
		);
		assert!(format!("{:#}", result.unwrap_err()).contains("only be used for export"));
		Ok(())
	}

	#[test]
	fn missing_source_directory() {
		let result = import_directory(
			Path::new("/does/not/exist"),
			Path::new("/tmp/never-created.mbtiles"),
			&ImportOptions::default(),
			&TilesRuntime::new_silent(),
		);
		assert!(result.is_err());
	}
}
