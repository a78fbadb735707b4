//! Write the content of an MBTiles container into a directory or archive.

use super::{
	grid::decode_grid,
	mbtiles::MBTilesConnection,
	sink::{TileSink, open_sink},
};
use crate::{ExportOptions, ExportReport, TilesRuntime};
use anyhow::{Context, Result, ensure};
use mbkit_core::{
	Blob, TileCoord,
	utils::{decompress_gzip, wrap_callback},
};
use mbkit_derive::context;
use serde::Serialize;
use serde_json::{Map, Value, json, ser::PrettyFormatter};
use std::path::Path;

/// Export into a destination chosen by its suffix (directory, zip or tar archive) and finish it.
#[context("exporting {:?} to {:?}", container_path, destination)]
pub fn export_to_path(
	container_path: &Path,
	destination: &Path,
	options: &ExportOptions,
	runtime: &TilesRuntime,
) -> Result<ExportReport> {
	ensure!(container_path.is_file(), "container {container_path:?} does not exist");
	let mut sink = open_sink(destination)?;
	let report = export_to_sink(container_path, sink.as_mut(), options, runtime)?;
	sink.finish()?;
	Ok(report)
}

/// Write metadata, tiles and grids of a container into `sink`.
///
/// The caller is responsible for finishing the sink.
#[context("exporting {:?}", container_path)]
pub fn export_to_sink(
	container_path: &Path,
	sink: &mut dyn TileSink,
	options: &ExportOptions,
	runtime: &TilesRuntime,
) -> Result<ExportReport> {
	let connection = MBTilesConnection::open_existing(container_path)?;
	let metadata = connection.metadata()?;

	sink.write("", "metadata.json", to_json_indented(&metadata)?.as_bytes())?;

	let format = match metadata.get("format") {
		Some(Value::String(format)) => format.clone(),
		_ => options.format.clone(),
	};

	if let Some(formatter) = metadata.get("formatter").filter(|value| is_truthy(value)) {
		let layer = json!({ "formatter": formatter });
		sink.write("", "layer.json", serde_json::to_string(&layer)?.as_bytes())?;
	}

	runtime.step(format!("exporting tiles with scheme {} and format {format}", options.scheme));
	let mut report = ExportReport::default();
	export_tiles(&connection, sink, options, &format, runtime, &mut report)?;

	if connection.has_table("grids")? {
		export_grids(&connection, sink, options, runtime, &mut report)?;
	} else {
		log::debug!("no grids table in {:?}", connection.name());
	}

	connection.close()?;
	runtime.step(format!(
		"exported {} tiles ({} empty skipped) and {} grids",
		report.tiles_written, report.tiles_skipped, report.grids_written
	));
	Ok(report)
}

fn export_tiles(
	connection: &MBTilesConnection,
	sink: &mut dyn TileSink,
	options: &ExportOptions,
	format: &str,
	runtime: &TilesRuntime,
	report: &mut ExportReport,
) -> Result<()> {
	let total = connection.count_tiles()?;
	let progress = runtime.create_progress("exporting tiles", total);

	let mut statement = connection
		.connection()
		.prepare("SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles")?;
	let mut rows = statement.query([])?;

	while let Some(row) = rows.next()? {
		let coord = TileCoord::new(row.get(0)?, row.get(1)?, row.get(2)?);
		let data: Option<Vec<u8>> = row.get(3)?;
		let data = Blob::from(data.unwrap_or_default());

		if data.is_empty() {
			log::trace!("skipping empty tile {coord:?}");
			report.tiles_skipped += 1;
			progress.set_max_value(total - report.tiles_skipped);
			continue;
		}

		let data = if format == "pbf" {
			decompress_gzip(&data).with_context(|| format!("unpacking vector tile {coord:?}"))?
		} else {
			data
		};

		let path = options.scheme.format(&coord, format)?;
		sink.write(&path.directory, &path.file_name, data.as_slice())?;
		report.tiles_written += 1;
		progress.inc(1);
	}

	progress.finish();
	Ok(())
}

fn export_grids(
	connection: &MBTilesConnection,
	sink: &mut dyn TileSink,
	options: &ExportOptions,
	runtime: &TilesRuntime,
	report: &mut ExportReport,
) -> Result<()> {
	let db = connection.connection();
	let total: i64 = db.query_row("SELECT count(zoom_level) FROM grids", [], |row| row.get(0))?;
	let progress = runtime.create_progress("exporting grids", total as u64);

	let has_grid_data = connection.has_table("grid_data")?;
	let mut data_statement = if has_grid_data {
		Some(db.prepare(
			"SELECT key_name, key_json FROM grid_data WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
		)?)
	} else {
		None
	};

	let mut statement = db.prepare("SELECT zoom_level, tile_column, tile_row, grid FROM grids")?;
	let mut rows = statement.query([])?;

	while let Some(row) = rows.next()? {
		let coord = TileCoord::new(row.get(0)?, row.get(1)?, row.get(2)?);
		let envelope = Blob::from(row.get::<_, Vec<u8>>(3)?);

		let keys = match data_statement.as_mut() {
			Some(statement) => statement
				.query_map([u32::from(coord.zoom), coord.column, coord.row], |row| {
					Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
				})?
				.collect::<rusqlite::Result<Vec<_>>>()?,
			None => Vec::new(),
		};

		let grid = decode_grid(&envelope, keys).with_context(|| format!("exporting grid {coord:?}"))?;
		let text = wrap_callback(&serde_json::to_string(&grid)?, options.callback.as_deref());
		let path = options.scheme.format(&coord, "grid.json")?;
		sink.write(&path.directory, &path.file_name, text.as_bytes())?;
		report.grids_written += 1;
		progress.inc(1);
	}

	progress.finish();
	Ok(())
}

/// Flattened metadata of a container as pretty-printed JSON.
#[context("reading metadata of {:?}", container_path)]
pub fn metadata_json(container_path: &Path) -> Result<String> {
	let connection = MBTilesConnection::open_existing(container_path)?;
	let metadata = connection.metadata()?;
	connection.close()?;
	Ok(serde_json::to_string_pretty(&metadata)?)
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::String(text) => !text.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(members) => !members.is_empty(),
		Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
	}
}

fn to_json_indented(metadata: &Map<String, Value>) -> Result<String> {
	let mut buffer = Vec::new();
	let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
	metadata.serialize(&mut serializer)?;
	Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ImportOptions;
	use crate::import::import_directory;
	use assert_fs::{TempDir, prelude::*};
	use mbkit_core::{TileScheme, utils::compress_gzip};
	use pretty_assertions::assert_eq;
	use rusqlite::params;
	use std::collections::BTreeMap;

	/// In-memory sink recording every written file
	#[derive(Default)]
	struct MemorySink {
		files: BTreeMap<String, Vec<u8>>,
	}

	impl TileSink for MemorySink {
		fn write(&mut self, directory: &str, file_name: &str, data: &[u8]) -> Result<()> {
			let name = if directory.is_empty() {
				file_name.to_string()
			} else {
				format!("{directory}/{file_name}")
			};
			self.files.insert(name, data.to_vec());
			Ok(())
		}

		fn finish(self: Box<Self>) -> Result<()> {
			Ok(())
		}
	}

	fn container(dir: &TempDir, setup: &str) -> Result<std::path::PathBuf> {
		let path = dir.path().join("test.mbtiles");
		let connection = MBTilesConnection::open(&path)?;
		connection.setup_raw_schema()?;
		connection.connection().execute_batch(setup)?;
		connection.close()?;
		Ok(path)
	}

	fn export(path: &Path, options: &ExportOptions) -> Result<(MemorySink, ExportReport)> {
		let mut sink = MemorySink::default();
		let report = export_to_sink(path, &mut sink, options, &TilesRuntime::new_silent())?;
		Ok((sink, report))
	}

	fn text(sink: &MemorySink, name: &str) -> String {
		String::from_utf8(sink.files[name].clone()).unwrap()
	}

	#[test]
	fn tiles_and_metadata() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(
			&dir,
			"INSERT INTO metadata VALUES ('name', 'demo');
			INSERT INTO tiles VALUES (0, 0, 0, x'504E47');
			INSERT INTO tiles VALUES (2, 1, 0, x'41');",
		)?;

		let (sink, report) = export(&path, &ExportOptions::default())?;
		assert_eq!(report, ExportReport {
			tiles_written: 2,
			tiles_skipped: 0,
			grids_written: 0
		});
		assert_eq!(sink.files.keys().collect::<Vec<_>>(), vec!["0/0/0.png", "2/1/0.png", "metadata.json"]);
		assert_eq!(sink.files["0/0/0.png"], b"PNG");
		assert_eq!(text(&sink, "metadata.json"), "{\n    \"name\": \"demo\"\n}");
		Ok(())
	}

	#[test]
	fn xyz_flips_rows() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(&dir, "INSERT INTO tiles VALUES (2, 1, 0, x'41');")?;
		let options = ExportOptions {
			scheme: TileScheme::Xyz,
			..ExportOptions::default()
		};
		let (sink, _) = export(&path, &options)?;
		assert!(sink.files.contains_key("2/1/3.png"));
		Ok(())
	}

	#[test]
	fn out_of_range_rows_only_fail_when_flipped() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(&dir, "INSERT INTO tiles VALUES (0, 5, 7, x'41');")?;

		let (sink, report) = export(&path, &ExportOptions::default())?;
		assert_eq!(report.tiles_written, 1);
		assert!(sink.files.contains_key("0/5/7.png"));

		let options = ExportOptions {
			scheme: TileScheme::Xyz,
			..ExportOptions::default()
		};
		let err = export(&path, &options).err().unwrap();
		assert!(format!("{err:#}").contains("row (7) out of bounds for zoom 0"));
		Ok(())
	}

	#[test]
	fn wms_buckets() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(&dir, "INSERT INTO tiles VALUES (21, 1234567, 2001, x'41');")?;
		let options = ExportOptions {
			scheme: TileScheme::Wms,
			..ExportOptions::default()
		};
		let (sink, _) = export(&path, &options)?;
		assert!(sink.files.contains_key("21/001/234/567/000/002/001.png"));
		Ok(())
	}

	#[test]
	fn empty_tiles_are_skipped() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(
			&dir,
			"INSERT INTO tiles VALUES (1, 0, 0, x'');
			INSERT INTO tiles VALUES (1, 0, 1, x'41');
			INSERT INTO tiles VALUES (1, 1, 1, NULL);",
		)?;

		let (sink, report) = export(&path, &ExportOptions::default())?;
		assert_eq!(report.tiles_written, 1);
		assert_eq!(report.tiles_skipped, 2);
		assert!(sink.files.contains_key("1/0/1.png"));
		assert!(!sink.files.contains_key("1/0/0.png"));
		assert!(!sink.files.contains_key("1/1/1.png"));
		Ok(())
	}

	#[test]
	fn metadata_format_wins_and_pbf_is_unpacked() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(&dir, "INSERT INTO metadata VALUES ('format', 'pbf');")?;
		let packed = compress_gzip(&Blob::from("vector tile"))?;
		let connection = MBTilesConnection::open(&path)?;
		connection.connection().execute(
			"INSERT INTO tiles VALUES (0, 0, 0, ?1)",
			params![packed.as_slice()],
		)?;
		connection.close()?;

		let (sink, _) = export(&path, &ExportOptions::default())?;
		assert_eq!(sink.files["0/0/0.pbf"], b"vector tile");
		Ok(())
	}

	#[test]
	fn formatter_writes_layer_json() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(
			&dir,
			"INSERT INTO metadata VALUES ('formatter', 'function(o,d){return d.name}');",
		)?;
		let (sink, _) = export(&path, &ExportOptions::default())?;
		let layer: Value = serde_json::from_slice(&sink.files["layer.json"])?;
		assert_eq!(layer, json!({"formatter": "function(o,d){return d.name}"}));
		Ok(())
	}

	#[test]
	fn no_layer_json_without_formatter() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(&dir, "INSERT INTO metadata VALUES ('formatter', '');")?;
		let (sink, _) = export(&path, &ExportOptions::default())?;
		assert!(!sink.files.contains_key("layer.json"));
		Ok(())
	}

	#[test]
	fn grids_with_and_without_callback() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("src/1/0/1.grid.json")
			.write_str(r#"{"grid":[" !"],"keys":["","7"],"data":{"7":{"name":"Lake"}}}"#)?;
		let path = dir.path().join("grids.mbtiles");
		let import_options = ImportOptions {
			scheme: TileScheme::Xyz,
			format: "png".to_string(),
		};
		import_directory(&dir.path().join("src"), &path, &import_options, &TilesRuntime::new_silent())?;

		let mut options = ExportOptions {
			scheme: TileScheme::Xyz,
			..ExportOptions::default()
		};
		for callback in [None, Some(""), Some("false"), Some("null")] {
			options.callback = callback.map(String::from);
			let (sink, report) = export(&path, &options)?;
			assert_eq!(report.grids_written, 1);
			let grid: Value = serde_json::from_slice(&sink.files["1/0/1.grid.json"])?;
			assert_eq!(grid["data"]["7"]["name"], "Lake");
		}

		options.callback = Some("cb".to_string());
		let (sink, _) = export(&path, &options)?;
		let wrapped = text(&sink, "1/0/1.grid.json");
		assert!(wrapped.starts_with("cb({"));
		assert!(wrapped.ends_with("});"));
		Ok(())
	}

	#[test]
	fn missing_grids_table_is_fine() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(&dir, "DROP TABLE grids; DROP TABLE grid_data; INSERT INTO tiles VALUES (0, 0, 0, x'41');")?;
		let (_, report) = export(&path, &ExportOptions::default())?;
		assert_eq!(report.grids_written, 0);
		assert_eq!(report.tiles_written, 1);
		Ok(())
	}

	#[test]
	fn missing_container() -> Result<()> {
		let dir = TempDir::new()?;
		let destination = dir.path().join("out");
		let result = export_to_path(
			&dir.path().join("missing.mbtiles"),
			&destination,
			&ExportOptions::default(),
			&TilesRuntime::new_silent(),
		);
		assert!(result.is_err());
		assert!(!destination.exists());
		Ok(())
	}

	#[test]
	fn metadata_json_is_pretty() -> Result<()> {
		let dir = TempDir::new()?;
		let path = container(
			&dir,
			r#"INSERT INTO metadata VALUES ('name', 'demo');
			INSERT INTO metadata VALUES ('json', '{"level":2}');"#,
		)?;
		assert_eq!(metadata_json(&path)?, "{\n  \"level\": 2,\n  \"name\": \"demo\"\n}");
		Ok(())
	}

	#[test]
	fn truthiness() {
		assert!(!is_truthy(&Value::Null));
		assert!(!is_truthy(&json!("")));
		assert!(!is_truthy(&json!(false)));
		assert!(!is_truthy(&json!(0)));
		assert!(!is_truthy(&json!(0.0)));
		assert!(!is_truthy(&json!([])));
		assert!(is_truthy(&json!("x")));
		assert!(is_truthy(&json!(3)));
		assert!(is_truthy(&json!(-0.5)));
		assert!(is_truthy(&json!("0")));
	}
}
