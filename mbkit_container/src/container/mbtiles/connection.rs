use anyhow::{Context, Result, bail, ensure};
use mbkit_derive::context;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde_json::{Map, Value};
use std::path::Path;

const RAW_SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);
	CREATE TABLE IF NOT EXISTS metadata (name TEXT, value TEXT);
	CREATE TABLE IF NOT EXISTS grids (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, grid BLOB);
	CREATE TABLE IF NOT EXISTS grid_data (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, key_name TEXT, key_json TEXT);
	CREATE UNIQUE INDEX IF NOT EXISTS name ON metadata (name);
	CREATE UNIQUE INDEX IF NOT EXISTS tile_index ON tiles (zoom_level, tile_column, tile_row);
";

const COMPACTION_SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS images (tile_data BLOB, tile_id TEXT);
	CREATE TABLE IF NOT EXISTS map (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_id TEXT);
";

const COMPACTION_FINALIZE: &str = "
	DROP TABLE tiles;
	CREATE VIEW tiles AS
		SELECT map.zoom_level AS zoom_level, map.tile_column AS tile_column, map.tile_row AS tile_row, images.tile_data AS tile_data
		FROM map JOIN images ON images.tile_id = map.tile_id;
	CREATE UNIQUE INDEX map_index ON map (zoom_level, tile_column, tile_row);
	CREATE UNIQUE INDEX images_id ON images (tile_id);
";

const TILE_COLUMNS: [&str; 4] = ["zoom_level", "tile_column", "tile_row", "tile_data"];

/// An open MBTiles container.
///
/// The file is locked exclusively while the connection is open.
#[derive(Debug)]
pub struct MBTilesConnection {
	connection: Connection,
	name: String,
}

impl MBTilesConnection {
	/// Open or create the SQLite file and apply the tuning pragmas
	/// (`synchronous=0`, `locking_mode=EXCLUSIVE`, `journal_mode=DELETE`).
	#[context("opening MBTiles container '{}'", path.display())]
	pub fn open(path: &Path) -> Result<MBTilesConnection> {
		log::debug!("open {path:?}");

		let connection = Connection::open(path)?;
		connection.pragma_update(None, "synchronous", 0)?;
		connection.pragma_update_and_check(None, "locking_mode", "EXCLUSIVE", |row| row.get::<_, String>(0))?;
		connection.pragma_update_and_check(None, "journal_mode", "DELETE", |row| row.get::<_, String>(0))?;

		Ok(MBTilesConnection {
			connection,
			name: path.to_string_lossy().into_owned(),
		})
	}

	/// Like [`open`](Self::open), but the file must already exist.
	#[context("opening existing MBTiles container '{}'", path.display())]
	pub fn open_existing(path: &Path) -> Result<MBTilesConnection> {
		ensure!(path.is_file(), "file {path:?} does not exist");
		MBTilesConnection::open(path)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn connection(&self) -> &Connection {
		&self.connection
	}

	pub fn transaction(&mut self) -> Result<Transaction<'_>> {
		Ok(self.connection.transaction()?)
	}

	/// Create the raw tables and indexes if they are missing.
	///
	/// Fails if `tiles` exists but cannot take raw tile rows: a compacted container, or a
	/// table with different columns.
	#[context("setting up raw schema in '{}'", self.name)]
	pub fn setup_raw_schema(&self) -> Result<()> {
		match self.object_type("tiles")?.as_deref() {
			None => {}
			Some("table") => {
				let columns = self.table_columns("tiles")?;
				for column in TILE_COLUMNS {
					ensure!(
						columns.iter().any(|c| c == column),
						"table 'tiles' has no column '{column}' (found: {})",
						columns.join(", ")
					);
				}
			}
			Some("view") => bail!("container is compacted ('tiles' is a view) and cannot receive new tiles"),
			Some(other) => bail!("'tiles' is a {other}, not a table"),
		}
		self.connection.execute_batch(RAW_SCHEMA)?;
		Ok(())
	}

	/// Create the `images` and `map` tables used by the compactor and empty them.
	///
	/// Returns the number of rows left behind by an interrupted compaction.
	#[context("preparing compaction schema in '{}'", self.name)]
	pub fn prepare_compaction_schema(&self) -> Result<u64> {
		self.connection.execute_batch(COMPACTION_SCHEMA)?;
		let map_rows = self.connection.execute("DELETE FROM map", [])?;
		let image_rows = self.connection.execute("DELETE FROM images", [])?;
		Ok((map_rows + image_rows) as u64)
	}

	/// Replace the `tiles` table by a view over `map` and `images`, index both and optimize.
	#[context("finalizing compaction in '{}'", self.name)]
	pub fn finalize_compaction(&self) -> Result<()> {
		self.connection.execute_batch(COMPACTION_FINALIZE)?;
		self.connection.execute_batch("VACUUM; ANALYZE;")?;
		Ok(())
	}

	/// `ANALYZE` and `VACUUM`
	#[context("optimizing '{}'", self.name)]
	pub fn optimize(&self) -> Result<()> {
		self.connection.execute_batch("ANALYZE; VACUUM;")?;
		Ok(())
	}

	pub fn has_table(&self, name: &str) -> Result<bool> {
		Ok(self.object_type(name)?.as_deref() == Some("table"))
	}

	/// Type of a schema object (`table`, `view`, `index`, ...), `None` if it does not exist.
	pub fn object_type(&self, name: &str) -> Result<Option<String>> {
		Ok(self
			.connection
			.query_row("SELECT type FROM sqlite_master WHERE name = ?1", [name], |row| row.get(0))
			.optional()?)
	}

	fn table_columns(&self, table: &str) -> Result<Vec<String>> {
		let mut statement = self.connection.prepare("SELECT name FROM pragma_table_info(?1)")?;
		let columns = statement
			.query_map([table], |row| row.get::<_, String>(0))?
			.collect::<rusqlite::Result<Vec<String>>>()?;
		Ok(columns)
	}

	/// All metadata entries as one JSON object.
	///
	/// The members of the object stored under `json` are merged into the result; every other
	/// entry is a string value.
	#[context("reading metadata of '{}'", self.name)]
	pub fn metadata(&self) -> Result<Map<String, Value>> {
		let mut result = Map::new();
		if !self.has_table("metadata")? {
			return Ok(result);
		}

		let mut statement = self.connection.prepare("SELECT name, value FROM metadata")?;
		let mut rows = statement.query([])?;
		while let Some(row) = rows.next()? {
			let name: String = row.get(0)?;
			let value: Option<String> = row.get(1)?;
			let value = value.unwrap_or_default();
			if name == "json" {
				let json: Value =
					serde_json::from_str(&value).with_context(|| format!("parsing metadata entry 'json': {value}"))?;
				let Value::Object(object) = json else {
					bail!("metadata entry 'json' is not a JSON object");
				};
				result.extend(object);
			} else {
				result.insert(name, Value::String(value));
			}
		}
		Ok(result)
	}

	pub fn count_tiles(&self) -> Result<u64> {
		let count: i64 = self
			.connection
			.query_row("SELECT count(zoom_level) FROM tiles", [], |row| row.get(0))
			.with_context(|| format!("counting tiles in '{}'", self.name))?;
		Ok(count as u64)
	}

	pub fn close(self) -> Result<()> {
		log::debug!("close {:?}", self.name);
		self.connection.close().map_err(|(_, err)| err)?;
		Ok(())
	}
}
