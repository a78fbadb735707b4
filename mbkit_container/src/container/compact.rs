//! Content deduplication of a raw MBTiles container.
//!
//! Tiles are read in windows of `chunk_size` rows (by `rowid`). Inside a window, identical
//! tile data is stored once in `images` under a fresh UUID and every coordinate gets a row in
//! `map`. Identical data found in different windows is stored again: the lookup table only
//! lives for one window, which bounds memory by the chunk size.
//!
//! Afterwards `tiles` is replaced by a view joining `map` and `images`, so readers see the same
//! rows as before.

use super::mbtiles::MBTilesConnection;
use crate::{CompactionReport, TilesRuntime};
use anyhow::{Result, bail, ensure};
use mbkit_derive::context;
use rusqlite::params;
use std::{collections::HashMap, path::Path};
use uuid::Uuid;

struct TileRow {
	zoom: i64,
	column: i64,
	row: i64,
	data: Vec<u8>,
}

/// Compact the container at `container_path` in place.
#[context("compacting {:?}", container_path)]
pub fn compact(container_path: &Path, chunk_size: u64, runtime: &TilesRuntime) -> Result<CompactionReport> {
	let mut connection = MBTilesConnection::open_existing(container_path)?;
	let report = compact_connection(&mut connection, chunk_size, runtime)?;
	connection.close()?;
	Ok(report)
}

/// Compact an already opened container in place.
///
/// # Errors
/// Fails for a `chunk_size` of zero or above `i64::MAX`, for containers without a `tiles` table (including already
/// compacted ones) and for any SQLite error. Nothing is dropped before every tile has been mapped.
#[context("compacting '{}' with chunk size {}", connection.name(), chunk_size)]
pub fn compact_connection(
	connection: &mut MBTilesConnection,
	chunk_size: u64,
	runtime: &TilesRuntime,
) -> Result<CompactionReport> {
	ensure!(chunk_size > 0, "chunk size must be greater than 0");
	ensure!(i64::try_from(chunk_size).is_ok(), "chunk size must not exceed {}", i64::MAX);
	match connection.object_type("tiles")?.as_deref() {
		Some("table") => {}
		Some("view") => bail!("container is already compacted"),
		_ => bail!("container has no tiles table"),
	}

	let stale = connection.prepare_compaction_schema()?;
	if stale > 0 {
		runtime.warn(format!("removed {stale} rows left over from an interrupted compaction"));
	}

	let total = connection.count_tiles()?;
	let last_rowid: i64 = connection
		.connection()
		.query_row("SELECT coalesce(max(rowid), 0) FROM tiles", [], |row| row.get(0))?;
	// sparse rowids need more windows than the row count suggests
	let windows = total.max(last_rowid as u64) / chunk_size + 1;

	runtime.step(format!("compacting {total} tiles in {windows} windows of {chunk_size}"));
	let progress = runtime.create_progress("compacting tiles", total);
	let mut report = CompactionReport::default();
	let mut known: HashMap<Vec<u8>, String> = HashMap::new();

	for window in 0..windows {
		let first = i64::try_from(window * chunk_size)?;
		let last = i64::try_from((window + 1) * chunk_size).unwrap_or(i64::MAX);

		let transaction = connection.transaction()?;
		let rows = {
			let mut statement = transaction.prepare(
				"SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles WHERE rowid > ?1 AND rowid <= ?2",
			)?;
			statement
				.query_map(params![first, last], |row| {
					Ok(TileRow {
						zoom: row.get(0)?,
						column: row.get(1)?,
						row: row.get(2)?,
						data: row.get::<_, Option<Vec<u8>>>(3)?.unwrap_or_default(),
					})
				})?
				.collect::<rusqlite::Result<Vec<TileRow>>>()?
		};
		log::debug!("window {window}: {} tiles with rowid in ({first}, {last}]", rows.len());

		known.clear();
		{
			let mut insert_image = transaction.prepare_cached("INSERT INTO images (tile_data, tile_id) VALUES (?1, ?2)")?;
			let mut insert_map = transaction
				.prepare_cached("INSERT INTO map (zoom_level, tile_column, tile_row, tile_id) VALUES (?1, ?2, ?3, ?4)")?;

			for tile in &rows {
				let id = if let Some(id) = known.get(&tile.data) {
					report.overlapping += 1;
					id.clone()
				} else {
					let id = Uuid::new_v4().to_string();
					insert_image.execute(params![tile.data, id])?;
					known.insert(tile.data.clone(), id.clone());
					report.unique_blobs += 1;
					id
				};
				insert_map.execute(params![tile.zoom, tile.column, tile.row, id])?;
				report.total_tiles += 1;
			}
		}
		transaction.commit()?;
		progress.inc(rows.len() as u64);
	}
	progress.finish();

	ensure!(
		report.total_tiles == total,
		"mapped {} tiles but the container holds {total}",
		report.total_tiles
	);

	log::debug!("replacing tiles table by view");
	connection.finalize_compaction()?;

	runtime.step(format!(
		"compacted {} tiles into {} unique blobs ({} duplicates)",
		report.total_tiles, report.unique_blobs, report.overlapping
	));
	Ok(report)
}
