//! UTFGrid interactivity data.
//!
//! A `.grid.json` file is stored in two parts: the grid object without its `data` member goes
//! zlib-compressed into `grids`, and every non-empty entry of `keys` becomes one `grid_data` row
//! holding the JSON text of the matching `data` value.

use anyhow::{Context, Result, bail};
use mbkit_core::{
	Blob,
	utils::{compress_zlib, decompress_zlib, strip_callback},
};
use mbkit_derive::context;
use serde_json::{Map, Value};

/// A grid file split up for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRecord {
	/// zlib-compressed JSON of the grid object without `data`
	pub envelope: Blob,
	/// `(key_name, key_json)` for every non-empty key
	pub keys: Vec<(String, String)>,
}

/// Split the text of a grid file, optionally wrapped in a JSONP callback.
#[context("decoding UTFGrid file")]
pub fn encode_grid(text: &str) -> Result<GridRecord> {
	let json: Value = serde_json::from_str(strip_callback(text)).context("grid is not valid JSON")?;
	let Value::Object(mut grid) = json else {
		bail!("grid is not a JSON object");
	};

	let data = match grid.remove("data") {
		Some(Value::Object(data)) => data,
		Some(_) => bail!("grid member 'data' is not an object"),
		None => bail!("grid has no 'data' member"),
	};

	let entries = match grid.get("keys") {
		Some(Value::Array(entries)) => entries,
		Some(_) => bail!("grid member 'keys' is not an array"),
		None => bail!("grid has no 'keys' member"),
	};

	let mut keys = Vec::new();
	for entry in entries {
		let Value::String(key) = entry else {
			bail!("grid key {entry} is not a string");
		};
		if key.is_empty() {
			continue;
		}
		let value = data
			.get(key)
			.with_context(|| format!("grid key '{key}' has no entry in 'data'"))?;
		keys.push((key.clone(), serde_json::to_string(value)?));
	}

	let envelope = compress_zlib(&Blob::from(serde_json::to_string(&grid)?))?;
	Ok(GridRecord { envelope, keys })
}

/// Rebuild a grid object from its stored envelope and `grid_data` rows.
#[context("assembling UTFGrid from {} bytes", envelope.len())]
pub fn decode_grid(envelope: &Blob, rows: Vec<(String, String)>) -> Result<Value> {
	let json: Value = serde_json::from_slice(decompress_zlib(envelope)?.as_slice())?;
	let Value::Object(mut grid) = json else {
		bail!("stored grid is not a JSON object");
	};

	let mut data = Map::new();
	for (key, key_json) in rows {
		let value = serde_json::from_str(&key_json).with_context(|| format!("parsing data of grid key '{key}'"))?;
		data.insert(key, value);
	}
	grid.insert("data".to_string(), Value::Object(data));
	Ok(Value::Object(grid))
}
