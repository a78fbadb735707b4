//! Gzip and zlib helpers.
//!
//! MBTiles stores vector tiles gzip-compressed, so `pbf` tiles are gunzipped on export.
//! UTFGrid envelopes are stored zlib-compressed in the `grids` table.
//!
//! ```
//! use mbkit_core::{Blob, utils::*};
//!
//! let data = Blob::from("{\"grid\":[]}");
//! assert_eq!(decompress_zlib(&compress_zlib(&data).unwrap()).unwrap(), data);
//! assert_eq!(decompress_gzip(&compress_gzip(&data).unwrap()).unwrap(), data);
//! ```

use crate::Blob;
use anyhow::{Context, Result};
use flate2::{
	Compression,
	bufread::{GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder},
};
use mbkit_derive::context;
use std::io::Read;

/// Compresses data using Gzip.
#[context("compressing {} bytes with gzip", blob.len())]
pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzEncoder::new(blob.as_slice(), Compression::best());
	let mut compressed = Vec::new();
	encoder.read_to_end(&mut compressed)?;
	Ok(Blob::from(compressed))
}

/// Decompresses Gzip data.
#[context("decompressing {} bytes of gzip data", blob.len())]
pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed = Vec::new();
	decoder
		.read_to_end(&mut decompressed)
		.context("data is not valid gzip")?;
	Ok(Blob::from(decompressed))
}

/// Compresses data using zlib (deflate with a zlib header).
#[context("compressing {} bytes with zlib", blob.len())]
pub fn compress_zlib(blob: &Blob) -> Result<Blob> {
	let mut encoder = ZlibEncoder::new(blob.as_slice(), Compression::default());
	let mut compressed = Vec::new();
	encoder.read_to_end(&mut compressed)?;
	Ok(Blob::from(compressed))
}

/// Decompresses zlib data.
#[context("decompressing {} bytes of zlib data", blob.len())]
pub fn decompress_zlib(blob: &Blob) -> Result<Blob> {
	let mut decoder = ZlibDecoder::new(blob.as_slice());
	let mut decompressed = Vec::new();
	decoder
		.read_to_end(&mut decompressed)
		.context("data is not valid zlib")?;
	Ok(Blob::from(decompressed))
}
