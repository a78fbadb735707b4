//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] used for tile data,
//! grid envelopes and every other byte payload that moves between a directory and a container.
//!
//! # Examples
//!
//! ```rust
//! use mbkit_core::Blob;
//!
//! let blob = Blob::from("PNGDATA");
//! assert_eq!(blob.len(), 7);
//! assert_eq!(blob.as_slice(), b"PNGDATA");
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`].
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Returns the bytes as a slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		const PREVIEW: usize = 16;
		let head = &self.0[..self.0.len().min(PREVIEW)];
		let ellipsis = if self.0.len() > PREVIEW { " ..." } else { "" };
		write!(f, "Blob({}): {head:?}{ellipsis}", self.0.len())
	}
}
