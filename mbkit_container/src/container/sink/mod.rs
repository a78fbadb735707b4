//! Destinations for exported files.
//!
//! The exporter writes every file through a [`TileSink`]. The concrete sink is chosen once from
//! the destination path:
//!
//! | suffix               | sink               |
//! |----------------------|--------------------|
//! | `.zip`               | [`ZipSink`]        |
//! | `.tar`               | [`PlainTarSink`]   |
//! | `.tar.gz`, `.tgz`    | [`GzipTarSink`]    |
//! | `.tar.bz2`, `.tbz2`  | [`Bzip2TarSink`]   |
//! | anything else        | [`DirectorySink`]  |

mod directory;
mod tar;
mod zip;

pub use self::tar::{ArchiveStream, Bzip2TarSink, GzipTarSink, PlainTarSink, TarSink};
pub use self::zip::ZipSink;
pub use directory::DirectorySink;

use anyhow::Result;
use mbkit_core::TilePath;
use std::path::Path;

/// Write contract shared by all export destinations.
pub trait TileSink {
	/// Store `data` as `{directory}/{file_name}`; an empty `directory` means the root.
	fn write(&mut self, directory: &str, file_name: &str, data: &[u8]) -> Result<()>;

	/// Flush and close the destination. Archives are incomplete until this is called.
	fn finish(self: Box<Self>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
	Directory,
	Zip,
	Tar,
	TarGzip,
	TarBzip2,
}

impl SinkKind {
	pub fn from_path(path: &Path) -> SinkKind {
		let name = path
			.file_name()
			.map(|name| name.to_string_lossy().to_lowercase())
			.unwrap_or_default();

		if name.ends_with(".zip") {
			SinkKind::Zip
		} else if name.ends_with(".tar") {
			SinkKind::Tar
		} else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
			SinkKind::TarGzip
		} else if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
			SinkKind::TarBzip2
		} else {
			SinkKind::Directory
		}
	}
}

/// Create the sink matching the suffix of `path`.
pub fn open_sink(path: &Path) -> Result<Box<dyn TileSink>> {
	log::debug!("open sink {path:?} as {:?}", SinkKind::from_path(path));
	Ok(match SinkKind::from_path(path) {
		SinkKind::Directory => Box::new(DirectorySink::create(path)?),
		SinkKind::Zip => Box::new(ZipSink::create(path)?),
		SinkKind::Tar => Box::new(PlainTarSink::create(path)?),
		SinkKind::TarGzip => Box::new(GzipTarSink::create(path)?),
		SinkKind::TarBzip2 => Box::new(Bzip2TarSink::create(path)?),
	})
}

fn entry_name(directory: &str, file_name: &str) -> String {
	TilePath::new(directory, file_name).to_string()
}
