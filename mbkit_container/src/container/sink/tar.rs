use super::{TileSink, entry_name};
use anyhow::{Context, Result};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use mbkit_derive::context;
use std::{
	fs::File,
	io::{self, BufWriter, Write},
	path::Path,
};
use tar::{Builder, Header};

/// Byte stream below a tar archive that needs an explicit end (e.g. a compression trailer).
pub trait ArchiveStream: Write + Sized {
	fn open(path: &Path) -> io::Result<Self>;
	fn close(self) -> io::Result<()>;
}

impl ArchiveStream for BufWriter<File> {
	fn open(path: &Path) -> io::Result<Self> {
		Ok(BufWriter::new(File::create(path)?))
	}

	fn close(mut self) -> io::Result<()> {
		self.flush()
	}
}

impl ArchiveStream for GzEncoder<BufWriter<File>> {
	fn open(path: &Path) -> io::Result<Self> {
		Ok(GzEncoder::new(BufWriter::<File>::open(path)?, flate2::Compression::default()))
	}

	fn close(self) -> io::Result<()> {
		self.finish()?.close()
	}
}

impl ArchiveStream for BzEncoder<BufWriter<File>> {
	fn open(path: &Path) -> io::Result<Self> {
		Ok(BzEncoder::new(BufWriter::<File>::open(path)?, bzip2::Compression::default()))
	}

	fn close(self) -> io::Result<()> {
		self.finish()?.close()
	}
}

/// Writes a tar archive, optionally through a compressing stream.
pub struct TarSink<W: ArchiveStream> {
	builder: Builder<W>,
}

pub type PlainTarSink = TarSink<BufWriter<File>>;
pub type GzipTarSink = TarSink<GzEncoder<BufWriter<File>>>;
pub type Bzip2TarSink = TarSink<BzEncoder<BufWriter<File>>>;

impl<W: ArchiveStream> TarSink<W> {
	#[context("creating tar archive {:?}", path)]
	pub fn create(path: &Path) -> Result<TarSink<W>> {
		Ok(TarSink {
			builder: Builder::new(W::open(path)?),
		})
	}
}

impl<W: ArchiveStream> TileSink for TarSink<W> {
	fn write(&mut self, directory: &str, file_name: &str, data: &[u8]) -> Result<()> {
		let name = entry_name(directory, file_name);
		let mut header = Header::new_gnu();
		header.set_size(data.len() as u64);
		header.set_mode(0o644);
		self
			.builder
			.append_data(&mut header, &name, data)
			.with_context(|| format!("adding '{name}' to tar archive"))?;
		Ok(())
	}

	fn finish(self: Box<Self>) -> Result<()> {
		let stream = self.builder.into_inner().context("finishing tar archive")?;
		stream.close().context("closing tar archive")?;
		Ok(())
	}
}
