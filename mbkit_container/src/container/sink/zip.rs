use super::{TileSink, entry_name};
use anyhow::{Context, Result};
use mbkit_derive::context;
use std::{
	fs::File,
	io::{BufWriter, Write},
	path::Path,
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Writes a zip archive with deflate-compressed entries.
pub struct ZipSink {
	writer: ZipWriter<BufWriter<File>>,
	options: SimpleFileOptions,
}

impl ZipSink {
	#[context("creating zip archive {:?}", path)]
	pub fn create(path: &Path) -> Result<ZipSink> {
		let file = File::create(path)?;
		Ok(ZipSink {
			writer: ZipWriter::new(BufWriter::new(file)),
			options: SimpleFileOptions::default()
				.compression_method(CompressionMethod::Deflated)
				.large_file(true),
		})
	}
}

impl TileSink for ZipSink {
	fn write(&mut self, directory: &str, file_name: &str, data: &[u8]) -> Result<()> {
		let name = entry_name(directory, file_name);
		self
			.writer
			.start_file(name.as_str(), self.options)
			.with_context(|| format!("adding '{name}' to zip archive"))?;
		self.writer.write_all(data)?;
		Ok(())
	}

	fn finish(self: Box<Self>) -> Result<()> {
		let mut stream = self.writer.finish().context("finishing zip archive")?;
		stream.flush()?;
		Ok(())
	}
}
