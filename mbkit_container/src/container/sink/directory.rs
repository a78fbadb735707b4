use super::TileSink;
use anyhow::{Context, Result};
use mbkit_derive::context;
use std::{
	fs,
	path::{Path, PathBuf},
};

/// Writes every file below a base directory, creating sub-directories on demand.
pub struct DirectorySink {
	base: PathBuf,
}

impl DirectorySink {
	#[context("creating output directory {:?}", path)]
	pub fn create(path: &Path) -> Result<DirectorySink> {
		fs::create_dir_all(path)?;
		Ok(DirectorySink {
			base: path.to_path_buf(),
		})
	}
}

impl TileSink for DirectorySink {
	fn write(&mut self, directory: &str, file_name: &str, data: &[u8]) -> Result<()> {
		let folder = if directory.is_empty() {
			self.base.clone()
		} else {
			self.base.join(directory)
		};
		fs::create_dir_all(&folder).with_context(|| format!("creating directory {folder:?}"))?;
		let path = folder.join(file_name);
		fs::write(&path, data).with_context(|| format!("writing file {path:?}"))?;
		Ok(())
	}

	fn finish(self: Box<Self>) -> Result<()> {
		Ok(())
	}
}
