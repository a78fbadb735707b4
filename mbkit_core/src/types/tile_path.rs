use std::fmt::{self, Display};

/// Relative location of one exported file: a `/`-separated directory and a file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePath {
	pub directory: String,
	pub file_name: String,
}

impl TilePath {
	pub fn new(directory: impl Into<String>, file_name: impl Into<String>) -> TilePath {
		TilePath {
			directory: directory.into(),
			file_name: file_name.into(),
		}
	}
}

impl Display for TilePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.directory.is_empty() {
			f.write_str(&self.file_name)
		} else {
			write!(f, "{}/{}", self.directory, self.file_name)
		}
	}
}
