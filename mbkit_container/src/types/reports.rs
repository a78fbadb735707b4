/// Counters of a finished import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
	pub tiles_written: u64,
	pub grids_written: u64,
}

/// Counters of a finished export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
	pub tiles_written: u64,
	/// zero-length tiles that were not written
	pub tiles_skipped: u64,
	pub grids_written: u64,
}

/// Counters of a finished compaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionReport {
	/// rows in `images`
	pub unique_blobs: u64,
	/// rows in `map`
	pub total_tiles: u64,
	/// tiles that reused a blob of the same window
	pub overlapping: u64,
}
