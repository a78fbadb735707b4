use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressId(pub u32);

/// Snapshot of one progress bar, as carried by progress events
#[derive(Debug, Clone)]
pub struct ProgressState {
	pub id: ProgressId,
	pub message: String,
	pub position: u64,
	pub total: u64,
	pub start: Instant,
	pub next_draw: Instant,
	pub finished: bool,
}

impl ProgressState {
	/// Completed fraction in percent, `100` for an empty total
	pub fn percent(&self) -> u64 {
		if self.total == 0 {
			return 100;
		}
		self.position.min(self.total) * 100 / self.total
	}
}
