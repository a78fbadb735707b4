use crate::{EventBus, ProgressHandle, ProgressId};

/// Creates progress handles with unique ids
#[derive(Clone)]
pub struct ProgressFactory {
	next_id: u32,
	event_bus: EventBus,
	stderr: bool,
}

impl ProgressFactory {
	pub fn new(event_bus: EventBus, stderr: bool) -> Self {
		Self {
			next_id: 0,
			event_bus,
			stderr,
		}
	}

	/// Create a new progress handle
	///
	/// # Arguments
	/// * `message` - Description of the operation being tracked
	/// * `total` - Total number of items to process
	pub fn create(&mut self, message: &str, total: u64) -> ProgressHandle {
		self.next_id = self.next_id.wrapping_add(1);
		ProgressHandle::new(
			ProgressId(self.next_id),
			message.to_string(),
			total,
			self.event_bus.clone(),
			self.stderr,
		)
	}
}
