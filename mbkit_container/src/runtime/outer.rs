use super::{EventBus, RuntimeBuilder};
use crate::{ProgressFactory, ProgressHandle};
use std::sync::{Arc, Mutex};

pub(crate) struct RuntimeInner {
	pub(crate) event_bus: EventBus,
	pub(crate) progress_factory: Mutex<ProgressFactory>,
	pub(crate) forward_to_log: bool,
}

/// Shared services for one run: event bus and progress bars.
///
/// Cheap to clone; all clones share the same listeners.
#[derive(Clone)]
pub struct TilesRuntime {
	pub(crate) inner: Arc<RuntimeInner>,
}

impl TilesRuntime {
	/// Create a runtime that draws progress bars on stderr
	pub fn new() -> Self {
		Self::builder().build()
	}

	/// Create a runtime without progress bars and without `log` forwarding
	pub fn new_silent() -> Self {
		Self::builder().silent_progress(true).forward_to_log(false).build()
	}

	pub fn builder() -> RuntimeBuilder {
		RuntimeBuilder::default()
	}

	pub fn events(&self) -> &EventBus {
		&self.inner.event_bus
	}

	/// Create a progress bar for tracking a counted operation
	pub fn create_progress(&self, message: &str, total: u64) -> ProgressHandle {
		self.inner.progress_factory.lock().unwrap().create(message, total)
	}

	/// Report the start of a stage
	pub fn step(&self, message: impl Into<String>) {
		let message = message.into();
		if self.inner.forward_to_log {
			log::info!("{message}");
		}
		self.inner.event_bus.step(message);
	}

	/// Report a recoverable problem; the run continues
	pub fn warn(&self, message: impl Into<String>) {
		let message = message.into();
		if self.inner.forward_to_log {
			log::warn!("{message}");
		}
		self.inner.event_bus.warn(message);
	}

	/// Report a fatal problem; the caller is about to abort
	pub fn error(&self, message: impl Into<String>) {
		let message = message.into();
		if self.inner.forward_to_log {
			log::error!("{message}");
		}
		self.inner.event_bus.error(message);
	}
}

impl Default for TilesRuntime {
	fn default() -> Self {
		Self::new()
	}
}
