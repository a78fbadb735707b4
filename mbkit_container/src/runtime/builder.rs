//! Builder pattern for constructing TilesRuntime instances

use super::{EventBus, TilesRuntime, outer::RuntimeInner};
use crate::ProgressFactory;
use std::sync::{Arc, Mutex};

/// Builder for creating customized [`TilesRuntime`] instances
///
/// ```no_run
/// use mbkit_container::TilesRuntime;
///
/// let runtime = TilesRuntime::builder().silent_progress(true).build();
/// ```
#[derive(Default)]
pub struct RuntimeBuilder {
	silent_progress: bool,
	forward_to_log: Option<bool>,
}

impl RuntimeBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Do not draw progress bars on stderr (progress events are still emitted)
	pub fn silent_progress(mut self, silent: bool) -> Self {
		self.silent_progress = silent;
		self
	}

	/// Also write steps, warnings and errors to the `log` facade (default: true)
	pub fn forward_to_log(mut self, forward: bool) -> Self {
		self.forward_to_log = Some(forward);
		self
	}

	pub fn build(self) -> TilesRuntime {
		let event_bus = EventBus::new();
		let progress_factory = ProgressFactory::new(event_bus.clone(), !self.silent_progress);

		TilesRuntime {
			inner: Arc::new(RuntimeInner {
				event_bus,
				progress_factory: Mutex::new(progress_factory),
				forward_to_log: self.forward_to_log.unwrap_or(true),
			}),
		}
	}
}
