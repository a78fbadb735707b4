//! Event system for runtime events

use crate::ProgressState;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Event types that can be emitted by the runtime
#[derive(Debug, Clone)]
pub enum Event {
	/// Progress update event
	Progress { data: ProgressState },

	/// Step/stage message
	Step { message: String },

	/// Warning message
	Warning { message: String },

	/// Error message
	Error { message: String },
}

/// Unique identifier for event listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type EventListener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Event bus for runtime events
///
/// Listeners are called synchronously, in registration order, for every emitted event.
#[derive(Clone)]
pub struct EventBus {
	listeners: Arc<ArcSwap<Vec<EventListener>>>,
}

impl EventBus {
	pub fn new() -> Self {
		Self {
			listeners: Arc::new(ArcSwap::from_pointee(Vec::new())),
		}
	}

	/// Register an event listener
	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&Event) + Send + Sync + 'static,
	{
		let listener: EventListener = Arc::new(listener);
		let id = self.listeners.load().len();
		self.listeners.rcu(|old| {
			let mut new = (**old).clone();
			new.push(listener.clone());
			new
		});
		ListenerId(id)
	}

	/// Emit an event to all listeners
	///
	/// A panicking listener does not prevent the others from being called.
	pub fn emit(&self, event: Event) {
		let listeners = self.listeners.load();
		for listener in listeners.iter() {
			let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
				listener(&event);
			}));
		}
	}

	pub fn progress(&self, data: ProgressState) {
		self.emit(Event::Progress { data });
	}

	pub fn step(&self, message: String) {
		self.emit(Event::Step { message });
	}

	pub fn warn(&self, message: String) {
		self.emit(Event::Warning { message });
	}

	pub fn error(&self, message: String) {
		self.emit(Event::Error { message });
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}
