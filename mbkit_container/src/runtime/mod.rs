//! Runtime handle passed to every import, export and compaction run
//!
//! The runtime bundles:
//! - an event bus (steps, warnings, errors, progress updates)
//! - a progress bar factory
//!
//! It is created once at process start, cloned cheaply (Arc-based) and handed to each
//! component explicitly instead of relying on a process-wide logger.
//!
//! # Example
//!
//! ```no_run
//! use mbkit_container::TilesRuntime;
//!
//! let runtime = TilesRuntime::builder().silent_progress(true).build();
//!
//! runtime.events().subscribe(|event| {
//!     println!("{:?}", event);
//! });
//!
//! let progress = runtime.create_progress("importing tiles", 1000);
//! progress.inc(100);
//! progress.finish();
//! ```

mod builder;
mod events;
mod outer;

pub use builder::RuntimeBuilder;
pub use events::{Event, EventBus, ListenerId};
pub use outer::TilesRuntime;
