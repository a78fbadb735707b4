//! Progress tracking for long-running conversions
//!
//! Progress handles are created through [`TilesRuntime::create_progress`](crate::TilesRuntime::create_progress).
//! Every update is emitted as an [`Event::Progress`](crate::Event::Progress); a bar is drawn on
//! stderr unless the runtime was built with `silent_progress(true)`.

mod factory;
mod handle;
mod types;

pub use factory::ProgressFactory;
pub use handle::ProgressHandle;
pub use types::{ProgressId, ProgressState};
