mod config;
pub use config::*;

mod options;
pub use options::*;

mod reports;
pub use reports::*;
