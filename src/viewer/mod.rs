mod app;
mod config;

pub use app::{run_viewer, RefreshOutcome, Viewer, ViewerError};
pub use config::{Config, ConfigError, FeedConfig};
