mod builder;
mod validate;

pub use builder::{build_batch, build_trajectory, Trajectory};
pub use validate::{validate_samples, ValidatedSample};

/// A satellite needs at least this many valid samples to be rendered.
pub const MIN_SAMPLES: usize = 2;
