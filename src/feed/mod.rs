mod client;
mod error;
mod types;

pub use client::FeedClient;
pub use error::FeedError;
pub use types::{RawBatch, RawSample, RawSatelliteRecord};
