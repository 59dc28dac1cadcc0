use std::time::Duration;

use super::error::FeedError;
use super::types::RawBatch;

/// HTTP client for the satellite position feed.
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Fetch one batch. Transport and decode failures surface as errors;
    /// the caller decides what to keep rendered in the meantime.
    pub async fn fetch(&self) -> Result<RawBatch, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let batch = response.json::<RawBatch>().await?;
        Ok(batch)
    }
}
