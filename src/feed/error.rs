use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),
}
