// src/errors.rs
use thiserror::Error;

/// Failure modes of the kline fetch path. All of these are recovered at the
/// adapter boundary by returning an empty candle sequence.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("upstream returned error code rc={0}")]
    ApiCode(i64),
    #[error("malformed kline payload: {0}")]
    Malformed(String),
}
