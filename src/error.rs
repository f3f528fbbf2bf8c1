//! Error Types
//!
//! One error enum for the library surface. Binaries and the bridge server
//! wrap these in `anyhow` at their boundaries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaprError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status} for {endpoint}")]
    BackendStatus { status: u16, endpoint: String },

    #[error("failed to decode backend payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("backend returned an unusable bounding box")]
    InvalidBounds,

    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("a request carries both a bearer token and a share key")]
    ConflictingCredentials,

    #[error("no active project")]
    NoProject,

    #[error("response for project generation {got} arrived after switching to {current}")]
    Stale { got: u64, current: u64 },

    #[error("map view controller has shut down")]
    ControllerClosed,
}

pub type Result<T> = std::result::Result<T, MaprError>;
