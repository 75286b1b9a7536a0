use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum PingdomError {
    #[error("Pingdom API error: {0}")]
    Api(ApiError),

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PingdomError {
    /// True when the request was abandoned because the client timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PingdomError::Http(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, PingdomError>;
