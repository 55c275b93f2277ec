//! Client Error Types

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with `success = false` or a problem body
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A successful envelope without the expected payload
    #[error("Response carried no data")]
    MissingData,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for API failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
