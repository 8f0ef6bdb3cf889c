use crate::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppleMusicError {
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Missing or expired developer/user token, or no active subscription
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("HTTP {0} - {1}")]
    ApiError(u16, String),
}

impl From<reqwest::Error> for AppleMusicError {
    fn from(err: reqwest::Error) -> Self {
        AppleMusicError::NetworkError(err.to_string())
    }
}

impl From<AppleMusicError> for CoreError {
    fn from(err: AppleMusicError) -> Self {
        match err {
            AppleMusicError::NotFound(msg) => CoreError::NotFound(msg),
            AppleMusicError::ParseError(msg) => CoreError::Parse(msg),
            other => CoreError::ProviderUnavailable(format!("Apple Music: {}", other)),
        }
    }
}
