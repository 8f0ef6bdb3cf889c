use crate::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Rate limited by Spotify")]
    RateLimited,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("HTTP {0} - {1}")]
    ApiError(u16, String),
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for SpotifyError {
    fn from(err: serde_json::Error) -> Self {
        SpotifyError::ParseError(err.to_string())
    }
}

impl From<SpotifyError> for CoreError {
    fn from(err: SpotifyError) -> Self {
        match err {
            SpotifyError::NotFound(msg) => CoreError::NotFound(msg),
            SpotifyError::ParseError(msg) => CoreError::Parse(msg),
            other => CoreError::ProviderUnavailable(format!("Spotify: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_into_core_error() {
        assert!(matches!(
            CoreError::from(SpotifyError::NotFound("/tracks/x".into())),
            CoreError::NotFound(_)
        ));
        let err = CoreError::from(SpotifyError::ApiError(502, "bad gateway".into()));
        assert_eq!(
            err.to_string(),
            "Provider unavailable: Spotify: HTTP 502 - bad gateway"
        );
    }
}
