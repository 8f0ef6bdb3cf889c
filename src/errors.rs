use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the resolution, blend and concert components.
///
/// Per-unit failures inside a batch never reach the caller as one of these;
/// they are folded into empty or unresolved values. Only batch-wide outcomes
/// (cancellation, every unit failing) and direct provider calls return an error.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum CoreError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("All {attempted} sources failed")]
    AllSourcesFailed { attempted: usize },

    #[error("Unsupported by provider: {0}")]
    Unsupported(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether re-invoking the whole operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::ProviderUnavailable(_) | CoreError::AllSourcesFailed { .. }
        )
    }
}

pub type ProviderResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        CoreError::ProviderUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Parse(e.to_string())
    }
}

impl From<String> for CoreError {
    fn from(e: String) -> Self {
        CoreError::Internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        assert!(CoreError::ProviderUnavailable("timeout".into()).is_retryable());
        assert!(CoreError::AllSourcesFailed { attempted: 3 }.is_retryable());
        assert!(!CoreError::Cancelled.is_retryable());
        assert!(!CoreError::Unsupported("create_playlist".into()).is_retryable());
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(CoreError::Config("bad".into())).unwrap();
        assert_eq!(json["type"], "Config");
        assert_eq!(json["message"], "bad");
    }
}
