use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

pub const DEFAULT_CONCURRENCY: usize = 6;
pub const DEFAULT_UNIT_TIMEOUT_SECS: u64 = 10;
pub const MAX_RANKED_ARTISTS: usize = 20;
pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 30;

/// Limits for one fan-out batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum simultaneous in-flight units.
    pub concurrency: usize,
    /// Per-unit timeout in milliseconds.
    pub unit_timeout_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            unit_timeout_ms: DEFAULT_UNIT_TIMEOUT_SECS * 1000,
        }
    }
}

impl BatchConfig {
    pub fn new(concurrency: usize, unit_timeout: Duration) -> Self {
        Self {
            concurrency,
            unit_timeout_ms: unit_timeout.as_millis() as u64,
        }
    }

    /// Concurrency cap, never below one.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    pub fn unit_timeout(&self) -> Duration {
        Duration::from_millis(self.unit_timeout_ms.max(1))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcertConfig {
    pub home_city: String,
    pub artist_rank_cap: usize,
    pub batch: BatchConfig,
}

impl Default for ConcertConfig {
    fn default() -> Self {
        Self {
            home_city: String::new(),
            artist_rank_cap: MAX_RANKED_ARTISTS,
            batch: BatchConfig::default(),
        }
    }
}

impl ConcertConfig {
    pub fn for_city(home_city: impl Into<String>) -> Self {
        Self {
            home_city: home_city.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    pub batch: BatchConfig,
    /// Candidates beyond this count are dropped before resolution.
    pub max_recommendations: usize,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

/// All caller-supplied settings in one document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub resolver: BatchConfig,
    pub blend: BlendConfig,
    pub concerts: ConcertConfig,
}

impl CoreConfig {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let config: CoreConfig =
            serde_json::from_str(raw).map_err(|e| CoreError::Config(e.to_string()))?;
        if config.concerts.artist_rank_cap == 0 {
            return Err(CoreError::Config(
                "concerts.artist_rank_cap must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = CoreConfig::from_json(r#"{"concerts": {"home_city": "Austin"}}"#).unwrap();
        assert_eq!(config.concerts.home_city, "Austin");
        assert_eq!(config.concerts.artist_rank_cap, MAX_RANKED_ARTISTS);
        assert_eq!(config.resolver.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.blend.max_recommendations, DEFAULT_MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_rejects_zero_rank_cap() {
        let err = CoreConfig::from_json(r#"{"concerts": {"artist_rank_cap": 0}}"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_concurrency_never_below_one() {
        let batch = BatchConfig::new(0, Duration::from_millis(0));
        assert_eq!(batch.effective_concurrency(), 1);
        assert_eq!(batch.unit_timeout(), Duration::from_millis(1));
    }
}
