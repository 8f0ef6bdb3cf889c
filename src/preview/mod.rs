//! Fallback preview-audio lookup for tracks whose catalog gave no preview.

pub mod itunes;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use itunes::ItunesPreviewProvider;

/// Lookup key: lowercase trimmed `"artist|track"`.
pub fn preview_key(track_name: &str, artist_name: &str) -> String {
    format!(
        "{}|{}",
        artist_name.trim().to_lowercase(),
        track_name.trim().to_lowercase()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewQuery {
    pub track_name: String,
    pub artist_name: String,
}

impl PreviewQuery {
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
        }
    }

    pub fn key(&self) -> String {
        preview_key(&self.track_name, &self.artist_name)
    }
}

/// Best-effort preview source. Never fails: pairs it could not match are
/// simply absent from the returned map, keyed by [`preview_key`].
#[async_trait]
pub trait PreviewProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, queries: &[PreviewQuery]) -> HashMap<String, String>;
}
