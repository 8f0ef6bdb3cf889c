//! Data types for track resolution.

use crate::models::UnifiedTrack;
use serde::{Deserialize, Serialize};

/// Free-text song suggestion, usually from an AI generator that knows
/// nothing about catalog identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSuggestion {
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub reason: String,
}

impl SongSuggestion {
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            reason: reason.into(),
        }
    }

    /// Catalog search text, `"{track} {artist}"`.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.track_name.trim(), self.artist_name.trim())
            .trim()
            .to_string()
    }

    pub fn has_title(&self) -> bool {
        !self.track_name.trim().is_empty()
    }
}

/// One suggestion after resolution. A missing match is "not found", not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSong {
    pub suggestion: SongSuggestion,
    pub matched_track: Option<UnifiedTrack>,
    /// From the matched track, else from the fallback preview source
    pub preview_url: Option<String>,
}

impl ResolvedSong {
    pub fn unresolved(suggestion: SongSuggestion) -> Self {
        Self {
            suggestion,
            matched_track: None,
            preview_url: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.matched_track.is_some()
    }

    pub fn track_name(&self) -> &str {
        &self.suggestion.track_name
    }

    pub fn artist_name(&self) -> &str {
        &self.suggestion.artist_name
    }

    pub fn reason(&self) -> &str {
        &self.suggestion.reason
    }
}
