//! Data types for two-listener blends.

use crate::blend::profile::{ListenerProfile, TasteMatch};
use crate::models::UnifiedTrack;
use crate::resolver::SongSuggestion;
use serde::{Deserialize, Serialize};

/// Display band for an affinity signal or a blend score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffinityLevel {
    High,
    Medium,
    Low,
    None,
}

impl AffinityLevel {
    /// Numeric strength in `[0, 1]`.
    pub fn strength(self) -> f64 {
        match self {
            AffinityLevel::High => 1.0,
            AffinityLevel::Medium => 0.65,
            AffinityLevel::Low => 0.35,
            AffinityLevel::None => 0.0,
        }
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            AffinityLevel::High
        } else if score >= 0.4 {
            AffinityLevel::Medium
        } else if score > 0.0 {
            AffinityLevel::Low
        } else {
            AffinityLevel::None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AffinityLevel::High => "high",
            AffinityLevel::Medium => "medium",
            AffinityLevel::Low => "low",
            AffinityLevel::None => "none",
        }
    }
}

/// A generator-produced candidate with per-listener explanations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendCandidate {
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub user1_affinity: String,
    #[serde(default)]
    pub user2_affinity: String,
    /// Explicit band from the generator; overrides the text when present
    #[serde(default)]
    pub user1_level: Option<AffinityLevel>,
    #[serde(default)]
    pub user2_level: Option<AffinityLevel>,
}

impl BlendCandidate {
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        user1_affinity: impl Into<String>,
        user2_affinity: impl Into<String>,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            reason: String::new(),
            user1_affinity: user1_affinity.into(),
            user2_affinity: user2_affinity.into(),
            user1_level: None,
            user2_level: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_levels(mut self, user1: AffinityLevel, user2: AffinityLevel) -> Self {
        self.user1_level = Some(user1);
        self.user2_level = Some(user2);
        self
    }

    pub fn suggestion(&self) -> SongSuggestion {
        SongSuggestion::new(&self.track_name, &self.artist_name, &self.reason)
    }
}

#[derive(Debug, Clone)]
pub struct BlendRequest {
    pub user1: ListenerProfile,
    pub user2: ListenerProfile,
    /// Generator-supplied; a default is derived from the names when absent
    pub blend_name: Option<String>,
    pub blend_analysis: Option<String>,
    pub candidates: Vec<BlendCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendRecommendation {
    pub track_name: String,
    pub artist_name: String,
    pub reason: String,
    pub user1_affinity: String,
    pub user2_affinity: String,
    /// In `[0, 1]`
    pub blend_score: f64,
    pub matched_track: Option<UnifiedTrack>,
    pub preview_url: Option<String>,
}

impl BlendRecommendation {
    pub fn is_resolved(&self) -> bool {
        self.matched_track.is_some()
    }

    pub fn band(&self) -> AffinityLevel {
        AffinityLevel::from_score(self.blend_score)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendResult {
    pub blend_name: String,
    pub blend_analysis: String,
    pub compatibility: TasteMatch,
    /// Sorted by non-increasing `blend_score`
    pub recommendations: Vec<BlendRecommendation>,
}

impl BlendResult {
    /// Tracks eligible for a saved playlist; unresolved songs stay visible
    /// in `recommendations` but are excluded here.
    pub fn saveable_tracks(&self) -> Vec<&UnifiedTrack> {
        self.recommendations
            .iter()
            .filter_map(|r| r.matched_track.as_ref())
            .collect()
    }

    pub fn can_save_playlist(&self) -> bool {
        self.recommendations.iter().any(|r| r.is_resolved())
    }

    pub fn resolved_count(&self) -> usize {
        self.recommendations.iter().filter(|r| r.is_resolved()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_score_bands() {
        assert_eq!(AffinityLevel::from_score(1.0), AffinityLevel::High);
        assert_eq!(AffinityLevel::from_score(0.7), AffinityLevel::High);
        assert_eq!(AffinityLevel::from_score(0.5), AffinityLevel::Medium);
        assert_eq!(AffinityLevel::from_score(0.1), AffinityLevel::Low);
        assert_eq!(AffinityLevel::from_score(0.0), AffinityLevel::None);
    }

    #[test]
    fn test_candidate_deserializes_with_optional_fields() {
        let raw = r#"{"track_name":"Kyoto","artist_name":"Phoebe Bridgers","user1_affinity":"loves sad indie","user2_level":"low"}"#;
        let candidate: BlendCandidate = serde_json::from_str(raw).unwrap();
        assert_eq!(candidate.user2_affinity, "");
        assert_eq!(candidate.user2_level, Some(AffinityLevel::Low));
        assert_eq!(candidate.suggestion().track_name, "Kyoto");
    }
}
