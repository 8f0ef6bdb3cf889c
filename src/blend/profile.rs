//! Listener identity and taste compatibility between two listeners.

use crate::errors::ProviderResult;
use crate::models::{TimeRange, UnifiedArtist, UnifiedTrack};
use crate::providers::gated;
use crate::providers::traits::CatalogProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ARTIST_WEIGHT: f64 = 0.7;
const TRACK_WEIGHT: f64 = 0.3;

/// One listener's top artists and tracks, best first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListenerProfile {
    pub display_name: String,
    pub top_artists: Vec<UnifiedArtist>,
    pub top_tracks: Vec<UnifiedTrack>,
}

impl ListenerProfile {
    pub fn new(
        display_name: impl Into<String>,
        top_artists: Vec<UnifiedArtist>,
        top_tracks: Vec<UnifiedTrack>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            top_artists,
            top_tracks,
        }
    }

    /// Pull top items from a catalog. Catalogs without top-item support
    /// yield an empty profile.
    pub async fn fetch(
        provider: &dyn CatalogProvider,
        display_name: impl Into<String>,
        time_range: TimeRange,
        limit: u32,
    ) -> ProviderResult<Self> {
        let (artists, tracks) = tokio::join!(
            gated::top_artists(provider, time_range, limit),
            gated::top_tracks(provider, time_range, limit)
        );
        Ok(Self::new(display_name, artists?, tracks?))
    }

    pub fn is_empty(&self) -> bool {
        self.top_artists.is_empty() && self.top_tracks.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasteMatch {
    /// In `[0, 1]`, symmetric
    pub score: f64,
    pub shared_artists: Vec<String>,
    pub shared_tracks: Vec<String>,
}

impl TasteMatch {
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn rank_weight(position: usize) -> f64 {
    1.0 / (position as f64 + 1.0)
}

/// Rank-weighted overlap of two ordered name lists.
///
/// Returns the overlap in `[0, 1]` and the shared display names, heaviest
/// first. Names are compared case-insensitively so listeners on different
/// catalogs still match.
fn weighted_overlap(a: &[String], b: &[String]) -> (f64, Vec<String>) {
    let index = |list: &[String]| -> HashMap<String, (usize, String)> {
        let mut map = HashMap::new();
        for (i, name) in list.iter().enumerate() {
            map.entry(normalize(name)).or_insert((i, name.clone()));
        }
        map
    };
    let left = index(a);
    let right = index(b);

    let total: f64 = left.values().map(|(i, _)| rank_weight(*i)).sum::<f64>()
        + right.values().map(|(i, _)| rank_weight(*i)).sum::<f64>();
    if total == 0.0 {
        return (0.0, Vec::new());
    }

    let mut shared: Vec<(f64, String)> = left
        .iter()
        .filter_map(|(key, (i, display))| {
            right
                .get(key)
                .map(|(j, _)| (rank_weight(*i) + rank_weight(*j), display.clone()))
        })
        .collect();
    shared.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| x.1.cmp(&y.1)));

    let overlap: f64 = shared.iter().map(|(w, _)| w).sum();
    (
        (overlap / total).clamp(0.0, 1.0),
        shared.into_iter().map(|(_, name)| name).collect(),
    )
}

fn track_key(track: &UnifiedTrack) -> String {
    format!("{} - {}", track.name, track.primary_artist().unwrap_or(""))
}

/// How similar two listeners' tastes are.
pub fn taste_compatibility(a: &ListenerProfile, b: &ListenerProfile) -> TasteMatch {
    let artists_a: Vec<String> = a.top_artists.iter().map(|x| x.name.clone()).collect();
    let artists_b: Vec<String> = b.top_artists.iter().map(|x| x.name.clone()).collect();
    let tracks_a: Vec<String> = a.top_tracks.iter().map(track_key).collect();
    let tracks_b: Vec<String> = b.top_tracks.iter().map(track_key).collect();

    let (artist_score, shared_artists) = weighted_overlap(&artists_a, &artists_b);
    let (track_score, shared_tracks) = weighted_overlap(&tracks_a, &tracks_b);

    let has_artists = !artists_a.is_empty() || !artists_b.is_empty();
    let has_tracks = !tracks_a.is_empty() || !tracks_b.is_empty();

    let score = match (has_artists, has_tracks) {
        (true, true) => ARTIST_WEIGHT * artist_score + TRACK_WEIGHT * track_score,
        (true, false) => artist_score,
        (false, true) => track_score,
        (false, false) => 0.0,
    };

    TasteMatch {
        score,
        shared_artists,
        shared_tracks,
    }
}
