//! Blend engine.
//!
//! Takes two listener profiles plus generator candidates and produces a
//! scored, resolved [`BlendResult`]. The engine never invents songs or
//! explanations; it resolves, scores and orders what it is given.

use crate::blend::profile::{taste_compatibility, TasteMatch};
use crate::blend::scoring::score_candidate;
use crate::blend::types::{BlendCandidate, BlendRecommendation, BlendRequest, BlendResult};
use crate::config::BlendConfig;
use crate::errors::{CoreError, ProviderResult};
use crate::models::UnifiedPlaylist;
use crate::providers::traits::CatalogProvider;
use crate::providers::{gated, track_uri};
use crate::resolver::{ResolvedSong, SongSuggestion, TrackResolver};
use tokio_util::sync::CancellationToken;

pub struct BlendEngine {
    resolver: TrackResolver,
    config: BlendConfig,
}

impl BlendEngine {
    pub fn new(resolver: TrackResolver, config: BlendConfig) -> Self {
        Self { resolver, config }
    }

    pub async fn blend(
        &self,
        request: BlendRequest,
        cancel: &CancellationToken,
    ) -> Result<BlendResult, CoreError> {
        let mut candidates = request.candidates;
        if candidates.len() > self.config.max_recommendations {
            log::debug!(
                "[Blend] Truncating {} candidates to {}",
                candidates.len(),
                self.config.max_recommendations
            );
            candidates.truncate(self.config.max_recommendations);
        }

        log::info!(
            "[Blend] Building blend for {} + {} from {} candidates",
            request.user1.display_name,
            request.user2.display_name,
            candidates.len()
        );

        let suggestions: Vec<SongSuggestion> =
            candidates.iter().map(BlendCandidate::suggestion).collect();
        let resolved = self.resolver.resolve(&suggestions, cancel).await?;

        let recommendations = rank_recommendations(candidates, resolved);
        let compatibility = taste_compatibility(&request.user1, &request.user2);

        let blend_name = request
            .blend_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                default_blend_name(&request.user1.display_name, &request.user2.display_name)
            });
        let blend_analysis = request
            .blend_analysis
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| default_analysis(&compatibility));

        let result = BlendResult {
            blend_name,
            blend_analysis,
            compatibility,
            recommendations,
        };

        log::info!(
            "[Blend] '{}' ready: {} recommendations, {} saveable, {}% match",
            result.blend_name,
            result.recommendations.len(),
            result.resolved_count(),
            result.compatibility.percent()
        );

        Ok(result)
    }
}

/// Score each candidate, attach its resolution, and order by descending
/// score. The sort is stable, so ties keep input order.
pub fn rank_recommendations(
    candidates: Vec<BlendCandidate>,
    resolved: Vec<ResolvedSong>,
) -> Vec<BlendRecommendation> {
    let mut recommendations: Vec<BlendRecommendation> = candidates
        .into_iter()
        .zip(resolved)
        .map(|(candidate, song)| BlendRecommendation {
            blend_score: score_candidate(&candidate),
            track_name: candidate.track_name,
            artist_name: candidate.artist_name,
            reason: candidate.reason,
            user1_affinity: candidate.user1_affinity,
            user2_affinity: candidate.user2_affinity,
            matched_track: song.matched_track,
            preview_url: song.preview_url,
        })
        .collect();

    recommendations.sort_by(|a, b| b.blend_score.total_cmp(&a.blend_score));
    recommendations
}

pub fn default_blend_name(user1: &str, user2: &str) -> String {
    format!("{} + {} Blend", user1.trim(), user2.trim())
}

fn default_analysis(compatibility: &TasteMatch) -> String {
    match compatibility.shared_artists.as_slice() {
        [] => format!("{}% taste match.", compatibility.percent()),
        [one] => format!("{}% taste match. You both listen to {}.", compatibility.percent(), one),
        [first, second, ..] => format!(
            "{}% taste match. You both listen to {} and {}.",
            compatibility.percent(),
            first,
            second
        ),
    }
}

/// Save the resolved part of a blend as a new playlist on `provider`.
///
/// Only tracks that came from the same catalog are added; unresolved songs
/// are never eligible.
pub async fn save_blend_playlist(
    provider: &dyn CatalogProvider,
    result: &BlendResult,
    name: &str,
    description: Option<&str>,
) -> ProviderResult<UnifiedPlaylist> {
    if !result.can_save_playlist() {
        return Err(CoreError::NotFound(
            "blend has no resolved tracks to save".to_string(),
        ));
    }

    let service = provider.service_type();
    let uris: Vec<String> = result
        .saveable_tracks()
        .into_iter()
        .filter(|t| t.service_type == service)
        .map(track_uri)
        .collect();
    if uris.is_empty() {
        return Err(CoreError::NotFound(format!(
            "blend has no tracks resolved on {}",
            provider.name()
        )));
    }

    let playlist = gated::create_playlist(provider, name, description).await?;
    gated::add_tracks_to_playlist(provider, &playlist.original_id, &uris).await?;

    log::info!(
        "[Blend] Saved '{}' to {} with {} tracks",
        name,
        provider.name(),
        uris.len()
    );
    Ok(playlist)
}
