//! Track resolver implementation.
//!
//! Turns free-text suggestions into catalog tracks:
//! 1. One catalog search per suggestion, `"{track} {artist}"`, top hit wins
//! 2. Fallback preview lookup for every named song still lacking a preview
//!
//! Searches fan out through [`run_ordered`] so the output lines up with the
//! input no matter which search finishes first.

use crate::batch::{run_ordered, BatchSummary, UnitOutcome};
use crate::config::BatchConfig;
use crate::errors::CoreError;
use crate::models::UnifiedTrack;
use crate::preview::{PreviewProvider, PreviewQuery};
use crate::providers::traits::CatalogProvider;
use crate::resolver::types::{ResolvedSong, SongSuggestion};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Only the provider's top hit is used.
const SEARCH_LIMIT: u32 = 1;

pub struct TrackResolver {
    catalog: Arc<dyn CatalogProvider>,
    previews: Option<Arc<dyn PreviewProvider>>,
    config: BatchConfig,
}

impl TrackResolver {
    pub fn new(catalog: Arc<dyn CatalogProvider>, config: BatchConfig) -> Self {
        Self {
            catalog,
            previews: None,
            config,
        }
    }

    pub fn with_previews(mut self, previews: Arc<dyn PreviewProvider>) -> Self {
        self.previews = Some(previews);
        self
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.catalog
    }

    /// Resolve a batch, one [`ResolvedSong`] per input in input order.
    ///
    /// Individual misses and failures come back unresolved. Errors only when
    /// cancelled, or when every search that was attempted failed.
    pub async fn resolve(
        &self,
        suggestions: &[SongSuggestion],
        cancel: &CancellationToken,
    ) -> Result<Vec<ResolvedSong>, CoreError> {
        if suggestions.is_empty() {
            return Ok(Vec::new());
        }

        log::info!(
            "[Resolver] Resolving {} suggestions against {}",
            suggestions.len(),
            self.catalog.name()
        );

        let outcomes = run_ordered(
            suggestions.to_vec(),
            &self.config,
            cancel,
            |_, suggestion| async move { self.match_one(&suggestion).await },
        )
        .await?;

        let attempted = suggestions.iter().filter(|s| s.has_title()).count();
        let summary = BatchSummary::from_outcomes(&outcomes);
        let failed = summary.failed + summary.timed_out;
        if attempted > 0 && failed == attempted {
            log::warn!("[Resolver] All {} searches failed", attempted);
            return Err(CoreError::AllSourcesFailed { attempted });
        }

        let mut resolved: Vec<ResolvedSong> = suggestions
            .iter()
            .zip(outcomes)
            .map(|(suggestion, outcome)| Self::into_resolved(suggestion.clone(), outcome))
            .collect();

        let fallback_count = self.fill_previews(&mut resolved, cancel).await?;

        log::info!(
            "[Resolver] {}/{} resolved, {} failed, {} previews from fallback",
            resolved.iter().filter(|r| r.is_resolved()).count(),
            resolved.len(),
            failed,
            fallback_count
        );

        Ok(resolved)
    }

    /// Resolve a single suggestion; never cancelled.
    pub async fn resolve_one(&self, suggestion: SongSuggestion) -> Result<ResolvedSong, CoreError> {
        let mut out = self
            .resolve(std::slice::from_ref(&suggestion), &CancellationToken::new())
            .await?;
        Ok(out.pop().unwrap_or_else(|| ResolvedSong::unresolved(suggestion)))
    }

    async fn match_one(&self, suggestion: &SongSuggestion) -> Result<Option<UnifiedTrack>, CoreError> {
        if !suggestion.has_title() {
            log::debug!("[Resolver] Skipping suggestion with empty title");
            return Ok(None);
        }

        let query = suggestion.search_query();
        let results = self.catalog.search_tracks(&query, SEARCH_LIMIT).await;
        match results {
            Ok(tracks) => {
                let top = tracks.into_iter().next();
                if top.is_none() {
                    log::debug!("[Resolver] No match for '{}'", query);
                }
                Ok(top)
            }
            Err(CoreError::NotFound(_)) => Ok(None),
            Err(e) => {
                log::debug!("[Resolver] Search failed for '{}': {}", query, e);
                Err(e)
            }
        }
    }

    fn into_resolved(suggestion: SongSuggestion, outcome: UnitOutcome<Option<UnifiedTrack>>) -> ResolvedSong {
        let matched_track = outcome.into_completed().flatten();
        let preview_url = matched_track.as_ref().and_then(|t| t.preview_url.clone());
        ResolvedSong {
            suggestion,
            matched_track,
            preview_url,
        }
    }

    /// Merge fallback previews into songs still lacking one. Returns how many
    /// were filled.
    async fn fill_previews(
        &self,
        resolved: &mut [ResolvedSong],
        cancel: &CancellationToken,
    ) -> Result<usize, CoreError> {
        let Some(previews) = self.previews.as_ref() else {
            return Ok(0);
        };

        let mut seen = HashSet::new();
        let queries: Vec<PreviewQuery> = resolved
            .iter()
            .filter(|r| r.preview_url.is_none() && r.suggestion.has_title())
            .map(|r| PreviewQuery::new(r.track_name(), r.artist_name()))
            .filter(|q| seen.insert(q.key()))
            .collect();

        if queries.is_empty() {
            return Ok(0);
        }

        let found = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CoreError::Cancelled),
            found = previews.lookup(&queries) => found,
        };

        let mut filled = 0;
        for song in resolved.iter_mut().filter(|r| r.preview_url.is_none()) {
            let key = PreviewQuery::new(song.track_name(), song.artist_name()).key();
            if let Some(url) = found.get(&key) {
                song.preview_url = Some(url.clone());
                filled += 1;
            }
        }
        Ok(filled)
    }
}
