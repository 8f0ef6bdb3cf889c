//! Concert ranker.
//!
//! Fetches upcoming events for each ranked artist in parallel, normalizes
//! them, collapses duplicate listings of the same show, and orders the feed:
//! home-city shows first, then by artist rank, then by date.

use crate::batch::{run_ordered, BatchSummary};
use crate::concerts::normalize::normalize_event;
use crate::concerts::types::{Concert, ConcertKey, RankedArtist, RankedConcert};
use crate::concerts::EventsProvider;
use crate::config::ConcertConfig;
use crate::errors::CoreError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct ConcertRanker {
    events: Arc<dyn EventsProvider>,
}

impl ConcertRanker {
    pub fn new(events: Arc<dyn EventsProvider>) -> Self {
        Self { events }
    }

    /// Build the ranked feed.
    ///
    /// One artist's fetch failing only removes that artist's shows. The call
    /// fails with [`CoreError::AllSourcesFailed`] only when every fetch failed.
    pub async fn rank(
        &self,
        artists: &[RankedArtist],
        config: &ConcertConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<RankedConcert>, CoreError> {
        let eligible = eligible_artists(artists, config.artist_rank_cap);
        if eligible.is_empty() {
            return Ok(Vec::new());
        }

        let home_city = config.home_city.trim();
        let hint = (!home_city.is_empty()).then_some(home_city);

        log::info!(
            "[Concerts] Fetching events for {} artists via {}",
            eligible.len(),
            self.events.name()
        );

        let outcomes = run_ordered(eligible.clone(), &config.batch, cancel, |_, ranked| async move {
            self.events.events_for_artist(&ranked.artist, hint).await
        })
        .await?;

        let summary = BatchSummary::from_outcomes(&outcomes);
        if summary.all_failed() {
            log::warn!("[Concerts] Every events fetch failed ({})", summary.total());
            return Err(CoreError::AllSourcesFailed {
                attempted: summary.total(),
            });
        }

        let mut feed: Vec<RankedConcert> = Vec::new();
        let mut seen: HashMap<ConcertKey, usize> = HashMap::new();
        let mut duplicates = 0usize;

        for (ranked, outcome) in eligible.iter().zip(outcomes) {
            let Some(raw_events) = outcome.into_completed() else {
                log::debug!("[Concerts] No events for '{}' (fetch failed)", ranked.artist.name);
                continue;
            };

            for raw in raw_events {
                let Some(concert) = normalize_event(raw, &ranked.artist) else {
                    continue;
                };
                let key = concert.identity_key();
                if let Some(&existing) = seen.get(&key) {
                    feed[existing].concert.absorb(concert);
                    duplicates += 1;
                    continue;
                }
                seen.insert(key, feed.len());
                feed.push(RankedConcert {
                    is_home_city: is_home_city(&concert, home_city),
                    artist_rank: ranked.rank,
                    concert,
                });
            }
        }

        sort_feed(&mut feed);

        log::info!(
            "[Concerts] {} concerts ({} home city, {} duplicates collapsed, {} fetches failed)",
            feed.len(),
            feed.iter().filter(|c| c.is_home_city).count(),
            duplicates,
            summary.failed + summary.timed_out
        );

        Ok(feed)
    }
}

/// Artists with a valid rank within the cap, best rank first.
fn eligible_artists(artists: &[RankedArtist], cap: usize) -> Vec<RankedArtist> {
    let mut eligible: Vec<RankedArtist> = artists
        .iter()
        .filter(|a| a.rank >= 1 && (a.rank as usize) <= cap)
        .cloned()
        .collect();
    if eligible.len() < artists.len() {
        log::warn!(
            "[Concerts] Ignoring {} artists outside rank cap {}",
            artists.len() - eligible.len(),
            cap
        );
    }
    eligible.sort_by_key(|a| a.rank);
    eligible
}

pub fn is_home_city(concert: &Concert, home_city: &str) -> bool {
    let home = home_city.trim();
    !home.is_empty() && concert.city.trim().to_lowercase() == home.to_lowercase()
}

/// Home city first, then artist rank, then date and start time.
pub fn sort_feed(feed: &mut [RankedConcert]) {
    feed.sort_by(|a, b| {
        b.is_home_city
            .cmp(&a.is_home_city)
            .then(a.artist_rank.cmp(&b.artist_rank))
            .then(a.concert.date.cmp(&b.concert.date))
            .then(a.concert.start_time.cmp(&b.concert.start_time))
    });
}
