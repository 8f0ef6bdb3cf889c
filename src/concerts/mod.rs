//! Ranked concert feed for a listener's favourite artists.

pub mod normalize;
pub mod ranker;
pub mod ticketmaster;
pub mod types;

use async_trait::async_trait;

use crate::errors::ProviderResult;
use crate::models::UnifiedArtist;

pub use normalize::normalize_event;
pub use ranker::ConcertRanker;
pub use ticketmaster::TicketmasterEvents;
pub use types::{Concert, PriceRange, RankedArtist, RankedConcert, RawEvent};

/// A source of upcoming events for one artist at a time.
#[async_trait]
pub trait EventsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Upcoming events for `artist`. `location_hint` is a city the source
    /// may use to narrow results; sources are free to ignore it.
    async fn events_for_artist(
        &self,
        artist: &UnifiedArtist,
        location_hint: Option<&str>,
    ) -> ProviderResult<Vec<RawEvent>>;
}

/// Shows in the listener's home city.
pub fn home_city_count(feed: &[RankedConcert]) -> usize {
    feed.iter().filter(|c| c.is_home_city).count()
}

/// Feed entries for one artist, in feed order.
pub fn for_artist<'a>(feed: &'a [RankedConcert], artist_name: &str) -> Vec<&'a RankedConcert> {
    let target = artist_name.trim().to_lowercase();
    feed.iter()
        .filter(|c| c.concert.artist_name.trim().to_lowercase() == target)
        .collect()
}
