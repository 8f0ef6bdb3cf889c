//! Data types for concert ranking.

use crate::models::UnifiedArtist;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Caller-ordered artist preference; rank 1 is the favourite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedArtist {
    pub artist: UnifiedArtist,
    pub rank: u32,
}

impl RankedArtist {
    pub fn new(artist: UnifiedArtist, rank: u32) -> Self {
        Self { artist, rank }
    }

    /// Assign dense 1-based ranks in list order.
    pub fn from_ordered(artists: Vec<UnifiedArtist>) -> Vec<Self> {
        artists
            .into_iter()
            .enumerate()
            .map(|(i, artist)| Self::new(artist, i as u32 + 1))
            .collect()
    }
}

/// Event record as an events source returns it, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_name: Option<String>,
    pub artist_name: Option<String>,
    pub artist_image_url: Option<String>,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// `YYYY-MM-DD`, or an RFC 3339 timestamp
    pub date: Option<String>,
    /// `HH:MM[:SS]`
    pub time: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub currency: Option<String>,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concert {
    pub artist_name: String,
    pub artist_image_url: Option<String>,
    pub venue_name: String,
    pub address: Option<String>,
    pub city: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub price_range: Option<PriceRange>,
    pub ticket_url: Option<String>,
}

/// Dedup identity: normalized artist and venue names plus the date.
pub type ConcertKey = (String, String, NaiveDate);

impl Concert {
    pub fn identity_key(&self) -> ConcertKey {
        (
            self.artist_name.trim().to_lowercase(),
            self.venue_name.trim().to_lowercase(),
            self.date,
        )
    }

    /// Fill fields this listing lacks from a duplicate listing of the same show.
    pub fn absorb(&mut self, other: Concert) {
        if self.ticket_url.is_none() {
            self.ticket_url = other.ticket_url;
        }
        if self.price_range.is_none() {
            self.price_range = other.price_range;
        }
        if self.start_time.is_none() {
            self.start_time = other.start_time;
        }
        if self.address.is_none() {
            self.address = other.address;
        }
        if self.artist_image_url.is_none() {
            self.artist_image_url = other.artist_image_url;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedConcert {
    pub concert: Concert,
    pub artist_rank: u32,
    pub is_home_city: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::artist;

    #[test]
    fn test_from_ordered_assigns_dense_ranks() {
        let ranked = RankedArtist::from_ordered(vec![artist("Mitski"), artist("Lorde"), artist("Muna")]);
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}
