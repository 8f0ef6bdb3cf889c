//! Provider-agnostic catalog records.
//!
//! Every record carries the originating [`ServiceType`] and the provider's own
//! `original_id`. Equality and hashing use only that pair, so the same catalog
//! item fetched twice compares equal even when cosmetic fields differ.

use crate::providers::types::ServiceType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Fresh id for a record built during one normalization call.
pub fn new_local_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identity shared by all unified records.
pub trait CatalogIdentity {
    fn service_type(&self) -> ServiceType;
    fn original_id(&self) -> &str;
}

macro_rules! identity_eq {
    ($ty:ty) => {
        impl CatalogIdentity for $ty {
            fn service_type(&self) -> ServiceType {
                self.service_type
            }

            fn original_id(&self) -> &str {
                &self.original_id
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.service_type == other.service_type && self.original_id == other.original_id
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.service_type.hash(state);
                self.original_id.hash(state);
            }
        }
    };
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedTrack {
    pub id: String,
    pub service_type: ServiceType,
    pub original_id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album_name: Option<String>,
    pub image_url: Option<String>,
    pub duration_ms: u64,
    pub explicit: bool,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
    /// Provider URI used when mutating playlists (e.g. "spotify:track:...")
    pub uri: Option<String>,
}

impl UnifiedTrack {
    /// Artist names joined for display, "A, B".
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedArtist {
    pub id: String,
    pub service_type: ServiceType,
    pub original_id: String,
    pub name: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub followers: Option<u64>,
    pub external_url: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedAlbum {
    pub id: String,
    pub service_type: ServiceType,
    pub original_id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub image_url: Option<String>,
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
    pub external_url: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedPlaylist {
    pub id: String,
    pub service_type: ServiceType,
    pub original_id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub image_url: Option<String>,
    pub track_count: u32,
    pub external_url: Option<String>,
    pub uri: Option<String>,
}

identity_eq!(UnifiedTrack);
identity_eq!(UnifiedArtist);
identity_eq!(UnifiedAlbum);
identity_eq!(UnifiedPlaylist);

/// Drop later records whose identity was already seen, keeping input order.
pub fn dedup_by_identity<T: CatalogIdentity>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<(ServiceType, String)> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert((item.service_type(), item.original_id().to_string())))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Roughly the last four weeks
    ShortTerm,
    /// Roughly the last six months
    #[default]
    MediumTerm,
    /// Several years of history
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub track: UnifiedTrack,
    pub progress_ms: u64,
    pub is_playing: bool,
}
