//! Catalog abstraction: one capability-gated interface over every music
//! service, normalizing provider records into the unified schema.

pub mod gated;
pub mod identity;
pub mod manager;
pub mod traits;
pub mod types;

pub use identity::{
    album_external_url, artist_external_url, external_url, playlist_external_url, track_uri,
};
pub use manager::{ProviderConfig, ProviderManager};
pub use traits::CatalogProvider;
pub use types::{Capabilities, ServiceType};
