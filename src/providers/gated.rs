//! Capability-checked entry points.
//!
//! Reads against an unsupported capability return empty without touching the
//! provider. Mutations against an unsupported capability return
//! [`CoreError::Unsupported`].

use crate::errors::{CoreError, ProviderResult};
use crate::models::{CurrentlyPlaying, TimeRange, UnifiedArtist, UnifiedPlaylist, UnifiedTrack};
use crate::providers::traits::CatalogProvider;

pub async fn currently_playing(
    provider: &dyn CatalogProvider,
) -> ProviderResult<Option<CurrentlyPlaying>> {
    if !provider.capabilities().supports_currently_playing {
        log::debug!("{} has no currently-playing support", provider.name());
        return Ok(None);
    }
    provider.get_currently_playing().await
}

pub async fn recently_played(
    provider: &dyn CatalogProvider,
    limit: u32,
) -> ProviderResult<Vec<UnifiedTrack>> {
    if !provider.capabilities().supports_recently_played {
        return Ok(Vec::new());
    }
    provider.get_recently_played(limit).await
}

pub async fn top_artists(
    provider: &dyn CatalogProvider,
    time_range: TimeRange,
    limit: u32,
) -> ProviderResult<Vec<UnifiedArtist>> {
    if !provider.capabilities().supports_top_items {
        return Ok(Vec::new());
    }
    provider.get_top_artists(time_range, limit).await
}

pub async fn top_tracks(
    provider: &dyn CatalogProvider,
    time_range: TimeRange,
    limit: u32,
) -> ProviderResult<Vec<UnifiedTrack>> {
    if !provider.capabilities().supports_top_items {
        return Ok(Vec::new());
    }
    provider.get_top_tracks(time_range, limit).await
}

pub async fn create_playlist(
    provider: &dyn CatalogProvider,
    name: &str,
    description: Option<&str>,
) -> ProviderResult<UnifiedPlaylist> {
    if !provider.capabilities().supports_playlist_creation {
        return Err(CoreError::Unsupported(format!(
            "{} cannot create playlists",
            provider.name()
        )));
    }
    provider.create_playlist(name, description).await
}

pub async fn add_tracks_to_playlist(
    provider: &dyn CatalogProvider,
    playlist_id: &str,
    track_uris: &[String],
) -> ProviderResult<()> {
    if !provider.capabilities().supports_playlist_creation {
        return Err(CoreError::Unsupported(format!(
            "{} cannot modify playlists",
            provider.name()
        )));
    }
    if track_uris.is_empty() {
        return Ok(());
    }
    provider.add_tracks_to_playlist(playlist_id, track_uris).await
}
