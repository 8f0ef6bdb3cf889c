use crate::errors::{CoreError, ProviderResult};
use crate::models::{
    CurrentlyPlaying, TimeRange, UnifiedAlbum, UnifiedArtist, UnifiedPlaylist, UnifiedTrack,
};
use crate::providers::types::{Capabilities, ServiceType};
use async_trait::async_trait;

/// Contract every music catalog implements.
///
/// Optional read operations default to an empty result so that a provider
/// lacking a capability never fails the caller. Mutations default to
/// [`CoreError::Unsupported`].
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn service_type(&self) -> ServiceType;

    /// User-friendly name
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Search
    async fn search_tracks(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedTrack>>;
    async fn search_artists(&self, query: &str, limit: u32)
        -> ProviderResult<Vec<UnifiedArtist>>;
    async fn search_albums(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedAlbum>>;
    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedPlaylist>>;

    /// Listening state
    async fn get_currently_playing(&self) -> ProviderResult<Option<CurrentlyPlaying>> {
        Ok(None)
    }

    async fn get_recently_played(&self, _limit: u32) -> ProviderResult<Vec<UnifiedTrack>> {
        Ok(Vec::new())
    }

    async fn get_top_artists(
        &self,
        _time_range: TimeRange,
        _limit: u32,
    ) -> ProviderResult<Vec<UnifiedArtist>> {
        Ok(Vec::new())
    }

    async fn get_top_tracks(
        &self,
        _time_range: TimeRange,
        _limit: u32,
    ) -> ProviderResult<Vec<UnifiedTrack>> {
        Ok(Vec::new())
    }

    /// Metadata
    async fn get_artist_top_tracks(&self, artist_id: &str) -> ProviderResult<Vec<UnifiedTrack>>;
    async fn get_artist_albums(&self, artist_id: &str) -> ProviderResult<Vec<UnifiedAlbum>>;
    async fn get_album_tracks(&self, album_id: &str) -> ProviderResult<Vec<UnifiedTrack>>;

    /// Library
    async fn get_user_playlists(&self, limit: u32) -> ProviderResult<Vec<UnifiedPlaylist>>;
    async fn get_playlist_tracks(&self, playlist_id: &str) -> ProviderResult<Vec<UnifiedTrack>>;

    async fn create_playlist(
        &self,
        _name: &str,
        _description: Option<&str>,
    ) -> ProviderResult<UnifiedPlaylist> {
        Err(CoreError::Unsupported(format!(
            "{} cannot create playlists",
            self.name()
        )))
    }

    /// Adds tracks by provider URI (see [`crate::providers::track_uri`]).
    async fn add_tracks_to_playlist(
        &self,
        _playlist_id: &str,
        _track_uris: &[String],
    ) -> ProviderResult<()> {
        Err(CoreError::Unsupported(format!(
            "{} cannot modify playlists",
            self.name()
        )))
    }

    async fn add_track_to_playlist(&self, playlist_id: &str, track_uri: &str) -> ProviderResult<()> {
        self.add_tracks_to_playlist(playlist_id, &[track_uri.to_string()])
            .await
    }
}
