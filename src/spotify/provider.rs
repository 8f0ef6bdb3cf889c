use crate::errors::{CoreError, ProviderResult};
use crate::models::{
    new_local_id, CurrentlyPlaying, TimeRange, UnifiedAlbum, UnifiedArtist, UnifiedPlaylist,
    UnifiedTrack,
};
use crate::providers::traits::CatalogProvider;
use crate::providers::types::{Capabilities, ServiceType};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::client::SpotifyClient;
use super::models::*;

/// Spotify accepts at most 100 URIs per add-items request.
const ADD_TRACKS_CHUNK: usize = 100;
const MAX_PAGE_LIMIT: u32 = 50;

const CAPABILITIES: Capabilities = Capabilities {
    supports_currently_playing: true,
    supports_top_items: true,
    supports_recently_played: true,
    supports_playlist_creation: true,
    requires_subscription: false,
};

pub struct SpotifyProvider {
    client: SpotifyClient,
}

impl SpotifyProvider {
    pub fn new(access_token: impl Into<String>) -> ProviderResult<Self> {
        Ok(Self {
            client: SpotifyClient::new(access_token)?,
        })
    }

    pub fn with_client(client: SpotifyClient) -> Self {
        Self { client }
    }

    /// Build from a `{"access_token": "..."}` provider config blob.
    pub fn from_config(config: &Value) -> ProviderResult<Self> {
        let token = config
            .get("access_token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Config("spotify: missing access_token".to_string()))?;
        Self::new(token)
    }

    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    fn limit_param(limit: u32) -> String {
        limit.clamp(1, MAX_PAGE_LIMIT).to_string()
    }

    async fn search(&self, query: &str, kind: &str, limit: u32) -> ProviderResult<SearchResponse> {
        let params = [
            ("q", query.to_string()),
            ("type", kind.to_string()),
            ("limit", Self::limit_param(limit)),
        ];
        Ok(self.client.get("/search", &params).await?)
    }
}

pub fn normalize_track(t: &SpotifyTrackObject) -> Option<UnifiedTrack> {
    let original_id = t.id.clone()?;
    Some(UnifiedTrack {
        id: new_local_id(),
        service_type: ServiceType::Spotify,
        original_id,
        name: t.name.clone(),
        artists: t.artists.iter().map(|a| a.name.clone()).collect(),
        album_name: t.album.as_ref().map(|a| a.name.clone()),
        image_url: t.album.as_ref().and_then(|a| best_image(&a.images)),
        duration_ms: t.duration_ms,
        explicit: t.explicit,
        preview_url: t.preview_url.clone().filter(|u| !u.is_empty()),
        external_url: t.external_urls.spotify.clone(),
        uri: t.uri.clone(),
    })
}

pub fn normalize_artist(a: &SpotifyArtistObject) -> UnifiedArtist {
    UnifiedArtist {
        id: new_local_id(),
        service_type: ServiceType::Spotify,
        original_id: a.id.clone(),
        name: a.name.clone(),
        image_url: best_image(&a.images),
        genres: a.genres.clone(),
        followers: a.followers.as_ref().and_then(|f| f.total),
        external_url: a.external_urls.spotify.clone(),
        uri: a.uri.clone(),
    }
}

pub fn normalize_album(a: &SimpleAlbum) -> Option<UnifiedAlbum> {
    Some(UnifiedAlbum {
        id: new_local_id(),
        service_type: ServiceType::Spotify,
        original_id: a.id.clone()?,
        name: a.name.clone(),
        artists: a.artists.iter().map(|ar| ar.name.clone()).collect(),
        image_url: best_image(&a.images),
        release_date: a.release_date.clone(),
        track_count: a.total_tracks,
        external_url: a.external_urls.spotify.clone(),
        uri: a.uri.clone(),
    })
}

pub fn normalize_playlist(p: &SpotifyPlaylistObject) -> UnifiedPlaylist {
    UnifiedPlaylist {
        id: new_local_id(),
        service_type: ServiceType::Spotify,
        original_id: p.id.clone(),
        name: p.name.clone(),
        description: p.description.clone().filter(|d| !d.is_empty()),
        owner: p.owner.as_ref().and_then(|o| o.display_name.clone()),
        image_url: p.images.as_deref().and_then(best_image),
        track_count: p.tracks.as_ref().map(|t| t.total).unwrap_or(0),
        external_url: p.external_urls.spotify.clone(),
        uri: p.uri.clone(),
    }
}

#[async_trait]
impl CatalogProvider for SpotifyProvider {
    fn service_type(&self) -> ServiceType {
        ServiceType::Spotify
    }

    fn name(&self) -> &str {
        "Spotify"
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedTrack>> {
        let res = self.search(query, "track", limit).await?;
        Ok(res
            .tracks
            .map(|p| p.items.iter().filter_map(normalize_track).collect())
            .unwrap_or_default())
    }

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedArtist>> {
        let res = self.search(query, "artist", limit).await?;
        Ok(res
            .artists
            .map(|p| p.items.iter().map(normalize_artist).collect())
            .unwrap_or_default())
    }

    async fn search_albums(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedAlbum>> {
        let res = self.search(query, "album", limit).await?;
        Ok(res
            .albums
            .map(|p| p.items.iter().filter_map(normalize_album).collect())
            .unwrap_or_default())
    }

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedPlaylist>> {
        let res = self.search(query, "playlist", limit).await?;
        Ok(res
            .playlists
            .map(|p| p.items.iter().flatten().map(normalize_playlist).collect())
            .unwrap_or_default())
    }

    async fn get_currently_playing(&self) -> ProviderResult<Option<CurrentlyPlaying>> {
        let res: Option<CurrentlyPlayingResponse> = self
            .client
            .get_optional("/me/player/currently-playing", &[])
            .await?;

        Ok(res.and_then(|r| {
            let track = r.item.as_ref().and_then(normalize_track)?;
            Some(CurrentlyPlaying {
                track,
                progress_ms: r.progress_ms.unwrap_or(0),
                is_playing: r.is_playing,
            })
        }))
    }

    async fn get_recently_played(&self, limit: u32) -> ProviderResult<Vec<UnifiedTrack>> {
        let page: Paging<PlayHistoryItem> = self
            .client
            .get(
                "/me/player/recently-played",
                &[("limit", Self::limit_param(limit))],
            )
            .await?;
        Ok(page.items.iter().filter_map(|i| normalize_track(&i.track)).collect())
    }

    async fn get_top_artists(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedArtist>> {
        let page: Paging<SpotifyArtistObject> = self
            .client
            .get(
                "/me/top/artists",
                &[
                    ("time_range", time_range.as_str().to_string()),
                    ("limit", Self::limit_param(limit)),
                ],
            )
            .await?;
        Ok(page.items.iter().map(normalize_artist).collect())
    }

    async fn get_top_tracks(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedTrack>> {
        let page: Paging<SpotifyTrackObject> = self
            .client
            .get(
                "/me/top/tracks",
                &[
                    ("time_range", time_range.as_str().to_string()),
                    ("limit", Self::limit_param(limit)),
                ],
            )
            .await?;
        Ok(page.items.iter().filter_map(normalize_track).collect())
    }

    async fn get_artist_top_tracks(&self, artist_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        let path = format!("/artists/{}/top-tracks", urlencoding::encode(artist_id));
        let res: TopTracksResponse = self.client.get(&path, &[]).await?;
        Ok(res.tracks.iter().filter_map(normalize_track).collect())
    }

    async fn get_artist_albums(&self, artist_id: &str) -> ProviderResult<Vec<UnifiedAlbum>> {
        let path = format!("/artists/{}/albums", urlencoding::encode(artist_id));
        let page: Paging<SimpleAlbum> = self
            .client
            .get(
                &path,
                &[
                    ("include_groups", "album,single".to_string()),
                    ("limit", MAX_PAGE_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(page.items.iter().filter_map(normalize_album).collect())
    }

    async fn get_album_tracks(&self, album_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        let path = format!("/albums/{}/tracks", urlencoding::encode(album_id));
        let page: Paging<SpotifyTrackObject> = self
            .client
            .get(&path, &[("limit", MAX_PAGE_LIMIT.to_string())])
            .await?;
        Ok(page.items.iter().filter_map(normalize_track).collect())
    }

    async fn get_user_playlists(&self, limit: u32) -> ProviderResult<Vec<UnifiedPlaylist>> {
        let page: Paging<Option<SpotifyPlaylistObject>> = self
            .client
            .get("/me/playlists", &[("limit", Self::limit_param(limit))])
            .await?;
        Ok(page.items.iter().flatten().map(normalize_playlist).collect())
    }

    async fn get_playlist_tracks(&self, playlist_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        let path = format!("/playlists/{}/tracks", urlencoding::encode(playlist_id));
        let page: Paging<PlaylistItem> = self
            .client
            .get(&path, &[("limit", "100".to_string())])
            .await?;
        Ok(page
            .items
            .iter()
            .filter_map(|i| i.track.as_ref().and_then(normalize_track))
            .collect())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> ProviderResult<UnifiedPlaylist> {
        log::info!("Creating Spotify playlist '{}'", name);
        let body = json!({
            "name": name,
            "description": description.unwrap_or(""),
            "public": false,
        });
        let created: SpotifyPlaylistObject = self.client.post("/me/playlists", body).await?;
        Ok(normalize_playlist(&created))
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> ProviderResult<()> {
        let path = format!("/playlists/{}/tracks", urlencoding::encode(playlist_id));
        for chunk in track_uris.chunks(ADD_TRACKS_CHUNK) {
            let _: SnapshotResponse = self.client.post(&path, json!({ "uris": chunk })).await?;
        }
        log::info!(
            "Added {} tracks to Spotify playlist {}",
            track_uris.len(),
            playlist_id
        );
        Ok(())
    }
}
