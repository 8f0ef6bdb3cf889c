use crate::errors::{CoreError, ProviderResult};
use crate::models::{new_local_id, UnifiedAlbum, UnifiedArtist, UnifiedPlaylist, UnifiedTrack};
use crate::providers::traits::CatalogProvider;
use crate::providers::types::{Capabilities, ServiceType};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::client::AppleMusicClient;
use super::models::*;

const MAX_SEARCH_LIMIT: u32 = 25;
const DEFAULT_STOREFRONT: &str = "us";

/// No listening-state or top-item endpoints exist for this catalog.
const CAPABILITIES: Capabilities = Capabilities {
    supports_currently_playing: false,
    supports_top_items: false,
    supports_recently_played: true,
    supports_playlist_creation: true,
    requires_subscription: true,
};

pub struct AppleMusicProvider {
    client: AppleMusicClient,
}

impl AppleMusicProvider {
    pub fn new(
        developer_token: impl Into<String>,
        user_token: Option<String>,
        storefront: impl Into<String>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            client: AppleMusicClient::new(developer_token, user_token, storefront)?,
        })
    }

    /// Build from `{"developer_token", "user_token"?, "storefront"?}`.
    pub fn from_config(config: &Value) -> ProviderResult<Self> {
        let developer_token = config
            .get("developer_token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CoreError::Config("apple_music: missing developer_token".to_string())
            })?;
        let user_token = config
            .get("user_token")
            .and_then(|t| t.as_str())
            .map(str::to_string);
        let storefront = config
            .get("storefront")
            .and_then(|s| s.as_str())
            .unwrap_or(DEFAULT_STOREFRONT);

        Self::new(developer_token, user_token, storefront)
    }

    pub fn client(&self) -> &AppleMusicClient {
        &self.client
    }

    async fn search(&self, query: &str, kind: &str, limit: u32) -> ProviderResult<SearchResults> {
        let params = [
            ("term", query.to_string()),
            ("types", kind.to_string()),
            ("limit", limit.clamp(1, MAX_SEARCH_LIMIT).to_string()),
        ];
        let path = self.client.catalog_path("/search");
        let res: SearchResponse = self.client.get(&path, &params).await?;
        Ok(res.results)
    }
}

pub fn normalize_song(song: &Song) -> Option<UnifiedTrack> {
    let attrs = song.attributes.as_ref()?;
    Some(UnifiedTrack {
        id: new_local_id(),
        service_type: ServiceType::AppleMusic,
        original_id: song.id.clone(),
        name: attrs.name.clone(),
        artists: artist_credit(&attrs.artist_name),
        album_name: attrs.album_name.clone(),
        image_url: attrs.artwork.as_ref().map(|a| a.sized(ARTWORK_SIZE)),
        duration_ms: attrs.duration_in_millis.unwrap_or(0),
        explicit: attrs.content_rating.as_deref() == Some("explicit"),
        preview_url: attrs.previews.first().map(|p| p.url.clone()),
        external_url: attrs.url.clone(),
        uri: None,
    })
}

pub fn normalize_artist(artist: &Artist) -> Option<UnifiedArtist> {
    let attrs = artist.attributes.as_ref()?;
    Some(UnifiedArtist {
        id: new_local_id(),
        service_type: ServiceType::AppleMusic,
        original_id: artist.id.clone(),
        name: attrs.name.clone(),
        image_url: attrs.artwork.as_ref().map(|a| a.sized(ARTWORK_SIZE)),
        genres: attrs.genre_names.clone(),
        followers: None,
        external_url: attrs.url.clone(),
        uri: None,
    })
}

pub fn normalize_album(album: &Album) -> Option<UnifiedAlbum> {
    let attrs = album.attributes.as_ref()?;
    Some(UnifiedAlbum {
        id: new_local_id(),
        service_type: ServiceType::AppleMusic,
        original_id: album.id.clone(),
        name: attrs.name.clone(),
        artists: artist_credit(&attrs.artist_name),
        image_url: attrs.artwork.as_ref().map(|a| a.sized(ARTWORK_SIZE)),
        release_date: attrs.release_date.clone(),
        track_count: attrs.track_count,
        external_url: attrs.url.clone(),
        uri: None,
    })
}

pub fn normalize_playlist(playlist: &Playlist) -> Option<UnifiedPlaylist> {
    let attrs = playlist.attributes.as_ref()?;
    Some(UnifiedPlaylist {
        id: new_local_id(),
        service_type: ServiceType::AppleMusic,
        original_id: playlist.id.clone(),
        name: attrs.name.clone(),
        description: attrs.description.as_ref().and_then(|d| d.standard.clone()),
        owner: attrs.curator_name.clone(),
        image_url: attrs.artwork.as_ref().map(|a| a.sized(ARTWORK_SIZE)),
        track_count: 0,
        external_url: attrs.url.clone(),
        uri: None,
    })
}

/// Apple gives one display credit per song. Band names carry the same
/// `,` and `&` as collaborations, so the credit stays whole.
fn artist_credit(name: &str) -> Vec<String> {
    let name = name.trim();
    if name.is_empty() {
        Vec::new()
    } else {
        vec![name.to_string()]
    }
}

#[async_trait]
impl CatalogProvider for AppleMusicProvider {
    fn service_type(&self) -> ServiceType {
        ServiceType::AppleMusic
    }

    fn name(&self) -> &str {
        "Apple Music"
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedTrack>> {
        let res = self.search(query, "songs", limit).await?;
        Ok(res
            .songs
            .map(|d| d.data.iter().filter_map(normalize_song).collect())
            .unwrap_or_default())
    }

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedArtist>> {
        let res = self.search(query, "artists", limit).await?;
        Ok(res
            .artists
            .map(|d| d.data.iter().filter_map(normalize_artist).collect())
            .unwrap_or_default())
    }

    async fn search_albums(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedAlbum>> {
        let res = self.search(query, "albums", limit).await?;
        Ok(res
            .albums
            .map(|d| d.data.iter().filter_map(normalize_album).collect())
            .unwrap_or_default())
    }

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedPlaylist>> {
        let res = self.search(query, "playlists", limit).await?;
        Ok(res
            .playlists
            .map(|d| d.data.iter().filter_map(normalize_playlist).collect())
            .unwrap_or_default())
    }

    async fn get_recently_played(&self, limit: u32) -> ProviderResult<Vec<UnifiedTrack>> {
        let res: DataResponse<Song> = self
            .client
            .get(
                "/me/recent/played/tracks",
                &[("limit", limit.clamp(1, 30).to_string())],
            )
            .await?;
        Ok(res.data.iter().filter_map(normalize_song).collect())
    }

    async fn get_artist_top_tracks(&self, artist_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        let path = self.client.catalog_path(&format!(
            "/artists/{}/view/top-songs",
            urlencoding::encode(artist_id)
        ));
        let res: DataResponse<Song> = self.client.get(&path, &[]).await?;
        Ok(res.data.iter().filter_map(normalize_song).collect())
    }

    async fn get_artist_albums(&self, artist_id: &str) -> ProviderResult<Vec<UnifiedAlbum>> {
        let path = self
            .client
            .catalog_path(&format!("/artists/{}/albums", urlencoding::encode(artist_id)));
        let res: DataResponse<Album> = self.client.get(&path, &[]).await?;
        Ok(res.data.iter().filter_map(normalize_album).collect())
    }

    async fn get_album_tracks(&self, album_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        let path = self
            .client
            .catalog_path(&format!("/albums/{}/tracks", urlencoding::encode(album_id)));
        let res: DataResponse<Song> = self.client.get(&path, &[]).await?;
        Ok(res.data.iter().filter_map(normalize_song).collect())
    }

    async fn get_user_playlists(&self, limit: u32) -> ProviderResult<Vec<UnifiedPlaylist>> {
        let res: DataResponse<Playlist> = self
            .client
            .get(
                "/me/library/playlists",
                &[("limit", limit.clamp(1, 100).to_string())],
            )
            .await?;
        Ok(res.data.iter().filter_map(normalize_playlist).collect())
    }

    async fn get_playlist_tracks(&self, playlist_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        let path = format!(
            "/me/library/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        );
        let res: DataResponse<Song> = self.client.get(&path, &[]).await?;
        Ok(res.data.iter().filter_map(normalize_song).collect())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> ProviderResult<UnifiedPlaylist> {
        log::info!("Creating Apple Music playlist '{}'", name);
        let body = json!({
            "attributes": {
                "name": name,
                "description": description.unwrap_or(""),
            }
        });
        let text = self.client.post("/me/library/playlists", body).await?;
        let created: DataResponse<Playlist> = serde_json::from_str(&text)?;
        created
            .data
            .first()
            .and_then(normalize_playlist)
            .ok_or_else(|| CoreError::Parse("empty playlist creation response".to_string()))
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> ProviderResult<()> {
        let path = format!(
            "/me/library/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        );
        let data: Vec<Value> = track_uris
            .iter()
            .map(|id| json!({ "id": id, "type": "songs" }))
            .collect();
        self.client.post(&path, json!({ "data": data })).await?;
        log::info!(
            "Added {} tracks to Apple Music playlist {}",
            track_uris.len(),
            playlist_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::track_uri;

    #[test]
    fn test_normalize_song_fills_preview_and_artwork() {
        let raw = json!({
            "id": "1440857781",
            "type": "songs",
            "attributes": {
                "name": "Motion Sickness",
                "artistName": "Phoebe Bridgers",
                "albumName": "Stranger in the Alps",
                "durationInMillis": 229000,
                "contentRating": "explicit",
                "previews": [{"url": "https://audio-ssl.itunes.apple.com/preview.m4a"}],
                "url": "https://music.apple.com/us/album/motion-sickness/1440857781",
                "artwork": {"url": "https://is1-ssl.mzstatic.com/image/{w}x{h}bb.jpg"}
            }
        });
        let song: Song = serde_json::from_value(raw).unwrap();
        let track = normalize_song(&song).unwrap();

        assert!(track.explicit);
        assert_eq!(
            track.image_url.as_deref(),
            Some("https://is1-ssl.mzstatic.com/image/640x640bb.jpg")
        );
        assert_eq!(
            track.preview_url.as_deref(),
            Some("https://audio-ssl.itunes.apple.com/preview.m4a")
        );
        // No URI on this catalog; mutation falls back to the catalog id.
        assert_eq!(track_uri(&track), "1440857781");
    }

    #[test]
    fn test_resource_without_attributes_is_skipped() {
        let song: Song = serde_json::from_value(json!({"id": "1", "type": "songs"})).unwrap();
        assert!(normalize_song(&song).is_none());
    }

    #[test]
    fn test_artist_credit_keeps_band_names_whole() {
        assert_eq!(
            artist_credit(" Earth, Wind & Fire "),
            vec!["Earth, Wind & Fire".to_string()]
        );
        assert_eq!(
            artist_credit("Bon Iver & Taylor Swift"),
            vec!["Bon Iver & Taylor Swift".to_string()]
        );
        assert!(artist_credit("  ").is_empty());
    }

    #[test]
    fn test_band_song_primary_artist_is_full_name() {
        let raw = json!({
            "id": "1",
            "type": "songs",
            "attributes": {
                "name": "September",
                "artistName": "Earth, Wind & Fire",
                "durationInMillis": 215000
            }
        });
        let song: Song = serde_json::from_value(raw).unwrap();
        let track = normalize_song(&song).unwrap();
        assert_eq!(track.primary_artist(), Some("Earth, Wind & Fire"));
        assert_eq!(track.artists.len(), 1);
    }

    #[tokio::test]
    async fn test_currently_playing_is_empty_without_error() {
        let provider = AppleMusicProvider::new("dev", None, "us").unwrap();
        assert!(!provider.capabilities().supports_currently_playing);
        let now = crate::providers::gated::currently_playing(&provider).await;
        assert!(matches!(now, Ok(None)));
    }
}
