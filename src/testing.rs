//! In-memory collaborators for unit tests. No network.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::concerts::{EventsProvider, RawEvent};
use crate::errors::{CoreError, ProviderResult};
use crate::models::{
    new_local_id, TimeRange, UnifiedAlbum, UnifiedArtist, UnifiedPlaylist, UnifiedTrack,
};
use crate::preview::{preview_key, PreviewProvider, PreviewQuery};
use crate::providers::traits::CatalogProvider;
use crate::providers::types::{Capabilities, ServiceType};

const FULL: Capabilities = Capabilities {
    supports_currently_playing: true,
    supports_top_items: true,
    supports_recently_played: true,
    supports_playlist_creation: true,
    requires_subscription: false,
};

fn slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

pub fn track(service: ServiceType, id: &str, name: &str, artist: &str) -> UnifiedTrack {
    UnifiedTrack {
        id: new_local_id(),
        service_type: service,
        original_id: id.to_string(),
        name: name.to_string(),
        artists: vec![artist.to_string()],
        album_name: None,
        image_url: None,
        duration_ms: 200_000,
        explicit: false,
        preview_url: None,
        external_url: None,
        uri: Some(format!("{}:track:{}", service, id)),
    }
}

pub fn artist(name: &str) -> UnifiedArtist {
    UnifiedArtist {
        id: new_local_id(),
        service_type: ServiceType::Spotify,
        original_id: slug(name),
        name: name.to_string(),
        image_url: None,
        genres: Vec::new(),
        followers: None,
        external_url: None,
        uri: None,
    }
}

pub fn raw_event(artist_name: &str, venue: &str, city: &str, date: &str) -> RawEvent {
    RawEvent {
        event_name: Some(format!("{} live", artist_name.trim())),
        artist_name: Some(artist_name.to_string()),
        venue_name: Some(venue.to_string()),
        city: Some(city.to_string()),
        date: Some(date.to_string()),
        ..RawEvent::default()
    }
}

struct Entry {
    name: String,
    artist: String,
    preview: Option<String>,
}

/// Scripted catalog. Search matches when the query contains both the track
/// name and the artist; failures and latency key off query substrings.
pub struct FakeCatalog {
    service: ServiceType,
    capabilities: Capabilities,
    entries: Vec<Entry>,
    latency: Vec<(String, Duration)>,
    failing: Vec<String>,
    top_artists: Vec<UnifiedArtist>,
    calls: AtomicUsize,
    saved: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            service: ServiceType::Spotify,
            capabilities: FULL,
            entries: Vec::new(),
            latency: Vec::new(),
            failing: Vec::new(),
            top_artists: Vec::new(),
            calls: AtomicUsize::new(0),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn with_service(mut self, service: ServiceType) -> Self {
        self.service = service;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_track(mut self, name: &str, artist: &str, preview: Option<&str>) -> Self {
        self.entries.push(Entry {
            name: name.to_string(),
            artist: artist.to_string(),
            preview: preview.map(str::to_string),
        });
        self
    }

    pub fn with_latency(mut self, query_part: &str, delay: Duration) -> Self {
        self.latency.push((query_part.to_lowercase(), delay));
        self
    }

    pub fn failing_on(mut self, query_part: &str) -> Self {
        self.failing.push(query_part.to_lowercase());
        self
    }

    pub fn with_top_artists(mut self, artists: Vec<UnifiedArtist>) -> Self {
        self.top_artists = artists;
        self
    }

    /// Trait calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(playlist id, uris)` per add call.
    pub fn saved_playlists(&self) -> Vec<(String, Vec<String>)> {
        self.saved.lock().clone()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn build(&self, entry: &Entry) -> UnifiedTrack {
        let mut t = track(self.service, &slug(&entry.name), &entry.name, &entry.artist);
        t.preview_url = entry.preview.clone();
        t
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    fn service_type(&self) -> ServiceType {
        self.service
    }

    fn name(&self) -> &str {
        "Fake"
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> ProviderResult<Vec<UnifiedTrack>> {
        self.hit();
        let query = query.to_lowercase();

        if let Some((_, delay)) = self.latency.iter().find(|(part, _)| query.contains(part)) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|part| query.contains(part)) {
            return Err(CoreError::ProviderUnavailable(format!("scripted failure for '{}'", query)));
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| {
                query.contains(&e.name.to_lowercase()) && query.contains(&e.artist.to_lowercase())
            })
            .take(limit as usize)
            .map(|e| self.build(e))
            .collect())
    }

    async fn search_artists(&self, _query: &str, _limit: u32) -> ProviderResult<Vec<UnifiedArtist>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn search_albums(&self, _query: &str, _limit: u32) -> ProviderResult<Vec<UnifiedAlbum>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn search_playlists(
        &self,
        _query: &str,
        _limit: u32,
    ) -> ProviderResult<Vec<UnifiedPlaylist>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_top_artists(
        &self,
        _time_range: TimeRange,
        limit: u32,
    ) -> ProviderResult<Vec<UnifiedArtist>> {
        self.hit();
        Ok(self.top_artists.iter().take(limit as usize).cloned().collect())
    }

    async fn get_artist_top_tracks(&self, _artist_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_artist_albums(&self, _artist_id: &str) -> ProviderResult<Vec<UnifiedAlbum>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_album_tracks(&self, _album_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_user_playlists(&self, _limit: u32) -> ProviderResult<Vec<UnifiedPlaylist>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_playlist_tracks(&self, _playlist_id: &str) -> ProviderResult<Vec<UnifiedTrack>> {
        self.hit();
        Ok(Vec::new())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> ProviderResult<UnifiedPlaylist> {
        self.hit();
        let original_id = format!("fake-playlist-{}", self.saved.lock().len() + 1);
        Ok(UnifiedPlaylist {
            id: new_local_id(),
            service_type: self.service,
            uri: Some(format!("{}:playlist:{}", self.service, original_id)),
            original_id,
            name: name.to_string(),
            description: description.map(str::to_string),
            owner: None,
            image_url: None,
            track_count: 0,
            external_url: None,
        })
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> ProviderResult<()> {
        self.hit();
        self.saved
            .lock()
            .push((playlist_id.to_string(), track_uris.to_vec()));
        Ok(())
    }
}

/// Preview source answering from a fixed table and recording what it was asked.
pub struct FakePreviews {
    table: HashMap<String, String>,
    queried: Mutex<Vec<String>>,
}

impl FakePreviews {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            queried: Mutex::new(Vec::new()),
        }
    }

    pub fn with_preview(mut self, track_name: &str, artist_name: &str, url: &str) -> Self {
        self.table
            .insert(preview_key(track_name, artist_name), url.to_string());
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().clone()
    }
}

#[async_trait]
impl PreviewProvider for FakePreviews {
    fn name(&self) -> &str {
        "fake-previews"
    }

    async fn lookup(&self, queries: &[PreviewQuery]) -> HashMap<String, String> {
        let mut found = HashMap::new();
        for query in queries {
            let key = query.key();
            self.queried.lock().push(key.clone());
            if let Some(url) = self.table.get(&key) {
                found.insert(key, url.clone());
            }
        }
        found
    }
}

/// Events source keyed by artist name.
pub struct FakeEvents {
    events: Vec<RawEvent>,
    failing: Vec<String>,
    latency: Vec<(String, Duration)>,
    fetches: AtomicUsize,
}

impl FakeEvents {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            failing: Vec::new(),
            latency: Vec::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_event(mut self, event: RawEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn failing_for(mut self, artist_name: &str) -> Self {
        self.failing.push(slug(artist_name));
        self
    }

    pub fn with_latency(mut self, artist_name: &str, delay: Duration) -> Self {
        self.latency.push((slug(artist_name), delay));
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventsProvider for FakeEvents {
    fn name(&self) -> &str {
        "fake-events"
    }

    async fn events_for_artist(
        &self,
        artist: &UnifiedArtist,
        _location_hint: Option<&str>,
    ) -> ProviderResult<Vec<RawEvent>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let key = slug(&artist.name);

        if let Some((_, delay)) = self.latency.iter().find(|(name, _)| *name == key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&key) {
            return Err(CoreError::ProviderUnavailable(format!(
                "scripted failure for '{}'",
                artist.name
            )));
        }

        Ok(self
            .events
            .iter()
            .filter(|e| e.artist_name.as_deref().map(slug).as_deref() == Some(key.as_str()))
            .cloned()
            .collect())
    }
}
