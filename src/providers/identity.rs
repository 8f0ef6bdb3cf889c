//! Default identity behavior shared by all providers.

use crate::models::{UnifiedAlbum, UnifiedArtist, UnifiedPlaylist, UnifiedTrack};

fn stored_url(url: &Option<String>) -> Option<String> {
    url.as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

/// Deep link back into the provider, if the record carried one.
pub fn external_url(track: &UnifiedTrack) -> Option<String> {
    stored_url(&track.external_url)
}

pub fn artist_external_url(artist: &UnifiedArtist) -> Option<String> {
    stored_url(&artist.external_url)
}

pub fn album_external_url(album: &UnifiedAlbum) -> Option<String> {
    stored_url(&album.external_url)
}

pub fn playlist_external_url(playlist: &UnifiedPlaylist) -> Option<String> {
    stored_url(&playlist.external_url)
}

/// URI used for playlist mutation: the stored URI, else the raw catalog id.
pub fn track_uri(track: &UnifiedTrack) -> String {
    track
        .uri
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(&track.original_id)
        .to_string()
}
