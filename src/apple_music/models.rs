use serde::Deserialize;

pub const ARTWORK_SIZE: u32 = 640;

/// `{ "data": [...] }` envelope used by every resource endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Option<A>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artwork {
    /// Template with `{w}` and `{h}` placeholders
    pub url: String,
}

impl Artwork {
    pub fn sized(&self, px: u32) -> String {
        self.url
            .replace("{w}", &px.to_string())
            .replace("{h}", &px.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Preview {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub album_name: Option<String>,
    pub duration_in_millis: Option<u64>,
    pub content_rating: Option<String>,
    #[serde(default)]
    pub previews: Vec<Preview>,
    pub url: Option<String>,
    pub artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAttributes {
    pub name: String,
    #[serde(default)]
    pub genre_names: Vec<String>,
    pub url: Option<String>,
    pub artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAttributes {
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
    pub url: Option<String>,
    pub artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionText {
    pub standard: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistAttributes {
    pub name: String,
    pub description: Option<DescriptionText>,
    pub curator_name: Option<String>,
    pub url: Option<String>,
    pub artwork: Option<Artwork>,
}

pub type Song = Resource<SongAttributes>;
pub type Artist = Resource<ArtistAttributes>;
pub type Album = Resource<AlbumAttributes>;
pub type Playlist = Resource<PlaylistAttributes>;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: SearchResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    pub songs: Option<DataResponse<Song>>,
    pub artists: Option<DataResponse<Artist>>,
    pub albums: Option<DataResponse<Album>>,
    pub playlists: Option<DataResponse<Playlist>>,
}
