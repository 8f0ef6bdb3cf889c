//! Resolution of free-text song suggestions into playable catalog tracks.

pub mod engine;
pub mod types;

pub use engine::TrackResolver;
pub use types::{ResolvedSong, SongSuggestion};
