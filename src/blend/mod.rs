//! Two-listener blends: taste compatibility, scored and resolved
//! recommendations, and saving the result as a playlist.

pub mod engine;
pub mod profile;
pub mod scoring;
pub mod types;

pub use engine::{save_blend_playlist, BlendEngine};
pub use profile::{taste_compatibility, ListenerProfile, TasteMatch};
pub use types::{
    AffinityLevel, BlendCandidate, BlendRecommendation, BlendRequest, BlendResult,
};
