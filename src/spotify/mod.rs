pub mod client;
pub mod error;
pub mod models;
pub mod provider;

pub use client::SpotifyClient;
pub use error::SpotifyError;
pub use provider::SpotifyProvider;
