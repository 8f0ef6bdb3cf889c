pub mod client;
pub mod error;
pub mod models;
pub mod provider;

pub use client::AppleMusicClient;
pub use error::AppleMusicError;
pub use provider::AppleMusicProvider;
