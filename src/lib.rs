//! Cross-catalog music core: provider abstraction over Spotify and Apple
//! Music, suggestion-to-track resolution, two-listener blends and a ranked
//! concert feed.

pub mod apple_music;
pub mod batch;
pub mod blend;
pub mod concerts;
pub mod config;
pub mod errors;
pub mod models;
pub mod preview;
pub mod providers;
pub mod resolver;
pub mod spotify;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CoreConfig;
pub use errors::{CoreError, ProviderResult};
pub use tokio_util::sync::CancellationToken;

/// Install the `env_logger` backend, honoring `RUST_LOG` and defaulting to
/// `info`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
