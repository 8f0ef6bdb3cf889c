use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Spotify,
    AppleMusic,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Spotify => write!(f, "spotify"),
            ServiceType::AppleMusic => write!(f, "apple_music"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "spotify" => Ok(ServiceType::Spotify),
            "apple_music" | "applemusic" => Ok(ServiceType::AppleMusic),
            _ => Err(format!(
                "Invalid service: '{}'. Valid: spotify, apple_music",
                s
            )),
        }
    }
}

/// Static declaration of which optional operations a provider supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub supports_currently_playing: bool,
    pub supports_top_items: bool,
    pub supports_recently_played: bool,
    pub supports_playlist_creation: bool,
    pub requires_subscription: bool,
}

impl Capabilities {
    /// Nothing optional supported.
    pub const fn minimal() -> Self {
        Self {
            supports_currently_playing: false,
            supports_top_items: false,
            supports_recently_played: false,
            supports_playlist_creation: false,
            requires_subscription: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_round_trips_through_display() {
        for service in [ServiceType::Spotify, ServiceType::AppleMusic] {
            assert_eq!(service.to_string().parse::<ServiceType>().unwrap(), service);
        }
    }

    #[test]
    fn test_service_type_accepts_loose_spelling() {
        assert_eq!("Apple Music".parse::<ServiceType>().unwrap(), ServiceType::AppleMusic);
        assert_eq!("apple-music".parse::<ServiceType>().unwrap(), ServiceType::AppleMusic);
        assert!("tidal".parse::<ServiceType>().is_err());
    }
}
