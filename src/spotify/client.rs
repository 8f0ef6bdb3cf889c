use parking_lot::RwLock;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::error::SpotifyError;
use crate::config::REQUEST_TIMEOUT_SECONDS;

pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Thin Web API client. Token acquisition belongs to the caller; the
/// current bearer token can be swapped in place after a refresh.
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    access_token: RwLock<String>,
}

impl SpotifyClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, SpotifyError> {
        Self::with_base_url(access_token, SPOTIFY_API_BASE)
    }

    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, SpotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: RwLock::new(access_token.into()),
        })
    }

    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write() = token.into();
    }

    /// GET returning `None` on 204 No Content.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, SpotifyError> {
        self.send(Method::GET, path, params, None).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        self.send(Method::GET, path, params, None)
            .await?
            .ok_or_else(|| SpotifyError::ParseError(format!("Empty body from {}", path)))
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, SpotifyError> {
        self.send(Method::POST, path, &[], Some(body))
            .await?
            .ok_or_else(|| SpotifyError::ParseError(format!("Empty body from {}", path)))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Option<T>, SpotifyError> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.access_token.read().clone();

        log::debug!("Spotify {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .query(params);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await?;

        match status {
            s if s.is_success() => {
                let data = serde_json::from_str(&text).map_err(|e| {
                    SpotifyError::ParseError(format!("JSON error at {}: {}", url, e))
                })?;
                Ok(Some(data))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::warn!("Spotify auth rejected ({}) at {}", status, url);
                Err(SpotifyError::AuthError(text))
            }
            StatusCode::NOT_FOUND => Err(SpotifyError::NotFound(path.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                log::warn!("Rate limit (429) at {}", url);
                Err(SpotifyError::RateLimited)
            }
            _ => {
                log::warn!("Request failed ({}) at {}: {}", status, url, text);
                Err(SpotifyError::ApiError(status.as_u16(), text))
            }
        }
    }
}
