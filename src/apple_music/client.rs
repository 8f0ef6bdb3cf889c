use parking_lot::RwLock;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::error::AppleMusicError;
use crate::config::REQUEST_TIMEOUT_SECONDS;

pub const APPLE_MUSIC_API_BASE: &str = "https://api.music.apple.com/v1";

pub struct AppleMusicClient {
    client: Client,
    base_url: String,
    developer_token: String,
    /// Required for `/me/...` endpoints; tied to the listener's subscription
    user_token: RwLock<Option<String>>,
    storefront: String,
}

impl AppleMusicClient {
    pub fn new(
        developer_token: impl Into<String>,
        user_token: Option<String>,
        storefront: impl Into<String>,
    ) -> Result<Self, AppleMusicError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            base_url: APPLE_MUSIC_API_BASE.to_string(),
            developer_token: developer_token.into(),
            user_token: RwLock::new(user_token),
            storefront: storefront.into(),
        })
    }

    pub fn storefront(&self) -> &str {
        &self.storefront
    }

    pub fn set_user_token(&self, token: Option<String>) {
        *self.user_token.write() = token;
    }

    /// Path under `/catalog/{storefront}`.
    pub fn catalog_path(&self, rest: &str) -> String {
        format!("/catalog/{}{}", urlencoding::encode(&self.storefront), rest)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, AppleMusicError> {
        let text = self.send(Method::GET, path, params, None).await?;
        serde_json::from_str(&text)
            .map_err(|e| AppleMusicError::ParseError(format!("JSON error at {}: {}", path, e)))
    }

    /// POST whose response body, if any, is returned raw.
    pub async fn post(&self, path: &str, body: Value) -> Result<String, AppleMusicError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<String, AppleMusicError> {
        let url = format!("{}{}", self.base_url, path);
        let needs_user = path.starts_with("/me/");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.developer_token)
            .query(params);

        if needs_user {
            let token = self.user_token.read().clone();
            match token {
                Some(t) => request = request.header("Music-User-Token", t),
                None => {
                    return Err(AppleMusicError::Unauthorized(
                        "music user token required".to_string(),
                    ))
                }
            }
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        match status {
            s if s.is_success() => Ok(text),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::warn!("Apple Music auth rejected ({}) at {}", status, url);
                Err(AppleMusicError::Unauthorized(text))
            }
            StatusCode::NOT_FOUND => Err(AppleMusicError::NotFound(path.to_string())),
            _ => {
                log::warn!("Request failed ({}) at {}: {}", status, url, text);
                Err(AppleMusicError::ApiError(status.as_u16(), text))
            }
        }
    }
}
