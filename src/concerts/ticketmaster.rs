//! Ticketmaster Discovery API events source.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::types::RawEvent;
use super::EventsProvider;
use crate::config::REQUEST_TIMEOUT_SECONDS;
use crate::errors::{CoreError, ProviderResult};
use crate::models::UnifiedArtist;

pub const DISCOVERY_API_BASE: &str = "https://app.ticketmaster.com/discovery/v2";
const EVENTS_PER_ARTIST: u32 = 50;

#[derive(Deserialize, Debug, Default)]
pub struct EventSearchResponse {
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<TmEvent>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TmEvent {
    pub name: Option<String>,
    pub url: Option<String>,
    pub dates: Option<TmDates>,
    #[serde(default)]
    pub price_ranges: Vec<TmPriceRange>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<TmEventEmbedded>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TmDates {
    pub start: Option<TmStart>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TmStart {
    pub local_date: Option<String>,
    pub local_time: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TmPriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TmEventEmbedded {
    #[serde(default)]
    pub venues: Vec<TmVenue>,
    #[serde(default)]
    pub attractions: Vec<TmAttraction>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TmVenue {
    pub name: Option<String>,
    pub city: Option<TmNamed>,
    pub address: Option<TmAddress>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TmNamed {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TmAddress {
    pub line1: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TmAttraction {
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<TmImage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TmImage {
    pub url: String,
    pub width: Option<u32>,
}

pub struct TicketmasterEvents {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TicketmasterEvents {
    pub fn new(api_key: impl Into<String>) -> ProviderResult<Self> {
        Self::with_base_url(api_key, DISCOVERY_API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Query for one artist's upcoming shows.
    ///
    /// Discovery's `city` parameter is a hard filter, and the feed needs
    /// out-of-town shows too, so no location is sent.
    pub fn build_params(&self, artist_name: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.clone()),
            ("keyword", artist_name.trim().to_string()),
            ("classificationName", "music".to_string()),
            ("sort", "date,asc".to_string()),
            ("size", EVENTS_PER_ARTIST.to_string()),
        ]
    }

    /// Build from a `{"api_key": "..."}` config blob.
    pub fn from_config(config: &Value) -> ProviderResult<Self> {
        let key = config
            .get("api_key")
            .and_then(|k| k.as_str())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CoreError::Config("ticketmaster: missing api_key".to_string()))?;
        Self::new(key)
    }
}

fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Keyword search also returns tribute acts and festivals that merely
/// mention the artist; keep events that list the artist as an attraction.
fn is_for_artist(event: &TmEvent, artist_name: &str) -> bool {
    match &event.embedded {
        Some(embedded) if !embedded.attractions.is_empty() => embedded
            .attractions
            .iter()
            .any(|a| a.name.as_deref().is_some_and(|n| names_match(n, artist_name))),
        _ => true,
    }
}

pub fn to_raw_event(event: TmEvent, artist_name: &str) -> RawEvent {
    let embedded = event.embedded.unwrap_or_default();
    let venue = embedded.venues.into_iter().next();
    let attraction = embedded
        .attractions
        .into_iter()
        .find(|a| a.name.as_deref().is_some_and(|n| names_match(n, artist_name)));
    let start = event.dates.and_then(|d| d.start);
    let price = event.price_ranges.into_iter().next();

    RawEvent {
        event_name: event.name,
        artist_name: attraction.as_ref().and_then(|a| a.name.clone()),
        artist_image_url: attraction.and_then(|a| {
            a.images
                .into_iter()
                .max_by_key(|i| i.width.unwrap_or(0))
                .map(|i| i.url)
        }),
        venue_name: venue.as_ref().and_then(|v| v.name.clone()),
        address: venue
            .as_ref()
            .and_then(|v| v.address.as_ref())
            .and_then(|a| a.line1.clone()),
        city: venue.and_then(|v| v.city).and_then(|c| c.name),
        date: start.as_ref().and_then(|s| s.local_date.clone()),
        time: start.and_then(|s| s.local_time),
        price_min: price.as_ref().and_then(|p| p.min),
        price_max: price.as_ref().and_then(|p| p.max),
        currency: price.and_then(|p| p.currency),
        ticket_url: event.url,
    }
}

#[async_trait]
impl EventsProvider for TicketmasterEvents {
    fn name(&self) -> &str {
        "ticketmaster"
    }

    async fn events_for_artist(
        &self,
        artist: &UnifiedArtist,
        location_hint: Option<&str>,
    ) -> ProviderResult<Vec<RawEvent>> {
        let url = format!("{}/events.json", self.base_url);
        if let Some(city) = location_hint {
            log::debug!(
                "[Ticketmaster] Ignoring location hint '{}' for '{}'",
                city,
                artist.name
            );
        }
        let params = self.build_params(&artist.name);

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            log::warn!("[Ticketmaster] Rate limited for '{}'", artist.name);
            return Err(CoreError::ProviderUnavailable("Ticketmaster rate limited".to_string()));
        }
        if !status.is_success() {
            return Err(CoreError::ProviderUnavailable(format!(
                "Ticketmaster returned {} for '{}'",
                status, artist.name
            )));
        }

        let body: EventSearchResponse = response.json().await?;
        let events: Vec<RawEvent> = body
            .embedded
            .map(|e| e.events)
            .unwrap_or_default()
            .into_iter()
            .filter(|e| is_for_artist(e, &artist.name))
            .map(|e| to_raw_event(e, &artist.name))
            .collect();

        log::debug!("[Ticketmaster] {} events for '{}'", events.len(), artist.name);
        Ok(events)
    }
}
