use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{PreviewProvider, PreviewQuery};
use crate::batch::{run_ordered, BatchSummary};
use crate::config::{BatchConfig, REQUEST_TIMEOUT_SECONDS};
use crate::errors::CoreError;

const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";
const RESULTS_PER_LOOKUP: u32 = 5;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ItunesSearchResponse {
    #[serde(default)]
    pub results: Vec<ItunesResult>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItunesResult {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub preview_url: Option<String>,
}

/// Preview lookup against the public iTunes Search API.
pub struct ItunesPreviewProvider {
    client: Client,
    batch: BatchConfig,
    country: String,
}

impl ItunesPreviewProvider {
    pub fn new(batch: BatchConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            batch,
            country: "US".to_string(),
        })
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    async fn lookup_one(&self, query: &PreviewQuery) -> Result<Option<String>, CoreError> {
        let term = format!("{} {}", query.artist_name.trim(), query.track_name.trim());
        let limit = RESULTS_PER_LOOKUP.to_string();
        let params = [
            ("term", term.as_str()),
            ("entity", "song"),
            ("media", "music"),
            ("limit", limit.as_str()),
            ("country", self.country.as_str()),
        ];

        let response = self.client.get(ITUNES_SEARCH_URL).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(CoreError::ProviderUnavailable(format!(
                "iTunes search returned {}",
                response.status()
            )));
        }

        let body: ItunesSearchResponse = response.json().await?;
        Ok(pick_preview(&body.results, &query.artist_name))
    }
}

/// First result with a preview whose artist overlaps the requested one.
pub fn pick_preview(results: &[ItunesResult], artist_name: &str) -> Option<String> {
    let target = artist_name.trim().to_lowercase();
    results
        .iter()
        .filter(|r| r.preview_url.as_deref().is_some_and(|u| !u.is_empty()))
        .find(|r| {
            let artist = r.artist_name.as_deref().unwrap_or("").to_lowercase();
            !artist.is_empty() && (artist.contains(&target) || target.contains(&artist))
        })
        .and_then(|r| r.preview_url.clone())
}

#[async_trait]
impl PreviewProvider for ItunesPreviewProvider {
    fn name(&self) -> &str {
        "itunes"
    }

    async fn lookup(&self, queries: &[PreviewQuery]) -> HashMap<String, String> {
        if queries.is_empty() {
            return HashMap::new();
        }

        let never_cancelled = CancellationToken::new();
        let outcomes = match run_ordered(
            queries.to_vec(),
            &self.batch,
            &never_cancelled,
            |_, q| async move { self.lookup_one(&q).await },
        )
        .await
        {
            Ok(outcomes) => outcomes,
            Err(e) => {
                log::warn!("[Preview] iTunes lookup aborted: {}", e);
                return HashMap::new();
            }
        };

        let summary = BatchSummary::from_outcomes(&outcomes);
        let found: HashMap<String, String> = queries
            .iter()
            .zip(outcomes)
            .filter_map(|(q, outcome)| outcome.into_completed().flatten().map(|url| (q.key(), url)))
            .collect();

        log::info!(
            "[Preview] iTunes: {}/{} previews found ({} lookups failed)",
            found.len(),
            queries.len(),
            summary.failed + summary.timed_out
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(artist: &str, preview: Option<&str>) -> ItunesResult {
        ItunesResult {
            track_name: Some("Song".to_string()),
            artist_name: Some(artist.to_string()),
            preview_url: preview.map(str::to_string),
        }
    }

    #[test]
    fn test_pick_preview_requires_artist_overlap() {
        let results = vec![
            result("Cover Band", Some("https://a/cover.m4a")),
            result("Phoebe Bridgers & Friends", Some("https://a/real.m4a")),
        ];
        assert_eq!(
            pick_preview(&results, "Phoebe Bridgers").as_deref(),
            Some("https://a/real.m4a")
        );
    }

    #[test]
    fn test_pick_preview_skips_results_without_preview() {
        let results = vec![result("Boygenius", None), result("boygenius", Some(""))];
        assert_eq!(pick_preview(&results, "boygenius"), None);
    }

    #[test]
    fn test_parses_search_response() {
        let raw = r#"{"resultCount":1,"results":[{"trackName":"Kyoto","artistName":"Phoebe Bridgers","previewUrl":"https://audio/kyoto.m4a"}]}"#;
        let parsed: ItunesSearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            pick_preview(&parsed.results, "phoebe bridgers").as_deref(),
            Some("https://audio/kyoto.m4a")
        );
    }
}
