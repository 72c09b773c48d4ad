//! GLEIF API Client
//!
//! Paced HTTP client for full-text LEI searches and single-record fetches.

use super::types::*;
use crate::config::{RegistryConfig, MAX_PAGE_SIZE};
use crate::error::{LookupError, Result};
use crate::models::CandidateRecord;
use crate::registry::RegistrySearch;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

pub struct GleifClient {
    client: Client,
    config: RegistryConfig,
    last_request: Mutex<Option<Instant>>,
}

impl GleifClient {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LookupError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Enforce the minimum interval between requests
    async fn rate_limit(&self) {
        let min_interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                sleep(min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Query parameters for a full-text search
    fn search_params(&self, company_name: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("filter[fulltext]", company_name.to_string()),
            (
                "page[size]",
                self.config.page_size.clamp(1, MAX_PAGE_SIZE).to_string(),
            ),
            ("page[number]", "1".to_string()),
        ];

        if let Some(status) = &self.config.status_filter {
            params.push(("filter[entity.status]", status.to_uppercase()));
        }
        if let Some(country) = &self.config.country_filter {
            params.push(("filter[entity.legalAddress.country]", country.to_uppercase()));
        }

        params
    }

    /// Search for LEI records by free text.
    ///
    /// Records that fail to decode are skipped with a warning; a body that is
    /// not a JSON:API document with a `data` array is a service error.
    pub async fn search_fulltext(&self, company_name: &str) -> Result<Vec<CandidateRecord>> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(LookupError::validation("Company name cannot be empty"));
        }

        self.rate_limit().await;
        let url = self.endpoint("lei-records");
        let params = self.search_params(company_name);
        debug!(url = %url, query = %company_name, "Searching GLEIF");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, JSON_API_MEDIA_TYPE)
            .query(&params)
            .send()
            .await
            .map_err(|e| registry_failure("Failed to search LEI records", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| registry_failure("Failed to read search response", e))?;

        if !status.is_success() {
            return Err(registry_failure(
                "GLEIF search returned an error status",
                format!("HTTP {}: {}", status, truncate(&text, 200)),
            ));
        }

        let parsed: GleifResponse<Vec<Value>> = serde_json::from_str(&text).map_err(|e| {
            registry_failure(
                "Failed to parse search response",
                format!(
                    "JSON parse error at line {} col {}: {}. First 500 chars: {}",
                    e.line(),
                    e.column(),
                    e,
                    truncate(&text, 500)
                ),
            )
        })?;

        let mut candidates = Vec::with_capacity(parsed.data.len());
        for (index, raw) in parsed.data.into_iter().enumerate() {
            match serde_json::from_value::<LeiRecord>(raw) {
                Ok(record) => candidates.push(CandidateRecord::from(record)),
                Err(e) => warn!(index, error = %e, "Skipping malformed LEI record"),
            }
        }

        info!(
            query = %company_name,
            count = candidates.len(),
            "GLEIF search complete"
        );
        Ok(candidates)
    }

    /// Fetch a single LEI record. `Ok(None)` when GLEIF has no such record.
    pub async fn get_lei_record(&self, lei: &str) -> Result<Option<CandidateRecord>> {
        let lei = lei.trim().to_uppercase();
        if !is_valid_lei(&lei) {
            return Err(LookupError::validation(format!(
                "'{}' is not a valid LEI (20 characters, ISO 17442 check digits)",
                lei
            )));
        }

        self.rate_limit().await;
        let url = self.endpoint(&format!("lei-records/{}", lei));
        debug!(url = %url, "Fetching LEI record");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, JSON_API_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| registry_failure("Failed to fetch LEI record", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            info!(lei = %lei, "LEI record not found");
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Failed to read GLEIF error response body");
                    String::new()
                }
            };
            return Err(registry_failure(
                "GLEIF record fetch returned an error status",
                format!("HTTP {}: {}", status, truncate(&body, 200)),
            ));
        }

        let data: GleifResponse<LeiRecord> = response
            .json()
            .await
            .map_err(|e| registry_failure("Failed to parse LEI record response", e))?;

        Ok(Some(data.data.into()))
    }
}

#[async_trait]
impl RegistrySearch for GleifClient {
    async fn search(&self, company_name: &str) -> Result<Vec<CandidateRecord>> {
        self.search_fulltext(company_name).await
    }

    fn registry_name(&self) -> &str {
        "GLEIF"
    }
}

/// Log the underlying failure and return the user-safe service error
fn registry_failure(context: &str, detail: impl std::fmt::Display) -> LookupError {
    let detail = format!("{}: {}", context, detail);
    error!(detail = %detail, "GLEIF request failed");
    LookupError::registry(detail)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
