//! Google Gemini identity verifier
//!
//! Calls `generateContent` with the Google Search tool enabled so the answer
//! comes back with grounding citations.

use super::{build_prompt, IdentityVerifier};
use crate::config::VerifierConfig;
use crate::error::{LookupError, Result};
use crate::models::{IdentityClaim, Source};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    tools: Vec<GeminiTool>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Text of the first candidate, all parts joined and trimmed
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Web citations across all candidates. Chunks without a URI are dropped.
    fn sources(&self) -> Vec<Source> {
        self.candidates
            .iter()
            .filter_map(|c| c.grounding_metadata.as_ref())
            .flat_map(|g| g.grounding_chunks.iter())
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                let uri = web.uri.as_deref()?.trim();
                if uri.is_empty() {
                    return None;
                }
                Some(Source {
                    uri: uri.to_string(),
                    title: web
                        .title
                        .clone()
                        .filter(|t| !t.trim().is_empty())
                        .unwrap_or_else(|| uri.to_string()),
                })
            })
            .collect()
    }
}

/// Gemini-backed [`IdentityVerifier`]
#[derive(Debug, Clone)]
pub struct GeminiVerifier {
    config: VerifierConfig,
    client: Client,
}

impl GeminiVerifier {
    /// Create a new verifier. A missing API key is not an error here; it is
    /// reported by [`IdentityVerifier::verify`] before any request is sent.
    pub fn new(config: VerifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LookupError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LookupError::configuration(
                    "GEMINI_API_KEY is not set. Configure an API key to verify website identity.",
                )
            })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send request to Gemini API
    async fn send_request(&self, api_key: &str, prompt: &str) -> Result<GeminiResponse> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![GeminiTool {
                google_search: GoogleSearch {},
            }],
        };

        let url = self.endpoint();
        debug!(url = %url, model = %self.config.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| verifier_failure("Gemini request failed", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| verifier_failure("Failed to read Gemini response", e))?;

        debug!(status = %status, "Gemini API response");

        if !status.is_success() {
            return Err(verifier_failure(
                "Gemini API returned an error status",
                format!(
                    "HTTP {}: {}",
                    status,
                    response_text.chars().take(300).collect::<String>()
                ),
            ));
        }

        serde_json::from_str(&response_text)
            .map_err(|e| verifier_failure("Failed to parse Gemini response", e))
    }
}

#[async_trait]
impl IdentityVerifier for GeminiVerifier {
    async fn verify(&self, website: &str) -> Result<IdentityClaim> {
        let website = website.trim();
        if website.is_empty() {
            return Err(LookupError::validation("Website cannot be empty"));
        }
        let api_key = self.api_key()?;

        let prompt = build_prompt(website);
        let response = self.send_request(api_key, &prompt).await?;

        if let Some(usage) = &response.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini API usage"
            );
        }

        let legal_name = response.text().ok_or_else(|| {
            let finish_reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "none".to_string());
            verifier_failure(
                "Gemini returned no text",
                format!(
                    "{} candidate(s), finish reason {}",
                    response.candidates.len(),
                    finish_reason
                ),
            )
        })?;

        let sources = response.sources();
        let estimated_cost = self
            .config
            .track_cost
            .then(|| self.config.rates.estimate(&prompt, &legal_name));

        info!(
            website = %website,
            legal_name = %legal_name,
            sources = sources.len(),
            "Website identity verified"
        );

        Ok(IdentityClaim {
            legal_name,
            sources,
            estimated_cost,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Log the underlying failure and return the user-safe service error
fn verifier_failure(context: &str, detail: impl std::fmt::Display) -> LookupError {
    let detail = format!("{}: {}", context, detail);
    error!(detail = %detail, "Gemini verification failed");
    LookupError::verifier(detail)
}
