//! Lookup configuration
//!
//! Defaults match the public GLEIF and Gemini endpoints. `LookupConfig::from_env`
//! layers environment overrides on top; binaries call `dotenvy::dotenv()` first
//! so a `.env` file works the same way as exported variables.

use crate::error::{LookupError, Result};
use crate::verification::CostRates;
use url::Url;

pub const GLEIF_API_BASE: &str = "https://api.gleif.org/api/v1";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// GLEIF rejects page sizes above this
pub const MAX_PAGE_SIZE: usize = 200;

/// Registry (GLEIF) client settings
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub page_size: usize,
    /// `filter[entity.status]`; `None` searches every status
    pub status_filter: Option<String>,
    /// `filter[entity.legalAddress.country]` (ISO 3166-1 alpha-2)
    pub country_filter: Option<String>,
    pub timeout_secs: u64,
    /// Minimum spacing between requests; GLEIF allows 60 req/min
    pub min_request_interval_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: GLEIF_API_BASE.to_string(),
            page_size: 10,
            status_filter: Some("ACTIVE".to_string()),
            country_filter: None,
            timeout_secs: 15,
            min_request_interval_ms: 1000,
        }
    }
}

/// Identity verifier (Gemini) settings
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Injected credential. Absence is reported when a verification is attempted.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Attach an approximate cost estimate to every claim
    pub track_cost: bool,
    pub rates: CostRates,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: 60,
            track_cost: true,
            rates: CostRates::default(),
        }
    }
}

impl VerifierConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Top-level configuration for a [`crate::lookup::LeiLookup`]
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub registry: RegistryConfig,
    pub verifier: VerifierConfig,
    /// Issue the registry and verifier queries concurrently
    pub concurrent_queries: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            verifier: VerifierConfig::default(),
            concurrent_queries: true,
        }
    }
}

impl LookupConfig {
    /// Build from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        config.verifier.api_key = get("GEMINI_API_KEY");
        if let Some(model) = get("GEMINI_MODEL") {
            config.verifier.model = model;
        }
        if let Some(base) = get("GEMINI_API_BASE") {
            config.verifier.base_url = base;
        }
        if let Some(flag) = get("LEI_TRACK_COST") {
            config.verifier.track_cost = parse_bool("LEI_TRACK_COST", &flag)?;
        }

        if let Some(base) = get("GLEIF_API_BASE") {
            config.registry.base_url = base;
        }
        if let Some(size) = get("LEI_PAGE_SIZE") {
            config.registry.page_size = size.parse().map_err(|_| {
                LookupError::configuration(format!(
                    "LEI_PAGE_SIZE must be a positive integer, got '{}'",
                    size
                ))
            })?;
        }
        config.registry.country_filter = get("LEI_COUNTRY").map(|c| c.to_uppercase());

        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise only fail at request time
    pub fn validate(&self) -> Result<()> {
        check_base_url("GLEIF_API_BASE", &self.registry.base_url)?;
        check_base_url("GEMINI_API_BASE", &self.verifier.base_url)?;

        if self.registry.page_size == 0 {
            return Err(LookupError::configuration(
                "Registry page size must be at least 1",
            ));
        }
        if self.verifier.model.trim().is_empty() {
            return Err(LookupError::configuration("Gemini model name is empty"));
        }
        Ok(())
    }
}

fn check_base_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| {
        LookupError::configuration(format!("{} is not a valid URL ({}): {}", name, e, value))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(LookupError::configuration(format!(
            "{} must use http or https, got '{}'",
            name, other
        ))),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LookupError::configuration(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}
