//! LEI lookup orchestration
//!
//! Runs the four-step flow:
//! 1. Validate the company name and website
//! 2. Search the registry for candidates
//! 3. Ask the identity verifier who operates the website
//! 4. Reconcile the two and format the verified entity
//!
//! Every exit is either a [`LookupOutcome`] (success or "no candidates") or a
//! [`LookupError`]. [`LookupReport`] is the single place those are mapped to
//! user-visible classes. Nothing is retried.

pub mod format;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::LookupConfig;
use crate::error::{LookupError, OutcomeClass, Result};
use crate::gleif::GleifClient;
use crate::matching::{MatchResult, ReconciliationEngine};
use crate::models::{CandidateRecord, IdentityClaim, VerifiedEntity};
use crate::registry::RegistrySearch;
use crate::verification::{GeminiVerifier, IdentityVerifier};

/// Non-error terminal states of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Verified(VerifiedEntity),
    /// Registry search returned nothing for the company name
    NoCandidates { company_name: String },
}

impl LookupOutcome {
    pub fn class(&self) -> OutcomeClass {
        match self {
            LookupOutcome::Verified(_) => OutcomeClass::Success,
            LookupOutcome::NoCandidates { .. } => OutcomeClass::Informational,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LookupOutcome::Verified(entity) => {
                format!("LEI found and verified for {}", entity.legal_name)
            }
            LookupOutcome::NoCandidates { company_name } => format!(
                "No LEI records found for '{}'. This company may not have a registered LEI.",
                company_name
            ),
        }
    }
}

/// Presentation-ready view of a lookup
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub class: OutcomeClass,
    /// Error code, present only for error-class reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<VerifiedEntity>,
}

impl LookupReport {
    pub fn is_error(&self) -> bool {
        self.class == OutcomeClass::Error
    }
}

impl From<Result<LookupOutcome>> for LookupReport {
    fn from(result: Result<LookupOutcome>) -> Self {
        match result {
            Ok(outcome) => {
                let class = outcome.class();
                let message = outcome.message();
                let entity = match outcome {
                    LookupOutcome::Verified(entity) => Some(entity),
                    LookupOutcome::NoCandidates { .. } => None,
                };
                LookupReport {
                    class,
                    code: None,
                    message,
                    entity,
                }
            }
            Err(err) => LookupReport {
                class: err.class(),
                code: Some(err.code()),
                message: err.to_string(),
                entity: None,
            },
        }
    }
}

/// Orchestrates registry search, identity verification and reconciliation
pub struct LeiLookup {
    registry: Arc<dyn RegistrySearch>,
    verifier: Arc<dyn IdentityVerifier>,
    engine: ReconciliationEngine,
    concurrent_queries: bool,
}

impl LeiLookup {
    pub fn new(registry: Arc<dyn RegistrySearch>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            registry,
            verifier,
            engine: ReconciliationEngine::default(),
            concurrent_queries: true,
        }
    }

    /// Wire the GLEIF client and Gemini verifier from configuration
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        config.validate()?;
        let registry = GleifClient::new(config.registry.clone())?;
        let verifier = GeminiVerifier::new(config.verifier.clone())?;

        Ok(Self::new(Arc::new(registry), Arc::new(verifier))
            .with_concurrent_queries(config.concurrent_queries))
    }

    pub fn with_engine(mut self, engine: ReconciliationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// When false, the verifier is only called after the registry returned
    /// candidates, which avoids paying for a verification that cannot match.
    pub fn with_concurrent_queries(mut self, concurrent: bool) -> Self {
        self.concurrent_queries = concurrent;
        self
    }

    /// Find and verify the LEI for a company.
    pub async fn find_lei(&self, company_name: &str, website: &str) -> Result<LookupOutcome> {
        let search_id = Uuid::new_v4();
        let span = info_span!("lei_lookup", %search_id, company = %company_name.trim());

        self.run(company_name, website).instrument(span).await
    }

    async fn run(&self, company_name: &str, website: &str) -> Result<LookupOutcome> {
        let (company_name, website) = validate_inputs(company_name, website)?;

        let Some((candidates, claim)) = self.gather(company_name, website).await? else {
            info!("Registry returned no candidates");
            return Ok(LookupOutcome::NoCandidates {
                company_name: company_name.to_string(),
            });
        };

        match self.engine.reconcile(company_name, candidates, &claim) {
            MatchResult::Matched { candidate, kind } => {
                info!(lei = %candidate.lei, ?kind, "LEI verified");
                Ok(LookupOutcome::Verified(format::format(&candidate, claim)))
            }
            MatchResult::NoMatch {
                claimed_name,
                company_name,
            } => {
                warn!(claimed_name = %claimed_name, "Verified name matched no candidate");
                Err(LookupError::NoMatch {
                    claimed_name,
                    company_name,
                })
            }
            MatchResult::NoCandidates => Ok(LookupOutcome::NoCandidates {
                company_name: company_name.to_string(),
            }),
        }
    }

    /// [`find_lei`](Self::find_lei) mapped to a presentation-ready report
    pub async fn report(&self, company_name: &str, website: &str) -> LookupReport {
        LookupReport::from(self.find_lei(company_name, website).await)
    }

    /// Steps 2 and 3. `None` when the registry has no candidates.
    ///
    /// With concurrent queries both calls are in flight together and dropping
    /// the future cancels both. Results are still judged in step order: a
    /// registry failure or empty result wins over anything the verifier
    /// returned.
    async fn gather(
        &self,
        company_name: &str,
        website: &str,
    ) -> Result<Option<(Vec<CandidateRecord>, IdentityClaim)>> {
        if self.concurrent_queries {
            let (candidates, claim) = tokio::join!(
                self.registry.search(company_name),
                self.verifier.verify(website)
            );
            let candidates = candidates?;
            if candidates.is_empty() {
                return Ok(None);
            }
            info!(
                registry = self.registry.registry_name(),
                count = candidates.len(),
                "Registry candidates found"
            );
            Ok(Some((candidates, claim?)))
        } else {
            let candidates = self.registry.search(company_name).await?;
            if candidates.is_empty() {
                return Ok(None);
            }
            info!(
                registry = self.registry.registry_name(),
                count = candidates.len(),
                "Registry candidates found"
            );
            let claim = self.verifier.verify(website).await?;
            Ok(Some((candidates, claim)))
        }
    }
}

/// Step 1: both inputs present. Returns the trimmed values.
fn validate_inputs<'a>(company_name: &'a str, website: &'a str) -> Result<(&'a str, &'a str)> {
    let company_name = company_name.trim();
    let website = website.trim();

    match (company_name.is_empty(), website.is_empty()) {
        (false, false) => Ok((company_name, website)),
        (true, true) => Err(LookupError::validation(
            "Please provide both a company name and a website.",
        )),
        (true, false) => Err(LookupError::validation("Please provide a company name.")),
        (false, true) => Err(LookupError::validation("Please provide a website.")),
    }
}
