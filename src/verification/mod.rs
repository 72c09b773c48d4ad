//! Website identity verification
//!
//! Asks a search-grounded model which legal entity owns a website. The answer
//! becomes an [`IdentityClaim`] that the reconciliation engine uses to pick a
//! registry candidate; it never overwrites registry data.

pub mod cost;
pub mod gemini;

pub use cost::CostRates;
pub use gemini::GeminiVerifier;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::IdentityClaim;

/// Trait for the identity verifier used by the lookup orchestrator
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve the legal name of the company operating `website`.
    ///
    /// Implementations must:
    /// - return `LookupError::Configuration` before any network call when no
    ///   credential is available
    /// - return `LookupError::Service` on transport failure or an empty answer
    /// - return an empty source list, not an error, when the answer carries no
    ///   citations
    async fn verify(&self, website: &str) -> Result<IdentityClaim>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;
}

/// Prompt sent for every verification
pub fn build_prompt(website: &str) -> String {
    format!(
        "What is the official legal name for the company that owns and operates the website {}? \
         Respond with only the legal name and nothing else.",
        website
    )
}
