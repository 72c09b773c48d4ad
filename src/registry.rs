//! Registry search seam
//!
//! The orchestrator only sees this trait; [`crate::gleif::GleifClient`] is the
//! production implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CandidateRecord;

/// Full-text search over an LEI registry
#[async_trait]
pub trait RegistrySearch: Send + Sync {
    /// Search by company name.
    ///
    /// Records come back in registry relevance order, which the reconciliation
    /// engine uses as its tie-break. An empty list is a successful search.
    async fn search(&self, company_name: &str) -> Result<Vec<CandidateRecord>>;

    /// Registry name for logging
    fn registry_name(&self) -> &str;
}
