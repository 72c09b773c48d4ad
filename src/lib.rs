//! LEI Verify - Legal Entity Identifier lookup with website identity checks
//!
//! Finds a company's LEI by searching the GLEIF registry, asking a
//! search-grounded model which legal entity operates the company's website,
//! and accepting a registry record only when the two names agree after
//! normalization.
//!
//! ## Pipeline
//! Inputs -> GLEIF full-text search + Gemini identity claim -> reconciliation
//! -> verified entity
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lei_verify::{config::LookupConfig, lookup::LeiLookup};
//!
//! # async fn run() -> Result<(), lei_verify::error::LookupError> {
//! let config = LookupConfig::from_env()?;
//! let lookup = LeiLookup::from_config(&config)?;
//! let report = lookup.report("Apple Inc", "apple.com").await;
//! println!("{}", report.message);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

pub mod config;
pub mod models;

// External collaborators
pub mod gleif;
pub mod registry;
pub mod verification;

// Decision logic
pub mod lookup;
pub mod matching;

pub use config::LookupConfig;
pub use error::{LookupError, OutcomeClass, ServiceKind};
pub use lookup::{LeiLookup, LookupOutcome, LookupReport};
pub use models::{CandidateAddress, CandidateRecord, IdentityClaim, Source, VerifiedEntity};
pub use registry::RegistrySearch;
pub use verification::IdentityVerifier;
