//! Error handling for the LEI lookup pipeline
//!
//! Every failure that can leave the library is a [`LookupError`]. External
//! clients translate transport and decoding failures into
//! [`LookupError::Service`] at their own boundary, so raw `reqwest` or
//! `serde_json` errors never reach a caller.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// External collaborator that a [`LookupError::Service`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// GLEIF LEI registry
    Registry,
    /// Grounded AI identity verification
    IdentityVerifier,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Registry => write!(f, "the GLEIF registry"),
            ServiceKind::IdentityVerifier => write!(f, "the website identity verifier"),
        }
    }
}

/// User-visible class an outcome falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Error,
    Informational,
    Success,
}

/// Main error type for LEI lookups
#[derive(Error, Debug)]
pub enum LookupError {
    /// Missing credential or unusable configuration value
    #[error("{0}")]
    Configuration(String),

    /// Transport failure or malformed response from an external API.
    /// `detail` is for logs only and is not part of the message.
    #[error("Failed to reach {service}")]
    Service { service: ServiceKind, detail: String },

    /// Missing or malformed user input
    #[error("{0}")]
    Validation(String),

    /// Registry candidates existed but none matched the verified legal name
    #[error(
        "Found LEI records for '{company_name}', but none matched the legal name \
         '{claimed_name}' reported for the website. Please check the website and company name."
    )]
    NoMatch {
        claimed_name: String,
        company_name: String,
    },
}

impl LookupError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn registry(detail: impl Into<String>) -> Self {
        Self::Service {
            service: ServiceKind::Registry,
            detail: detail.into(),
        }
    }

    pub fn verifier(detail: impl Into<String>) -> Self {
        Self::Service {
            service: ServiceKind::IdentityVerifier,
            detail: detail.into(),
        }
    }

    /// Every error is an error-class outcome; kept as a method so callers map
    /// errors and outcomes through the same vocabulary.
    pub fn class(&self) -> OutcomeClass {
        OutcomeClass::Error
    }

    /// Stable machine-readable code for JSON output
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::Configuration(_) => "configuration_error",
            LookupError::Service { .. } => "service_error",
            LookupError::Validation(_) => "validation_error",
            LookupError::NoMatch { .. } => "no_match",
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
