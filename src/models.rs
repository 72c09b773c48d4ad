//! Domain types shared by the registry client, the identity verifier and the
//! reconciliation pipeline.

use serde::{Deserialize, Serialize};

/// Structured legal address of a registry entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAddress {
    #[serde(default)]
    pub lines: Vec<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// One LEI record returned by a registry search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub lei: String,
    pub legal_name: String,
    pub legal_name_language: Option<String>,
    pub address: CandidateAddress,
    /// Entity status as reported by the registry (ACTIVE, INACTIVE)
    pub status: Option<String>,
    pub jurisdiction: Option<String>,
    pub category: Option<String>,
}

impl CandidateRecord {
    pub fn new(lei: impl Into<String>, legal_name: impl Into<String>) -> Self {
        Self {
            lei: lei.into(),
            legal_name: legal_name.into(),
            legal_name_language: None,
            address: CandidateAddress::default(),
            status: None,
            jurisdiction: None,
            category: None,
        }
    }

    pub fn with_address(mut self, address: CandidateAddress) -> Self {
        self.address = address;
        self
    }
}

/// Citation attached to a grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Legal name claimed by the identity verifier for a website
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    pub legal_name: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Approximate USD cost of the verification call, when tracked
    pub estimated_cost: Option<f64>,
}

impl IdentityClaim {
    pub fn new(legal_name: impl Into<String>) -> Self {
        Self {
            legal_name: legal_name.into(),
            sources: Vec::new(),
            estimated_cost: None,
        }
    }
}

/// Final artifact of a successful lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedEntity {
    pub lei: String,
    /// Registry legal name (never the AI claim)
    pub legal_name: String,
    pub address: String,
    pub sources: Vec<Source>,
    #[serde(rename = "cost", skip_serializing_if = "Option::is_none", default)]
    pub estimated_cost: Option<f64>,
}
