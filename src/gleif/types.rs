//! GLEIF API response types
//!
//! Only the Level 1 fields the lookup pipeline reads are mapped; everything
//! else in the JSON:API payload is ignored.
//!
//! Reference: https://api.gleif.org/api/v1/lei-records

use serde::Deserialize;

use crate::models::{CandidateAddress, CandidateRecord};

/// Top-level API response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct GleifResponse<T> {
    pub data: T,
}

/// LEI Record (Level 1 data)
#[derive(Debug, Clone, Deserialize)]
pub struct LeiRecord {
    pub attributes: LeiAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeiAttributes {
    pub lei: String,
    pub entity: EntityInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityInfo {
    #[serde(rename = "legalName")]
    pub legal_name: NameValue,

    #[serde(rename = "legalAddress", default)]
    pub legal_address: Address,

    pub status: Option<String>,
    pub jurisdiction: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameValue {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(rename = "addressLines", default)]
    pub address_lines: Vec<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
}

impl LeiRecord {
    pub fn lei(&self) -> &str {
        &self.attributes.lei
    }
}

impl From<LeiRecord> for CandidateRecord {
    fn from(record: LeiRecord) -> Self {
        let entity = record.attributes.entity;
        CandidateRecord {
            lei: record.attributes.lei,
            legal_name: entity.legal_name.name,
            legal_name_language: entity.legal_name.language,
            address: entity.legal_address.into(),
            status: entity.status,
            jurisdiction: entity.jurisdiction,
            category: entity.category,
        }
    }
}

impl From<Address> for CandidateAddress {
    fn from(addr: Address) -> Self {
        CandidateAddress {
            lines: addr.address_lines,
            city: addr.city,
            region: addr.region,
            country: addr.country,
            postal_code: addr.postal_code,
        }
    }
}

/// Check an LEI against ISO 17442: 20 uppercase alphanumerics whose
/// base-36 expansion is congruent to 1 mod 97.
pub fn is_valid_lei(lei: &str) -> bool {
    if lei.len() != 20
        || !lei
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return false;
    }

    let mut remainder: u32 = 0;
    for c in lei.chars() {
        // to_digit(36) maps A..Z to 10..35
        let Some(value) = c.to_digit(36) else {
            return false;
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder == 1
}
