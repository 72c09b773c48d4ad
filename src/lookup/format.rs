//! Shapes a matched registry record into the final [`VerifiedEntity`]

use crate::models::{CandidateAddress, CandidateRecord, IdentityClaim, VerifiedEntity};

/// Build the success payload. Registry data wins: the legal name and LEI come
/// from the candidate, the claim only contributes its sources and cost.
pub fn format(candidate: &CandidateRecord, claim: IdentityClaim) -> VerifiedEntity {
    VerifiedEntity {
        lei: candidate.lei.clone(),
        legal_name: candidate.legal_name.clone(),
        address: assemble_address(&candidate.address),
        sources: claim.sources,
        estimated_cost: claim.estimated_cost,
    }
}

/// Address lines, city, region, postal code, country; blanks dropped.
pub fn assemble_address(address: &CandidateAddress) -> String {
    let tail = [
        &address.city,
        &address.region,
        &address.postal_code,
        &address.country,
    ];

    address
        .lines
        .iter()
        .map(String::as_str)
        .chain(tail.into_iter().filter_map(|part| part.as_deref()))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
