//! Reconciliation of registry candidates against a verified legal name
//!
//! The first candidate, in registry order, whose normalized legal name
//! contains or is contained by the normalized claim wins. Names that normalize
//! to the empty string never match.

use serde::Serialize;
use tracing::{debug, info};

use super::normalize::NameNormalizer;
use crate::models::{CandidateRecord, IdentityClaim};

/// Which containment direction satisfied the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Normalized names are identical
    Exact,
    /// Claim is a substring of the candidate name ("google" in "google ireland")
    ClaimWithinCandidate,
    /// Candidate name is a substring of the claim
    CandidateWithinClaim,
}

/// Outcome of reconciling one search
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// Registry returned nothing; the entity likely has no LEI
    NoCandidates,
    /// Candidates existed but none matched the claim
    NoMatch {
        claimed_name: String,
        company_name: String,
    },
    Matched {
        candidate: CandidateRecord,
        kind: MatchKind,
    },
}

/// Bidirectional containment test on already-normalized names
pub fn containment(claim: &str, candidate: &str) -> Option<MatchKind> {
    if claim.is_empty() || candidate.is_empty() {
        return None;
    }
    if claim == candidate {
        Some(MatchKind::Exact)
    } else if candidate.contains(claim) {
        Some(MatchKind::ClaimWithinCandidate)
    } else if claim.contains(candidate) {
        Some(MatchKind::CandidateWithinClaim)
    } else {
        None
    }
}

/// Selects the registry record that corresponds to an identity claim
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    normalizer: NameNormalizer,
}

impl ReconciliationEngine {
    pub fn new(normalizer: NameNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn reconcile(
        &self,
        company_name: &str,
        candidates: Vec<CandidateRecord>,
        claim: &IdentityClaim,
    ) -> MatchResult {
        if candidates.is_empty() {
            return MatchResult::NoCandidates;
        }

        let normalized_claim = self.normalizer.normalize(&claim.legal_name);
        if normalized_claim.is_empty() {
            info!(
                claimed_name = %claim.legal_name,
                "Claimed name is empty after normalization; nothing can match"
            );
        }

        let total = candidates.len();
        for (position, candidate) in candidates.into_iter().enumerate() {
            if candidate.legal_name.trim().is_empty() {
                debug!(lei = %candidate.lei, "Skipping candidate without a legal name");
                continue;
            }

            let normalized_candidate = self.normalizer.normalize(&candidate.legal_name);
            if let Some(kind) = containment(&normalized_claim, &normalized_candidate) {
                info!(
                    lei = %candidate.lei,
                    legal_name = %candidate.legal_name,
                    position,
                    ?kind,
                    "Candidate matched claimed name"
                );
                return MatchResult::Matched { candidate, kind };
            }

            debug!(
                lei = %candidate.lei,
                candidate = %normalized_candidate,
                claim = %normalized_claim,
                "Candidate rejected"
            );
        }

        info!(
            candidates = total,
            claimed_name = %claim.legal_name,
            "No candidate matched claimed name"
        );
        MatchResult::NoMatch {
            claimed_name: claim.legal_name.clone(),
            company_name: company_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalize::NormalizationTables;
    use proptest::prelude::*;

    fn candidates(names: &[&str]) -> Vec<CandidateRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| CandidateRecord::new(format!("LEI{:017}", i), *name))
            .collect()
    }

    fn engine() -> ReconciliationEngine {
        ReconciliationEngine::default()
    }

    #[test]
    fn test_partial_name_selects_first_containing_candidate() {
        let result = engine().reconcile(
            "Google",
            candidates(&["Google LLC", "Alphabet Inc"]),
            &IdentityClaim::new("Google"),
        );
        match result {
            MatchResult::Matched { candidate, kind } => {
                assert_eq!(candidate.legal_name, "Google LLC");
                assert_eq!(kind, MatchKind::Exact);
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_claim_is_no_match() {
        let result = engine().reconcile(
            "Alphabet",
            candidates(&["Alphabet Inc"]),
            &IdentityClaim::new("Microsoft Corporation"),
        );
        assert_eq!(
            result,
            MatchResult::NoMatch {
                claimed_name: "Microsoft Corporation".to_string(),
                company_name: "Alphabet".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_candidates_is_no_candidates() {
        for claim in ["Google", "", "Inc."] {
            let result = engine().reconcile("Google", vec![], &IdentityClaim::new(claim));
            assert_eq!(result, MatchResult::NoCandidates);
        }
    }

    #[test]
    fn test_suffix_only_claim_matches_nothing() {
        let result = engine().reconcile(
            "Acme",
            candidates(&["Acme Inc", "Inc."]),
            &IdentityClaim::new("Inc."),
        );
        assert!(matches!(result, MatchResult::NoMatch { .. }));
    }

    #[test]
    fn test_empty_normalized_candidate_is_skipped() {
        let result = engine().reconcile(
            "Acme",
            candidates(&["L.L.C.", "", "Acme Widgets Inc"]),
            &IdentityClaim::new("Acme Widgets"),
        );
        match result {
            MatchResult::Matched { candidate, .. } => {
                assert_eq!(candidate.legal_name, "Acme Widgets Inc")
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_order_is_tie_break() {
        let result = engine().reconcile(
            "Google",
            candidates(&["Google Ireland Limited", "Google LLC"]),
            &IdentityClaim::new("Google"),
        );
        match result {
            MatchResult::Matched { candidate, kind } => {
                assert_eq!(candidate.legal_name, "Google Ireland Limited");
                assert_eq!(kind, MatchKind::ClaimWithinCandidate);
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_candidate_within_claim() {
        let result = engine().reconcile(
            "Meta",
            candidates(&["Meta Platforms"]),
            &IdentityClaim::new("Meta Platforms Ireland Ltd"),
        );
        assert!(matches!(
            result,
            MatchResult::Matched {
                kind: MatchKind::CandidateWithinClaim,
                ..
            }
        ));
    }

    #[test]
    fn test_custom_normalizer() {
        let normalizer = NameNormalizer::new(NormalizationTables::extended()).unwrap();
        let result = ReconciliationEngine::new(normalizer).reconcile(
            "Barclays",
            candidates(&["BARCLAYS PLC"]),
            &IdentityClaim::new("Barclays Bank"),
        );
        assert!(matches!(result, MatchResult::Matched { .. }));
    }

    #[test]
    fn test_containment() {
        assert_eq!(containment("apple", "apple"), Some(MatchKind::Exact));
        assert_eq!(containment("", "apple"), None);
        assert_eq!(containment("apple", ""), None);
        assert_eq!(containment("", ""), None);
        assert_eq!(containment("pear", "apple"), None);
    }

    proptest! {
        #[test]
        fn prop_empty_normalized_claim_never_matches(
            claim in "((inc|llc|ltd|corp|gmbh|ag)\\.? |[.,()&-]| ){0,6}",
            names in proptest::collection::vec("[A-Za-z ]{0,20}", 1..5),
        ) {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let result = engine().reconcile("x", candidates(&names), &IdentityClaim::new(claim));
            let is_no_match = matches!(result, MatchResult::NoMatch { .. });
            prop_assert!(is_no_match);
        }
    }
}
