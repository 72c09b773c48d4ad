//! Name matching between registry records and verified legal names

pub mod normalize;
pub mod reconcile;

pub use normalize::{normalize, NameNormalizer, NormalizationTables};
pub use reconcile::{containment, MatchKind, MatchResult, ReconciliationEngine};
