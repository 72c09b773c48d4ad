//! Legal name normalization
//!
//! Canonicalizes free-text legal names so registry entries and verifier claims
//! can be compared:
//! - Lowercase conversion
//! - Legal suffix removal (whole words, optional trailing period)
//! - Punctuation stripping
//! - Whitespace collapsing and trimming
//!
//! No Unicode folding is applied; accented and non-Latin names pass through as
//! lowercase text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LookupError, Result};

/// Legal suffixes removed by default
pub const DEFAULT_LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "llc",
    "ltd",
    "corp",
    "corporation",
    "gmbh",
    "ag",
    "sarl",
    "l.l.c",
    "l.t.d",
];

/// Additional suffixes enabled by [`NormalizationTables::extended`]
pub const EXTENDED_LEGAL_SUFFIXES: &[&str] =
    &["incorporated", "limited", "sa", "plc", "co", "company"];

/// Characters deleted during normalization
pub const DEFAULT_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

static DEFAULT_NORMALIZER: LazyLock<NameNormalizer> = LazyLock::new(|| {
    NameNormalizer::new(NormalizationTables::default())
        .expect("default suffix table is a valid pattern")
});

/// Normalize with the default tables
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Suffix and punctuation tables driving a [`NameNormalizer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationTables {
    pub legal_suffixes: Vec<String>,
    pub punctuation: Vec<char>,
}

impl Default for NormalizationTables {
    fn default() -> Self {
        Self {
            legal_suffixes: DEFAULT_LEGAL_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            punctuation: DEFAULT_PUNCTUATION.to_vec(),
        }
    }
}

impl NormalizationTables {
    /// Default tables plus the wider suffix set (`limited`, `plc`, `co`, ...)
    pub fn extended() -> Self {
        Self::default().with_suffixes(EXTENDED_LEGAL_SUFFIXES.iter().copied())
    }

    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for suffix in suffixes {
            let suffix = suffix.into().trim().to_lowercase();
            if !suffix.is_empty() && !self.legal_suffixes.contains(&suffix) {
                self.legal_suffixes.push(suffix);
            }
        }
        self
    }

    pub fn with_punctuation(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        for c in chars {
            if !self.punctuation.contains(&c) {
                self.punctuation.push(c);
            }
        }
        self
    }
}

/// Compiled normalizer for one set of tables
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    suffix_pattern: Option<Regex>,
    punctuation: Vec<char>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        DEFAULT_NORMALIZER.clone()
    }
}

impl NameNormalizer {
    pub fn new(tables: NormalizationTables) -> Result<Self> {
        let mut suffixes: Vec<String> = tables
            .legal_suffixes
            .iter()
            .map(|s| s.trim().trim_end_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        // Longest first so "corporation" wins over "corp" at the same position
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        suffixes.dedup();

        let suffix_pattern = if suffixes.is_empty() {
            None
        } else {
            let alternation = suffixes
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{})\b\.?", alternation);
            Some(Regex::new(&pattern).map_err(|e| {
                LookupError::configuration(format!("Invalid legal suffix table: {}", e))
            })?)
        };

        Ok(Self {
            suffix_pattern,
            punctuation: tables.punctuation,
        })
    }

    /// Normalize a legal name.
    ///
    /// The pass is repeated until the output stops changing; stripping
    /// punctuation can expose a suffix (`"in.c"` becomes `"inc"`), and the
    /// result must be a fixed point of `normalize`.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.normalize_once(raw);
        loop {
            let next = self.normalize_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn normalize_once(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();

        let without_suffixes = match &self.suffix_pattern {
            Some(pattern) => pattern.replace_all(&lowered, "").into_owned(),
            None => lowered,
        };

        let stripped: String = without_suffixes
            .chars()
            .filter(|c| !self.punctuation.contains(c))
            .collect();

        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
