//! Do-Not-Contact registry and the suppression matcher.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::config::MatchConfig;
use crate::matching::normalize::normalize_company;
use crate::matching::variants::extract_variants_with_min_length;

/// How a candidate name hit the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// One of the candidate's variants is a registry entry.
    Exact,
    /// A long, non-generic registry entry overlaps the whole candidate name.
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DncMatch {
    pub token: String,
    pub strategy: MatchStrategy,
}

impl fmt::Display for DncMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            MatchStrategy::Exact => write!(f, "exact match on '{}'", self.token),
            MatchStrategy::Substring => write!(f, "partial match on '{}'", self.token),
        }
    }
}

/// Normalized company variants that must never be contacted.
///
/// Built once per run and read-only afterwards. Entries are kept sorted so
/// that the matched token is deterministic when several entries qualify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionRegistry {
    entries: BTreeSet<String>,
}

impl SuppressionRegistry {
    /// Build a registry from raw company names, expanding each to its variants.
    pub fn from_names<I, S>(names: I, config: &MatchConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = BTreeSet::new();
        for name in names {
            entries.extend(extract_variants_with_min_length(
                name.as_ref(),
                config.min_variant_length,
            ));
        }
        Self { entries }
    }

    /// Build a registry from tokens that are already normalized.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = tokens
            .into_iter()
            .map(Into::into)
            .filter(|token: &String| !token.is_empty())
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Decide whether `candidate` is blocked.
    ///
    /// Exact pass first: any variant of the candidate present in the
    /// registry. Then the substring pass over the whole normalized name: an
    /// entry of at least `min_substring_match_length` characters that is not a
    /// stop-word blocks when either string contains the other.
    ///
    /// Blank names are never blocked. Names made only of punctuation and
    /// legal suffixes are blocked whenever the substring pass has an entry.
    pub fn check(&self, candidate: &str, config: &MatchConfig) -> Option<DncMatch> {
        if candidate.trim().is_empty() {
            return None;
        }

        let variants = extract_variants_with_min_length(candidate, config.min_variant_length);
        if let Some(token) = variants.iter().find(|v| self.entries.contains(v.as_str())) {
            return Some(DncMatch {
                token: token.clone(),
                strategy: MatchStrategy::Exact,
            });
        }

        // A name that normalizes to nothing is contained in every entry and
        // is blocked by the first long, non-generic one.
        let normalized = normalize_company(candidate);
        self.entries
            .iter()
            .filter(|entry| entry.chars().count() >= config.min_substring_match_length)
            .filter(|entry| !config.is_stopword(entry))
            .find(|entry| normalized.contains(entry.as_str()) || entry.contains(&normalized))
            .map(|entry| DncMatch {
                token: entry.clone(),
                strategy: MatchStrategy::Substring,
            })
    }
}

/// Convenience wrapper around [`SuppressionRegistry::check`].
pub fn is_blocked(
    candidate: &str,
    registry: &SuppressionRegistry,
    config: &MatchConfig,
) -> Option<DncMatch> {
    registry.check(candidate, config)
}
