//! Tunable heuristics for company matching and re-contact cooldowns.
//!
//! The defaults were tuned on Dutch company names and contact logs and can be
//! overridden from a TOML file.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::matching::stopwords::DEFAULT_STOPWORDS;

/// Split parts shorter than this are not kept as separate variants.
pub const MIN_VARIANT_LENGTH: usize = 3;

/// Registry entries shorter than this only ever match exactly.
pub const MIN_SUBSTRING_MATCH_LENGTH: usize = 8;

/// Company keys shorter than this never take the fuzzy history lookup.
pub const MIN_FUZZY_KEY_LENGTH: usize = 4;

/// Cooldown after an email- or call-only contact ("3 mnd").
pub const LIGHT_COOLDOWN_DAYS: i64 = 90;

/// Cooldown after any heavier contact such as a meeting ("1 jaar").
pub const HEAVY_COOLDOWN_DAYS: i64 = 365;

/// Longest cooldown window accepted from a config file.
pub const MAX_COOLDOWN_DAYS: i64 = 36_500;

/// Contact types that count as a light touch.
pub const DEFAULT_LIGHT_CONTACT_TYPES: &[&str] = &["gemaild", "gebeld", "gemailed"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub min_variant_length: usize,
    pub min_substring_match_length: usize,
    pub min_fuzzy_key_length: usize,
    pub light_cooldown_days: i64,
    pub heavy_cooldown_days: i64,
    pub stopwords: BTreeSet<String>,
    pub light_contact_types: BTreeSet<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_variant_length: MIN_VARIANT_LENGTH,
            min_substring_match_length: MIN_SUBSTRING_MATCH_LENGTH,
            min_fuzzy_key_length: MIN_FUZZY_KEY_LENGTH,
            light_cooldown_days: LIGHT_COOLDOWN_DAYS,
            heavy_cooldown_days: HEAVY_COOLDOWN_DAYS,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            light_contact_types: DEFAULT_LIGHT_CONTACT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl MatchConfig {
    /// Load overrides from a TOML file. Keys that are absent keep their default.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid match config {}", path.display()))
    }

    /// Parse overrides, lowercase the word lists and validate the result.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: MatchConfig = toml::from_str(content)?;
        config.stopwords = lowercase_set(&config.stopwords);
        config.light_contact_types = lowercase_set(&config.light_contact_types);
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would disable a guard or overflow date math.
    pub fn validate(&self) -> Result<()> {
        if self.min_variant_length == 0 {
            bail!("min_variant_length must be at least 1");
        }
        if self.min_substring_match_length == 0 {
            bail!("min_substring_match_length must be at least 1");
        }
        for (name, days) in [
            ("light_cooldown_days", self.light_cooldown_days),
            ("heavy_cooldown_days", self.heavy_cooldown_days),
        ] {
            if !(0..=MAX_COOLDOWN_DAYS).contains(&days) {
                bail!(
                    "{} must be between 0 and {}, got {}",
                    name,
                    MAX_COOLDOWN_DAYS,
                    days
                );
            }
        }
        Ok(())
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }
}

fn lowercase_set(words: &BTreeSet<String>) -> BTreeSet<String> {
    words
        .iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}
