//! Derive every identity a single company name can stand for.
//!
//! Source data mixes brands in one cell (`"Melkweg|Fritom"`) or appends a
//! tagline (`"Nabuurs - supply chain solutions"`). Each meaningful segment is
//! kept as its own variant so that a registry entry for one brand blocks the
//! compound name.

use std::collections::BTreeSet;

use crate::config::MIN_VARIANT_LENGTH;
use crate::matching::normalize::normalize_company;

/// Separators tried in order on the raw (not normalized) name.
pub const VARIANT_SEPARATORS: &[&str] = &[";", "|", " - ", ","];

/// Extract variants with the default minimum part length.
pub fn extract_variants(raw: &str) -> BTreeSet<String> {
    extract_variants_with_min_length(raw, MIN_VARIANT_LENGTH)
}

/// Extract the normalized variants of `raw`.
///
/// The whole-name normalization is always included unless it is empty.
/// Split parts are only kept when their normalized form has at least
/// `min_part_length` characters, so short brands such as `"ABC"` survive but
/// two-letter fragments do not.
pub fn extract_variants_with_min_length(raw: &str, min_part_length: usize) -> BTreeSet<String> {
    let mut variants = BTreeSet::new();
    variants.insert(normalize_company(raw));

    for separator in VARIANT_SEPARATORS {
        if !raw.contains(separator) {
            continue;
        }
        for part in raw.split(separator) {
            let normalized = normalize_company(part.trim());
            if normalized.chars().count() >= min_part_length {
                variants.insert(normalized);
            }
        }
    }

    variants.retain(|variant| !variant.is_empty());
    variants
}
