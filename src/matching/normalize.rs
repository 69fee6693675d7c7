//! Company name normalization.
//!
//! Normalization makes names from different sources comparable: it lowercases,
//! drops legal-entity suffixes and collapses punctuation into single spaces.

use once_cell::sync::Lazy;
use regex::Regex;

/// Legal-entity suffixes, tolerant of internal dots and spacing (`b.v.`, `b v`, `bv`).
static LEGAL_SUFFIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(b\.?\s*v\.?|n\.?\s*v\.?|v\.?\s*o\.?\s*f\.?|ltd\.?|gmbh|inc\.?|llc|bv|nv|vof)\b",
    )
    .expect("Invalid regex pattern")
});

static NON_ALNUM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("Invalid regex pattern"));

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

/// Normalize a raw company name into a comparable token.
///
/// Never fails; a name made only of punctuation and legal suffixes
/// normalizes to the empty string.
///
/// The result is a fixed point: `normalize_company(&normalize_company(s))`
/// equals `normalize_company(s)`. Punctuation removal can expose a suffix
/// that was not a whole word before (`"Foo B-V"` becomes `"foo b v"`), so
/// suffix stripping is repeated until nothing changes.
pub fn normalize_company(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = LEGAL_SUFFIX_PATTERN.replace_all(&lowered, "");
    let cleaned = NON_ALNUM_PATTERN.replace_all(&stripped, " ");
    let mut normalized = collapse_whitespace(&cleaned);

    loop {
        let stripped = LEGAL_SUFFIX_PATTERN.replace_all(&normalized, "");
        let next = collapse_whitespace(&stripped);
        if next == normalized {
            return normalized;
        }
        normalized = next;
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_PATTERN.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_company(""), "");
        assert_eq!(normalize_company("   "), "");
    }

    #[test]
    fn test_normalize_strips_dutch_legal_forms() {
        assert_eq!(normalize_company("Sanbio B.V."), normalize_company("Sanbio"));
        assert_eq!(normalize_company("Sanbio B.V."), "sanbio");
        assert_eq!(normalize_company("Sanbio BV"), "sanbio");
        assert_eq!(normalize_company("Sanbio b v"), "sanbio");
        assert_eq!(normalize_company("Philips N.V."), "philips");
        assert_eq!(normalize_company("Bakkerij de Jong V.O.F."), "bakkerij de jong");
        assert_eq!(normalize_company("Bakkerij de Jong VOF"), "bakkerij de jong");
    }

    #[test]
    fn test_normalize_strips_foreign_legal_forms() {
        assert_eq!(normalize_company("Acme Ltd."), "acme");
        assert_eq!(normalize_company("Acme GmbH"), "acme");
        assert_eq!(normalize_company("Acme, Inc."), "acme");
        assert_eq!(normalize_company("Acme LLC"), "acme");
    }

    #[test]
    fn test_normalize_keeps_suffix_letters_inside_words() {
        assert_eq!(normalize_company("Bvision"), "bvision");
        assert_eq!(normalize_company("Incasso Partners"), "incasso partners");
        assert_eq!(normalize_company("Envoy"), "envoy");
    }

    #[test]
    fn test_normalize_collapses_punctuation() {
        assert_eq!(normalize_company("  Van  der Valk & Zn.  "), "van der valk zn");
        assert_eq!(normalize_company("Melkweg|Fritom"), "melkweg fritom");
        assert_eq!(normalize_company("A.S.R."), "a s r");
    }

    #[test]
    fn test_normalize_drops_non_ascii_letters() {
        assert_eq!(normalize_company("Café Noir"), "caf noir");
    }

    #[test]
    fn test_normalize_suffix_only_is_empty() {
        assert_eq!(normalize_company("B.V."), "");
        assert_eq!(normalize_company("!!!"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Sanbio B.V.",
            "Foo B-V",
            "x_bv",
            "Royal FrieslandCampina N.V.",
            "Nabuurs - supply chain solutions",
            "Melkweg|Fritom",
            "  ;;; ",
            "Ltd Ltd. LLC",
            "b. v. b. v.",
            "Café Noir",
            "ÇA Holding",
        ];
        for sample in samples {
            let once = normalize_company(sample);
            assert_eq!(normalize_company(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
