//! Classification of free-text contact-type labels.
//!
//! Contact logs store labels such as `"Gemaild (2); Gebeld"`: several
//! `;`-separated sub-types, each optionally followed by a parenthetical point
//! count. The label is parsed once into a [`ContactWeight`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::config::MatchConfig;

/// Spreadsheet error token left behind by broken formulas.
const REF_ERROR_TOKEN: &str = "#ref!";

static PARENTHETICAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(.*?\)").expect("Invalid regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactWeight {
    /// Only emails and/or calls.
    Light,
    /// Anything more substantive, or a label that could not be read.
    Heavy,
}

impl ContactWeight {
    /// Light only when every sub-type is a light contact type.
    pub fn from_types(types: &BTreeSet<String>, config: &MatchConfig) -> Self {
        if !types.is_empty() && types.is_subset(&config.light_contact_types) {
            ContactWeight::Light
        } else {
            ContactWeight::Heavy
        }
    }

    pub fn from_label(label: &str, config: &MatchConfig) -> Self {
        Self::from_types(&parse_contact_types(label), config)
    }

    pub fn window_days(self, config: &MatchConfig) -> i64 {
        match self {
            ContactWeight::Light => config.light_cooldown_days,
            ContactWeight::Heavy => config.heavy_cooldown_days,
        }
    }

    /// Dutch description used in cooldown reasons.
    pub fn description(self) -> &'static str {
        match self {
            ContactWeight::Light => "gemaild/gebeld",
            ContactWeight::Heavy => "zwaarder contact",
        }
    }
}

impl fmt::Display for ContactWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactWeight::Light => write!(f, "light"),
            ContactWeight::Heavy => write!(f, "heavy"),
        }
    }
}

/// Split a raw label into its normalized sub-types.
///
/// `"Gemaild (2); Gebeld"` becomes `{"gebeld", "gemaild"}`. Empty parts and
/// the `#REF!` error token are dropped.
pub fn parse_contact_types(label: &str) -> BTreeSet<String> {
    label
        .split(';')
        .map(|part| {
            PARENTHETICAL_PATTERN
                .replace_all(part, "")
                .trim()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty() && part != REF_ERROR_TOKEN)
        .collect()
}

/// Human label for a cooldown window: `"3 mnd"`, `"1 jaar"`, or a day count.
pub fn window_label(days: i64) -> String {
    match days {
        90 => "3 mnd".to_string(),
        365 => "1 jaar".to_string(),
        _ => format!("{} dagen", days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_strips_counts_and_case() {
        assert_eq!(
            parse_contact_types("Gemaild (2); Gebeld"),
            types(&["gemaild", "gebeld"])
        );
    }

    #[test]
    fn test_parse_drops_ref_errors_and_empty_parts() {
        assert_eq!(parse_contact_types("#REF!; ; Gebeld (1)"), types(&["gebeld"]));
        assert!(parse_contact_types("").is_empty());
        assert!(parse_contact_types("#REF!").is_empty());
    }

    #[test]
    fn test_parse_removes_every_parenthetical() {
        assert_eq!(
            parse_contact_types("Gesprek (3) (op locatie)"),
            types(&["gesprek"])
        );
    }

    #[test]
    fn test_light_only_types() {
        let config = MatchConfig::default();
        assert_eq!(ContactWeight::from_label("Gemaild", &config), ContactWeight::Light);
        assert_eq!(
            ContactWeight::from_label("Gemaild (2); Gebeld; Gemailed", &config),
            ContactWeight::Light
        );
    }

    #[test]
    fn test_any_heavy_type_makes_event_heavy() {
        let config = MatchConfig::default();
        assert_eq!(
            ContactWeight::from_label("Gemaild (2); Gesprek", &config),
            ContactWeight::Heavy
        );
        assert_eq!(ContactWeight::from_label("Afspraak", &config), ContactWeight::Heavy);
    }

    #[test]
    fn test_unreadable_label_is_heavy() {
        let config = MatchConfig::default();
        assert_eq!(ContactWeight::from_label("#REF!", &config), ContactWeight::Heavy);
        assert_eq!(ContactWeight::from_label("", &config), ContactWeight::Heavy);
    }

    #[test]
    fn test_window_days_and_labels() {
        let config = MatchConfig::default();
        assert_eq!(ContactWeight::Light.window_days(&config), 90);
        assert_eq!(ContactWeight::Heavy.window_days(&config), 365);
        assert_eq!(window_label(90), "3 mnd");
        assert_eq!(window_label(365), "1 jaar");
        assert_eq!(window_label(30), "30 dagen");
    }
}
