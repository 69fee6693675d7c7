//! Generic business words that are too common to identify a company.
//!
//! A registry entry equal to one of these never triggers a substring block on
//! its own; it can still block through an exact variant match.

pub const DEFAULT_STOPWORDS: &[&str] = &[
    "groep",
    "group",
    "inter",
    "global",
    "solutions",
    "services",
    "management",
    "consulting",
    "holding",
    "international",
    "nederland",
    "netherlands",
    "europe",
    "digital",
    "partners",
    "innovations",
    "systems",
    "logistics",
    "supply",
    "chain",
    "media",
    "tech",
];
