//! Re-contact cooldown ledger.
//!
//! Holds the contact history per company and decides whether a company may be
//! approached again. One blocking event is enough to block the company.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::MatchConfig;
use crate::cooldown::contact_type::{ContactWeight, parse_contact_types, window_label};
use crate::cooldown::date_repair::repair_swapped_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEvent {
    pub date: NaiveDateTime,
    pub type_label: String,
    types: BTreeSet<String>,
}

impl ContactEvent {
    pub fn new(date: NaiveDateTime, type_label: impl Into<String>) -> Self {
        let type_label = type_label.into();
        let types = parse_contact_types(&type_label);
        Self {
            date,
            type_label,
            types,
        }
    }

    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn weight(&self, config: &MatchConfig) -> ContactWeight {
        ContactWeight::from_types(&self.types, config)
    }
}

/// A company that is still inside its cooldown window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooldownBlock {
    pub contact_date: NaiveDateTime,
    pub weight: ContactWeight,
    pub window_days: i64,
    pub days_remaining: i64,
}

impl fmt::Display for CooldownBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} op {} ({} cooldown, nog {} dag(en))",
            self.weight.description(),
            self.contact_date.format("%d-%m-%Y"),
            window_label(self.window_days),
            self.days_remaining
        )
    }
}

/// Contact events keyed by trimmed, lowercased company name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactHistory {
    companies: BTreeMap<String, Vec<ContactEvent>>,
}

impl ContactHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. Returns `false` when the company name is blank.
    pub fn add(&mut self, company: &str, event: ContactEvent) -> bool {
        let key = company_key(company);
        if key.is_empty() {
            return false;
        }
        self.companies.entry(key).or_default().push(event);
        true
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.companies.values().map(Vec::len).sum()
    }

    /// Apply the day/month repair to every stored date.
    ///
    /// Run once after loading, before any cooldown check.
    pub fn repair_dates(&mut self, now: NaiveDateTime) -> usize {
        let mut repaired = 0;
        for event in self.companies.values_mut().flatten() {
            let fixed = repair_swapped_date(event.date, now);
            if fixed != event.date {
                event.date = fixed;
                repaired += 1;
            }
        }
        repaired
    }

    /// Events recorded for `company`, oldest first.
    ///
    /// Uses the exact key when present. Otherwise every stored key that
    /// contains the company key, or is contained in it, contributes its
    /// events, provided the company key is at least `min_fuzzy_key_length`
    /// characters long.
    pub fn events_for(&self, company: &str, config: &MatchConfig) -> Vec<&ContactEvent> {
        let key = company_key(company);
        let mut events: Vec<&ContactEvent> = match self.companies.get(&key) {
            Some(exact) => exact.iter().collect(),
            None if key.chars().count() >= config.min_fuzzy_key_length => self
                .companies
                .iter()
                .filter(|(stored, _)| stored.contains(&key) || key.contains(stored.as_str()))
                .flat_map(|(_, rows)| rows.iter())
                .collect(),
            None => Vec::new(),
        };
        events.sort_by_key(|event| event.date);
        events
    }

    /// Check whether `company` is still in cooldown at `now`.
    pub fn check(
        &self,
        company: &str,
        now: NaiveDateTime,
        config: &MatchConfig,
    ) -> Option<CooldownBlock> {
        self.events_for(company, config)
            .into_iter()
            .find_map(|event| cooldown_for_event(event, now, config))
    }

    /// Every company currently blocked, with the reason.
    pub fn blocked_companies(
        &self,
        now: NaiveDateTime,
        config: &MatchConfig,
    ) -> BTreeMap<String, CooldownBlock> {
        self.companies
            .keys()
            .filter_map(|key| self.check(key, now, config).map(|block| (key.clone(), block)))
            .collect()
    }
}

/// Convenience wrapper around [`ContactHistory::check`].
pub fn is_in_cooldown(
    company: &str,
    history: &ContactHistory,
    now: NaiveDateTime,
    config: &MatchConfig,
) -> Option<CooldownBlock> {
    history.check(company, now, config)
}

fn cooldown_for_event(
    event: &ContactEvent,
    now: NaiveDateTime,
    config: &MatchConfig,
) -> Option<CooldownBlock> {
    let weight = event.weight(config);
    let window_days = weight.window_days(config);
    // Windows past the representable range saturate instead of overflowing.
    let window = Duration::try_days(window_days).unwrap_or(Duration::MAX);

    if now.signed_duration_since(event.date) >= window {
        return None;
    }

    let window_end = event
        .date
        .checked_add_signed(window)
        .unwrap_or(NaiveDateTime::MAX);
    let days_remaining = window_end.signed_duration_since(now).num_days();
    Some(CooldownBlock {
        contact_date: event.date,
        weight,
        window_days,
        days_remaining,
    })
}

fn company_key(company: &str) -> String {
    company.trim().to_lowercase()
}
