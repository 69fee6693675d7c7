//! Per-lead send decision.
//!
//! Combines the Do-Not-Contact registry, the suppressed-email set, the
//! contacted-company set and, when available, the cooldown ledger. Checks run
//! in a fixed order and the first hit decides the reported reason.

use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::config::MatchConfig;
use crate::cooldown::ContactHistory;
use crate::matching::SuppressionRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub company: String,
    pub email: String,
}

impl Lead {
    pub fn new(company: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    None,
    Dnc,
    SuppressedEmail,
    ContactedCompany,
    Cooldown,
}

impl BlockReason {
    /// Mail status written back to the tracking sheet, if the reason has one.
    pub fn status_label(self) -> Option<&'static str> {
        match self {
            BlockReason::Dnc => Some("🚫 DNC"),
            BlockReason::SuppressedEmail => Some("⏭ AL GEMAILD"),
            BlockReason::None | BlockReason::ContactedCompany | BlockReason::Cooldown => None,
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockReason::None => "sendable",
            BlockReason::Dnc => "do not contact",
            BlockReason::SuppressedEmail => "already emailed",
            BlockReason::ContactedCompany => "company already contacted",
            BlockReason::Cooldown => "cooldown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadDecision {
    pub blocked: bool,
    pub reason: BlockReason,
    pub detail: String,
}

impl LeadDecision {
    pub fn allow() -> Self {
        Self {
            blocked: false,
            reason: BlockReason::None,
            detail: String::new(),
        }
    }

    pub fn block(reason: BlockReason, detail: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason,
            detail: detail.into(),
        }
    }
}

/// Read-only view over every block list for one run.
///
/// Classification never mutates its inputs, so a gate can be shared across
/// threads for batch classification.
#[derive(Debug, Clone, Copy)]
pub struct LeadGate<'a> {
    dnc: &'a SuppressionRegistry,
    suppressed_emails: &'a HashSet<String>,
    contacted_companies: &'a HashSet<String>,
    cooldown_history: Option<&'a ContactHistory>,
    config: &'a MatchConfig,
    now: NaiveDateTime,
}

impl<'a> LeadGate<'a> {
    pub fn new(
        dnc: &'a SuppressionRegistry,
        suppressed_emails: &'a HashSet<String>,
        contacted_companies: &'a HashSet<String>,
        config: &'a MatchConfig,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            dnc,
            suppressed_emails,
            contacted_companies,
            cooldown_history: None,
            config,
            now,
        }
    }

    /// Enable the cooldown check. Without history it is skipped.
    pub fn with_cooldown_history(mut self, history: &'a ContactHistory) -> Self {
        self.cooldown_history = Some(history);
        self
    }

    pub fn has_cooldown_history(&self) -> bool {
        self.cooldown_history.is_some()
    }

    /// Classify one lead.
    ///
    /// Order: DNC registry, suppressed email, contacted company, cooldown.
    pub fn classify(&self, lead: &Lead) -> LeadDecision {
        if let Some(hit) = self.dnc.check(&lead.company, self.config) {
            return LeadDecision::block(BlockReason::Dnc, hit.to_string());
        }

        let email = lead.email.trim().to_lowercase();
        if !email.is_empty() && self.suppressed_emails.contains(&email) {
            return LeadDecision::block(
                BlockReason::SuppressedEmail,
                format!("{} already received outreach", email),
            );
        }

        let company = lead.company.trim().to_lowercase();
        if !company.is_empty() && self.contacted_companies.contains(&company) {
            return LeadDecision::block(
                BlockReason::ContactedCompany,
                format!("'{}' was contacted before", lead.company.trim()),
            );
        }

        if let Some(history) = self.cooldown_history
            && let Some(block) = history.check(&lead.company, self.now, self.config)
        {
            return LeadDecision::block(BlockReason::Cooldown, block.to_string());
        }

        LeadDecision::allow()
    }

    /// Classify a batch in parallel. Decisions are returned in input order.
    pub fn classify_all(&self, leads: &[Lead], progress_bar: &ProgressBar) -> Vec<LeadDecision> {
        leads
            .par_iter()
            .map(|lead| {
                let decision = self.classify(lead);
                progress_bar.inc(1);
                decision
            })
            .collect()
    }
}
