use serde::Serialize;

use crate::gate::{BlockReason, Lead, LeadDecision};

pub const LEADGATE_OUTPUT_FORMAT_VERSION: &str = "1.0.0";

#[derive(Serialize, Debug)]
pub struct Output {
    pub headers: Vec<Header>,
    pub summary: Summary,
    pub leads: Vec<LeadReport>,
}

#[derive(Serialize, Debug)]
pub struct Header {
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub duration: f64,
    pub evaluated_at: String,
    pub extra_data: ExtraData,
    pub errors: Vec<String>,
    pub output_format_version: String,
}

#[derive(Serialize, Debug)]
pub struct ExtraData {
    pub leads_path: String,
    pub dnc_path: String,
    pub dnc_variants_count: usize,
    pub suppressed_emails_count: usize,
    pub contacted_companies_count: usize,
    /// `None` when no contact history was available and cooldowns were skipped.
    pub cooldown_companies_count: Option<usize>,
}

#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub dnc: usize,
    pub suppressed_email: usize,
    pub contacted_company: usize,
    pub cooldown: usize,
    pub sendable: usize,
}

impl Summary {
    pub fn from_decisions<'a>(decisions: impl IntoIterator<Item = &'a LeadDecision>) -> Self {
        let mut summary = Summary::default();
        for decision in decisions {
            summary.total += 1;
            match decision.reason {
                BlockReason::None => summary.sendable += 1,
                BlockReason::Dnc => summary.dnc += 1,
                BlockReason::SuppressedEmail => summary.suppressed_email += 1,
                BlockReason::ContactedCompany => summary.contacted_company += 1,
                BlockReason::Cooldown => summary.cooldown += 1,
            }
        }
        summary
    }
}

#[derive(Serialize, Debug)]
pub struct LeadReport {
    pub company: String,
    pub email: String,
    pub blocked: bool,
    pub reason: BlockReason,
    pub detail: String,
    pub status_label: Option<String>,
}

impl LeadReport {
    pub fn new(lead: &Lead, decision: LeadDecision) -> Self {
        Self {
            company: lead.company.clone(),
            email: lead.email.clone(),
            blocked: decision.blocked,
            reason: decision.reason,
            status_label: decision.reason.status_label().map(str::to_string),
            detail: decision.detail,
        }
    }
}
