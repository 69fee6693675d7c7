use chrono::{NaiveDate, NaiveDateTime};
use indicatif::ProgressBar;
use leadgate::models::{LeadReport, Summary};
use leadgate::sources::{
    load_contacted_companies, load_do_not_contact, load_leads, load_recent_contacts,
    load_suppression,
};
use leadgate::{BlockReason, ContactWeight, LeadGate, MatchConfig};
use std::path::Path;

const TESTDATA: &str = "testdata/gate";

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(TESTDATA).join(name)
}

/// Evaluation moment shared by all tests, as passed with `--now 2026-10-19`.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn test_full_run_classifies_every_lead() {
    let config = MatchConfig::default();
    let registry =
        load_do_not_contact(&fixture("dnc.csv"), &config).expect("DNC registry should load");
    let suppressed = load_suppression(&fixture("suppression.csv")).expect("Suppression list");
    let contacted = load_contacted_companies(&fixture("send_log.csv")).expect("Send log");
    let history = load_recent_contacts(&fixture("contacts.csv"), now()).expect("History");
    let leads = load_leads(&fixture("leads.csv")).expect("Leads should load");

    let gate = LeadGate::new(&registry, &suppressed, &contacted, &config, now())
        .with_cooldown_history(&history);
    let decisions = gate.classify_all(&leads, &ProgressBar::hidden());

    let reasons: Vec<(&str, BlockReason)> = leads
        .iter()
        .zip(&decisions)
        .map(|(lead, decision)| (lead.company.as_str(), decision.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("Fritom", BlockReason::Dnc),
            ("Sanbio Holding", BlockReason::None),
            ("Bouwgroep Noord-Brabant Oost", BlockReason::Dnc),
            ("Acme Logistiek", BlockReason::SuppressedEmail),
            ("Omega Zorg", BlockReason::ContactedCompany),
            ("Zeta Bouw", BlockReason::Cooldown),
            ("Delta Techniek", BlockReason::None),
            ("Kappa Installaties", BlockReason::None),
            ("Heavy Metal BV", BlockReason::Cooldown),
        ]
    );

    assert_eq!(decisions[0].detail, "exact match on 'fritom'");
    assert_eq!(
        decisions[2].detail,
        "partial match on 'bouwgroep noord brabant'"
    );
    assert_eq!(
        decisions[5].detail,
        "gemaild/gebeld op 01-09-2026 (3 mnd cooldown, nog 42 dag(en))"
    );
    assert_eq!(
        decisions[8].detail,
        "zwaarder contact op 01-02-2026 (1 jaar cooldown, nog 105 dag(en))"
    );

    let summary = Summary::from_decisions(&decisions);
    assert_eq!(
        summary,
        Summary {
            total: 9,
            dnc: 2,
            suppressed_email: 1,
            contacted_company: 1,
            cooldown: 2,
            sendable: 3,
        }
    );
}

#[test]
fn test_without_history_cooldowns_are_skipped() {
    let config = MatchConfig::default();
    let registry = load_do_not_contact(&fixture("dnc.csv"), &config).unwrap();
    let suppressed = load_suppression(&fixture("suppression.csv")).unwrap();
    let contacted = load_contacted_companies(&fixture("send_log.csv")).unwrap();
    let leads = load_leads(&fixture("leads.csv")).unwrap();

    let gate = LeadGate::new(&registry, &suppressed, &contacted, &config, now());
    assert!(!gate.has_cooldown_history());

    let decisions = gate.classify_all(&leads, &ProgressBar::hidden());
    assert!(
        decisions
            .iter()
            .all(|decision| decision.reason != BlockReason::Cooldown)
    );
    assert_eq!(Summary::from_decisions(&decisions).sendable, 5);
}

#[test]
fn test_leads_keep_rows_without_email() {
    let leads = load_leads(&fixture("leads.csv")).unwrap();
    assert_eq!(leads.len(), 9);
    assert_eq!(leads[3].email, "kees@acme.nl");
    assert_eq!(leads[7].email, "");
    assert_eq!(leads[8].email, "mark@heavy.nl");
}

#[test]
fn test_history_repairs_swapped_dates_and_skips_blank_rows() {
    let config = MatchConfig::default();
    let history = load_recent_contacts(&fixture("contacts.csv"), now()).unwrap();

    assert_eq!(history.len(), 4);
    assert_eq!(history.event_count(), 5);

    let blocked = history.blocked_companies(now(), &config);
    let companies: Vec<&str> = blocked.keys().map(String::as_str).collect();
    assert_eq!(companies, vec!["heavy metal", "swapped co", "zeta bouw"]);

    let swapped = &blocked["swapped co"];
    assert_eq!(
        swapped.contact_date,
        NaiveDate::from_ymd_opt(2026, 5, 12)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
    assert_eq!(swapped.weight, ContactWeight::Heavy);
}

#[test]
fn test_report_carries_status_labels() {
    let config = MatchConfig::default();
    let registry = load_do_not_contact(&fixture("dnc.csv"), &config).unwrap();
    let suppressed = load_suppression(&fixture("suppression.csv")).unwrap();
    let contacted = load_contacted_companies(&fixture("send_log.csv")).unwrap();
    let leads = load_leads(&fixture("leads.csv")).unwrap();

    let gate = LeadGate::new(&registry, &suppressed, &contacted, &config, now());
    let reports: Vec<LeadReport> = leads
        .iter()
        .map(|lead| LeadReport::new(lead, gate.classify(lead)))
        .collect();

    assert_eq!(reports[0].status_label.as_deref(), Some("🚫 DNC"));
    assert_eq!(reports[3].status_label.as_deref(), Some("⏭ AL GEMAILD"));
    assert_eq!(reports[4].status_label, None);

    let json = serde_json::to_value(&reports[3]).unwrap();
    assert_eq!(json["reason"], "SUPPRESSED_EMAIL");
    assert_eq!(json["email"], "kees@acme.nl");
}
