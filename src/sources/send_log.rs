//! Local safety layers kept next to the tracking sheet.
//!
//! - Suppression list: every address that received a mail (`email` column)
//! - Send log: audit trail of every send attempt, also the source of the
//!   set of companies contacted before

use anyhow::{Context, Result};
use chrono::Local;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Send-log status of a delivered mail.
pub const STATUS_SENT: &str = "SENT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendLogRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub consultant: String,
    #[serde(default)]
    pub vestiging: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SuppressionRow {
    #[serde(default)]
    email: String,
}

/// Load suppressed addresses, lowercased. A missing file is an empty list.
pub fn load_suppression(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open suppression list {}", path.display()))?;

    let mut suppressed = HashSet::new();
    for row in reader.deserialize::<SuppressionRow>() {
        let row = row.with_context(|| format!("Malformed row in {}", path.display()))?;
        let email = row.email.trim().to_lowercase();
        if !email.is_empty() {
            suppressed.insert(email);
        }
    }

    info!("[SUPPRESSION] {} email addresses loaded.", suppressed.len());
    Ok(suppressed)
}

pub fn append_suppression(path: &Path, email: &str) -> Result<()> {
    let row = SuppressionRow {
        email: email.trim().to_lowercase(),
    };
    append_csv_row(path, &row)
}

/// Companies with at least one `SENT` record, lowercased.
///
/// Keeps colleagues at the same company from getting a second cold mail.
pub fn load_contacted_companies(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open send log {}", path.display()))?;

    let mut companies = HashSet::new();
    for record in reader.deserialize::<SendLogRecord>() {
        let record = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        if record.status.trim() != STATUS_SENT {
            continue;
        }
        let company = record.company.trim().to_lowercase();
        if !company.is_empty() {
            companies.insert(company);
        }
    }

    info!("[COMPANIES] {} companies contacted before.", companies.len());
    Ok(companies)
}

/// Append one record, stamping the current local time when none is set.
pub fn append_send_log(path: &Path, mut record: SendLogRecord) -> Result<()> {
    if record.timestamp.is_empty() {
        record.timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    }
    append_csv_row(path, &record)
}

/// Record one send attempt.
///
/// Trims the record, lowercases the email and appends it to the send log.
/// A `SENT` record also adds the address to the suppression list. Returns
/// whether the address was suppressed.
pub fn record_send(send_log: &Path, suppression: &Path, mut record: SendLogRecord) -> Result<bool> {
    record.email = record.email.trim().to_lowercase();
    record.company = record.company.trim().to_string();
    record.status = record.status.trim().to_string();

    let sent = record.status == STATUS_SENT;
    let email = record.email.clone();
    append_send_log(send_log, record)?;
    if sent && !email.is_empty() {
        append_suppression(suppression, &email)?;
    }
    Ok(sent && !email.is_empty())
}

/// Append a row, writing the header first when the file is new or empty.
/// All fields are quoted so bodies with newlines and commas survive.
fn append_csv_row<T: Serialize>(path: &Path, row: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let write_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(write_header)
        .quote_style(QuoteStyle::Always)
        .from_writer(file);
    writer
        .serialize(row)
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_are_empty_sets() {
        let dir = TempDir::new().unwrap();
        assert!(load_suppression(&dir.path().join("none.csv")).unwrap().is_empty());
        assert!(
            load_contacted_companies(&dir.path().join("none.csv"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_suppression_round_trip_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output").join("suppression.csv");
        append_suppression(&path, " Jan@Zeta.NL ").unwrap();
        append_suppression(&path, "piet@acme.nl").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("\"email\"").count(), 1);

        let suppressed = load_suppression(&path).unwrap();
        assert!(suppressed.contains("jan@zeta.nl"));
        assert!(suppressed.contains("piet@acme.nl"));
    }

    #[test]
    fn test_only_sent_records_count_as_contacted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("send_log.csv");
        append_send_log(
            &path,
            SendLogRecord {
                email: "a@acme.nl".to_string(),
                company: "Acme ".to_string(),
                status: STATUS_SENT.to_string(),
                body: "Beste Jan,\n\nGroet, Piet".to_string(),
                ..SendLogRecord::default()
            },
        )
        .unwrap();
        append_send_log(
            &path,
            SendLogRecord {
                email: "b@zeta.nl".to_string(),
                company: "Zeta".to_string(),
                status: "DRY RUN".to_string(),
                ..SendLogRecord::default()
            },
        )
        .unwrap();

        let companies = load_contacted_companies(&path).unwrap();
        assert_eq!(companies.len(), 1);
        assert!(companies.contains("acme"));
    }

    #[test]
    fn test_send_log_stamps_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("send_log.csv");
        append_send_log(&path, SendLogRecord::default()).unwrap();

        let mut reader = ReaderBuilder::new().from_path(&path).unwrap();
        let record: SendLogRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.timestamp.len(), "2026-01-01 00:00:00".len());
    }

    #[test]
    fn test_contacted_companies_tolerates_partial_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("send_log.csv");
        fs::write(&path, "company,status\nOmega Zorg,SENT\nAcme,ERROR\n").unwrap();

        let companies = load_contacted_companies(&path).unwrap();
        assert_eq!(companies.into_iter().collect::<Vec<_>>(), vec!["omega zorg"]);
    }

    #[test]
    fn test_record_sent_suppresses_address() {
        let dir = TempDir::new().unwrap();
        let send_log = dir.path().join("send_log.csv");
        let suppression = dir.path().join("suppression.csv");

        let suppressed = record_send(
            &send_log,
            &suppression,
            SendLogRecord {
                email: " Jan@Acme.NL ".to_string(),
                company: " Acme ".to_string(),
                status: "SENT ".to_string(),
                ..SendLogRecord::default()
            },
        )
        .unwrap();

        assert!(suppressed);
        assert!(load_suppression(&suppression).unwrap().contains("jan@acme.nl"));
        assert!(load_contacted_companies(&send_log).unwrap().contains("acme"));

        let mut reader = ReaderBuilder::new().from_path(&send_log).unwrap();
        let record: SendLogRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.email, "jan@acme.nl");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.status, STATUS_SENT);
        assert!(!record.timestamp.is_empty());
    }

    #[test]
    fn test_record_not_sent_only_logs() {
        let dir = TempDir::new().unwrap();
        let send_log = dir.path().join("send_log.csv");
        let suppression = dir.path().join("suppression.csv");

        let suppressed = record_send(
            &send_log,
            &suppression,
            SendLogRecord {
                email: "piet@zeta.nl".to_string(),
                company: "Zeta".to_string(),
                status: "ERROR".to_string(),
                error: "mailbox full".to_string(),
                ..SendLogRecord::default()
            },
        )
        .unwrap();

        assert!(!suppressed);
        assert!(!suppression.exists());
        assert!(load_contacted_companies(&send_log).unwrap().is_empty());

        let mut reader = ReaderBuilder::new().from_path(&send_log).unwrap();
        let record: SendLogRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.status, "ERROR");
        assert_eq!(record.error, "mailbox full");
    }
}
