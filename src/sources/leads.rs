//! Lead records from a CSV export or a workbook.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::gate::Lead;
use crate::sources::table::{SheetSelector, Table, read_table};

pub const COMPANY_COLUMN: &str = "Company";
pub const EMAIL_COLUMN: &str = "Email";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("Invalid regex pattern")
});

/// First email address found in a cell, lowercased.
///
/// Cells sometimes hold several addresses or surrounding text.
pub fn extract_primary_email(value: &str) -> Option<String> {
    EMAIL_PATTERN
        .find(value)
        .map(|m| m.as_str().trim().to_lowercase())
}

/// Load leads from the first sheet (or the CSV file).
///
/// Missing `Company`/`Email` columns are treated as empty. Rows without
/// a usable address are kept with an empty email so they show up in reports.
pub fn load_leads(path: &Path) -> Result<Vec<Lead>> {
    if !path.exists() {
        bail!("Leads file not found: {}", path.display());
    }
    let table = read_table(path, SheetSelector::First)
        .with_context(|| format!("Failed to read leads {}", path.display()))?;

    let company_col = table.column(COMPANY_COLUMN);
    let email_col = table.column(EMAIL_COLUMN);
    if company_col.is_none() {
        warn!("No '{}' column in {}", COMPANY_COLUMN, path.display());
    }
    if email_col.is_none() {
        warn!("No '{}' column in {}", EMAIL_COLUMN, path.display());
    }

    let leads: Vec<Lead> = table
        .rows
        .iter()
        .map(|row| {
            let text = |col: Option<usize>| {
                col.and_then(|index| Table::cell(row, index).as_text())
                    .unwrap_or_default()
            };
            let company = text(company_col);
            let email = extract_primary_email(&text(email_col)).unwrap_or_default();
            Lead { company, email }
        })
        .filter(|lead| !lead.company.is_empty() || !lead.email.is_empty())
        .collect();

    let without_email = leads.iter().filter(|lead| lead.email.is_empty()).count();
    info!(
        "[LEADS] {} leads loaded ({} without a valid email).",
        leads.len(),
        without_email
    );
    Ok(leads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_primary_email() {
        assert_eq!(
            extract_primary_email("Jan@Acme.NL; info@acme.nl"),
            Some("jan@acme.nl".to_string())
        );
        assert_eq!(
            extract_primary_email("mail: p.de-vries+sales@zeta-bouw.co.uk"),
            Some("p.de-vries+sales@zeta-bouw.co.uk".to_string())
        );
        assert_eq!(extract_primary_email("geen email"), None);
        assert_eq!(extract_primary_email("a@b"), None);
    }

    #[test]
    fn test_load_leads_from_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        fs::write(
            &path,
            "First Name,Company,Email\n\
             Jan,Acme B.V.,JAN@ACME.NL\n\
             Piet,Zeta Bouw,onbekend\n\
             ,,\n",
        )
        .unwrap();

        let leads = load_leads(&path).unwrap();
        assert_eq!(
            leads,
            vec![
                Lead::new("Acme B.V.", "jan@acme.nl"),
                Lead::new("Zeta Bouw", ""),
            ]
        );
    }

    #[test]
    fn test_missing_leads_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_leads(&dir.path().join("leads.csv")).is_err());
    }
}
