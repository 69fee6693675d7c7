//! Contact-history source ("laatste contactmomenten").
//!
//! Workbook layout: company in column C, date in column F, contact type in
//! column K, header on the first row. CSV exports use the header names.

use anyhow::{Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::path::Path;

use crate::cooldown::{ContactEvent, ContactHistory};
use crate::sources::table::{Cell, SheetSelector, Table, is_csv, read_table};

const COL_COMPANY: usize = 2;
const COL_DATE: usize = 5;
const COL_TYPE: usize = 10;

/// Text date formats, tried in order. Dutch day-first wins over US month-first.
pub const TEXT_DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%m-%d-%Y", "%d/%m/%Y", "%m/%d/%Y", "%Y-%m-%d"];

/// Load the contact history, repairing swapped dates relative to `now`.
///
/// Rows without company, date or type, or with an unreadable date, are
/// skipped and counted.
pub fn load_recent_contacts(path: &Path, now: NaiveDateTime) -> Result<ContactHistory> {
    if !path.exists() {
        bail!(
            "Contact history not found: {}\nCheck RECENT_CONTACTS_PATH.",
            path.display()
        );
    }

    let table = read_table(path, SheetSelector::First)?;
    let (company_col, date_col, type_col) = if is_csv(path) {
        csv_columns(&table, path)?
    } else {
        (COL_COMPANY, COL_DATE, COL_TYPE)
    };

    let mut history = ContactHistory::new();
    let mut skipped = 0;

    for row in &table.rows {
        let company = Table::cell(row, company_col).as_text();
        let date = parse_date_cell(Table::cell(row, date_col));
        let type_label = Table::cell(row, type_col).as_text();

        match (company, date, type_label) {
            (Some(company), Some(date), Some(type_label)) => {
                if !history.add(&company, ContactEvent::new(date, type_label)) {
                    skipped += 1;
                }
            }
            _ => skipped += 1,
        }
    }

    let repaired = history.repair_dates(now);

    if skipped > 0 {
        info!("[RECENT_CONTACTS] {} rows skipped (empty or invalid).", skipped);
    }
    if repaired > 0 {
        info!("[RECENT_CONTACTS] {} day/month-swapped dates repaired.", repaired);
    }
    info!(
        "[RECENT_CONTACTS] {} contact moments for {} companies loaded.",
        history.event_count(),
        history.len()
    );
    Ok(history)
}

/// Load the history when the path is configured and present.
///
/// A missing file only disables the cooldown check.
pub fn load_optional_recent_contacts(
    path: Option<&Path>,
    now: NaiveDateTime,
) -> Result<Option<ContactHistory>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        warn!(
            "Contact history {} not found; cooldown checks are skipped.",
            path.display()
        );
        return Ok(None);
    }
    load_recent_contacts(path, now).map(Some)
}

fn csv_columns(table: &Table, path: &Path) -> Result<(usize, usize, usize)> {
    let company = table.column("Bedrijf");
    let date = table.column("Datum");
    let type_label = table.column_with_prefix("Type");
    match (company, date, type_label) {
        (Some(c), Some(d), Some(t)) => Ok((c, d, t)),
        _ => Err(anyhow!(
            "Contact history {} needs columns 'Bedrijf', 'Datum' and 'Type'. Found columns: {:?}",
            path.display(),
            table.headers
        )),
    }
}

fn parse_date_cell(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Text(text) => parse_text_date(text),
        Cell::Empty | Cell::Number(_) => None,
    }
}

/// Parse a date typed as text, trying [`TEXT_DATE_FORMATS`] in order.
pub fn parse_text_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
