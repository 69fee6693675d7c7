//! Do-Not-Contact registry source.
//!
//! The registry is a hard precondition: without it nothing may be sent, so
//! every failure here is fatal to the caller.

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::config::MatchConfig;
use crate::matching::{SuppressionRegistry, extract_variants_with_min_length, normalize_company};
use crate::sources::table::{SheetSelector, is_csv, read_table};

/// Sheet holding the registry in a workbook.
pub const DNC_SHEET: &str = "Niet Benaderen";

/// Column holding company names.
pub const DNC_COLUMN: &str = "Bedrijf";

/// Read the raw company names from a DNC file.
///
/// CSV files use the `Bedrijf` column when present, else the first column.
/// Workbooks must have a `Niet Benaderen` sheet with a `Bedrijf` column.
pub fn load_dnc_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        bail!(
            "DNC registry missing: {}\nSet DNC_PATH (or --dnc) to the 'Niet Benaderen' file.",
            path.display()
        );
    }

    let sheet = if is_csv(path) {
        SheetSelector::First
    } else {
        SheetSelector::Named(DNC_SHEET)
    };
    let table = read_table(path, sheet)
        .with_context(|| format!("Failed to read DNC registry {}", path.display()))?;

    let column = match table.column(DNC_COLUMN) {
        Some(index) => index,
        None if is_csv(path) && !table.headers.is_empty() => 0,
        None => {
            return Err(anyhow!(
                "Column '{}' not found in {}. Found columns: {:?}",
                DNC_COLUMN,
                path.display(),
                table.headers
            ));
        }
    };

    Ok(table
        .rows
        .iter()
        .filter_map(|row| row.get(column).and_then(|cell| cell.as_text()))
        .collect())
}

/// Load the DNC registry and expand every name to its variants.
///
/// Fails when the file is missing, unreadable, lacks the expected column, or
/// yields no variants at all.
pub fn load_do_not_contact(path: &Path, config: &MatchConfig) -> Result<SuppressionRegistry> {
    let names = load_dnc_names(path)?;
    let registry = SuppressionRegistry::from_names(&names, config);

    if registry.is_empty() {
        bail!(
            "DNC registry {} contains no usable company names; refusing to continue",
            path.display()
        );
    }

    info!(
        "[DNC] {} companies loaded -> {} normalized variants.",
        names.len(),
        registry.len()
    );
    Ok(registry)
}

/// One line of the variant export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRow {
    #[serde(rename = "Originele naam")]
    pub original: String,
    #[serde(rename = "Genormaliseerd (hoofd)")]
    pub normalized: String,
    #[serde(rename = "Alle varianten")]
    pub variants: String,
    #[serde(rename = "Aantal varianten")]
    pub variant_count: usize,
}

/// Show how each registry name is normalized and split.
pub fn dnc_variant_rows(names: &[String], config: &MatchConfig) -> Vec<VariantRow> {
    names
        .iter()
        .map(|raw| {
            let raw = raw.trim();
            let variants = extract_variants_with_min_length(raw, config.min_variant_length);
            VariantRow {
                original: raw.to_string(),
                normalized: normalize_company(raw),
                variants: variants.iter().cloned().collect::<Vec<_>>().join(" | "),
                variant_count: variants.len(),
            }
        })
        .collect()
}

pub fn write_variant_rows(path: &Path, rows: &[VariantRow]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
