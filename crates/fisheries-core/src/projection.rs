//! Normalized projection for downstream consumers.
//!
//! Report and dashboard generators read the most recently exported
//! artifacts and expect one fixed shape regardless of dataset kind:
//! `type, year, county, island, species_group, ecosystem_type,
//! exchange_value`, with commercial rows carrying an empty `island` since
//! they have no island dimension. Rendering those reports is out of scope
//! here; this module only supplies the typed rows.

use std::path::Path;

use serde::{Serialize, Serializer};
use tracing::debug;

use fisheries_ingest::{
    Result, find_latest_cleaned, parse_f64, parse_year, read_csv_table,
};
use fisheries_model::DatasetKind;

/// One row of the fixed projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "type", serialize_with = "serialize_kind")]
    pub kind: DatasetKind,
    pub year: i64,
    pub county: String,
    /// Empty for commercial rows.
    pub island: String,
    pub species_group: String,
    pub ecosystem_type: String,
    pub exchange_value: f64,
}

fn serialize_kind<S>(kind: &DatasetKind, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(kind.data_type())
}

/// Loads one cleaned artifact into the normalized shape.
///
/// Rows whose year or exchange value fail to parse are skipped: the
/// projection exists for aggregation, and a row without both numbers has
/// nothing to contribute.
pub fn load_normalized(path: &Path, kind: DatasetKind) -> Result<Vec<NormalizedRecord>> {
    let table = read_csv_table(path)?;
    let year_column = table.column_index("year");
    let value_column = table.column_index("exchange_value");
    let county_column = table.column_index("county");
    let island_column = table.column_index("island");
    let species_column = table.column_index("species_group");
    let ecosystem_column = table.column_index("ecosystem_type");

    let text = |row: &[String], column: Option<usize>| {
        column
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    };

    let mut records = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for row in &table.rows {
        let year = year_column
            .and_then(|idx| row.get(idx))
            .and_then(|cell| parse_year(cell));
        let value = value_column
            .and_then(|idx| row.get(idx))
            .and_then(|cell| parse_f64(cell));
        let (Some(year), Some(exchange_value)) = (year, value) else {
            skipped += 1;
            continue;
        };
        records.push(NormalizedRecord {
            kind,
            year,
            county: text(row, county_column),
            island: text(row, island_column),
            species_group: text(row, species_column),
            ecosystem_type: text(row, ecosystem_column),
            exchange_value,
        });
    }
    if skipped > 0 {
        debug!(path = %path.display(), skipped, "skipped rows without usable numbers");
    }
    Ok(records)
}

/// Loads the latest cleaned artifact of each kind from `dir`.
///
/// A kind with no artifact yet contributes nothing; the order is
/// commercial rows first, then non-commercial.
pub fn load_latest(dir: &Path) -> Result<Vec<NormalizedRecord>> {
    let mut records = Vec::new();
    for kind in DatasetKind::all() {
        if let Some(path) = find_latest_cleaned(dir, kind.file_stem())? {
            records.extend(load_normalized(&path, kind)?);
        }
    }
    Ok(records)
}
