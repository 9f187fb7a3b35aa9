//! Summary derivation over a cleaned dataset.

use std::collections::BTreeMap;

use chrono::Local;

use fisheries_model::{
    CleaningSummary, DateRange, QualityIssue, RegionDimension, RemovalBreakdown, SchemaContract,
};

use crate::dataset::Dataset;

/// Derives the audit snapshot for one cleaned dataset.
///
/// A read-only derivation: one pass over the table collects totals, the
/// observed year range, distinct categorical values, and the per-year and
/// per-region breakdowns. Rows whose year is null are counted in the row
/// totals but excluded from the per-year maps, since they have no year to
/// group under.
pub fn build_summary(
    contract: &SchemaContract,
    dataset: &Dataset,
    removals: RemovalBreakdown,
    issues: &[QualityIssue],
) -> CleaningSummary {
    let county_column = dataset.column_index("county");
    let island_column = match &contract.region {
        RegionDimension::Island { .. } => dataset.column_index("island"),
        RegionDimension::AreaId => None,
    };

    let mut total_exchange_value = 0.0f64;
    let mut date_range: Option<DateRange> = None;
    let mut records_by_year: BTreeMap<i64, usize> = BTreeMap::new();
    let mut total_value_by_year: BTreeMap<i64, f64> = BTreeMap::new();
    let mut records_by_county: BTreeMap<String, usize> = BTreeMap::new();
    let mut records_by_island: BTreeMap<String, usize> = BTreeMap::new();

    for row in 0..dataset.len() {
        let value = dataset.exchange_value(row);
        if let Some(value) = value {
            total_exchange_value += value;
        }
        if let Some(year) = dataset.year(row) {
            date_range = Some(match date_range {
                Some(range) => DateRange {
                    min_year: range.min_year.min(year),
                    max_year: range.max_year.max(year),
                },
                None => DateRange {
                    min_year: year,
                    max_year: year,
                },
            });
            *records_by_year.entry(year).or_insert(0) += 1;
            *total_value_by_year.entry(year).or_insert(0.0) += value.unwrap_or(0.0);
        }
        if let Some(column) = county_column {
            let county = dataset.cell(row, column);
            if !county.is_empty() {
                *records_by_county.entry(county.to_string()).or_insert(0) += 1;
            }
        }
        if let Some(column) = island_column {
            let island = dataset.cell(row, column);
            if !island.is_empty() {
                *records_by_island.entry(island.to_string()).or_insert(0) += 1;
            }
        }
    }

    let (unique_area_ids, unique_islands, records_by_island) = match &contract.region {
        RegionDimension::AreaId => (Some(dataset.unique_values("area_id")), None, None),
        RegionDimension::Island { .. } => (
            None,
            Some(dataset.unique_values("island")),
            Some(records_by_island),
        ),
    };

    let cleaned_row_count = dataset.cleaned_row_count().unwrap_or_else(|| dataset.len());

    CleaningSummary {
        data_type: contract.kind.data_type().to_string(),
        processing_timestamp: Local::now().to_rfc3339(),
        raw_row_count: dataset.raw_row_count(),
        cleaned_row_count,
        rows_removed: dataset.raw_row_count() - cleaned_row_count,
        removal_breakdown: removals,
        date_range,
        total_exchange_value,
        unique_area_ids,
        unique_islands,
        unique_counties: dataset.unique_values("county"),
        unique_species_groups: dataset.unique_values("species_group"),
        unique_ecosystem_types: dataset.unique_values("ecosystem_type"),
        records_by_year,
        records_by_county,
        records_by_island,
        total_value_by_year,
        issues: issues.to_vec(),
    }
}
