//! Summary payloads exported after cleaning.
//!
//! These are read-only snapshots: a [`CleaningSummary`] is derived once per
//! dataset after export, and a [`CombinedSummary`] merges the two when the
//! orchestrator finishes. A failed sub-pipeline appears as `null` in the
//! combined payload, never as zero-filled numbers, so consumers can
//! distinguish "zero value" from "failed to produce".

use std::collections::BTreeMap;

use serde::Serialize;

use crate::issue::QualityIssue;

/// Inclusive min/max of the years actually present in a cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub min_year: i64,
    pub max_year: i64,
}

impl DateRange {
    /// Smallest range covering both inputs.
    pub fn merge(a: Option<DateRange>, b: Option<DateRange>) -> Option<DateRange> {
        match (a, b) {
            (Some(a), Some(b)) => Some(DateRange {
                min_year: a.min_year.min(b.min_year),
                max_year: a.max_year.max(b.max_year),
            }),
            (Some(range), None) | (None, Some(range)) => Some(range),
            (None, None) => None,
        }
    }
}

/// Where the removed rows went, by stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemovalBreakdown {
    /// Rows dropped because `exchange_value` was null after coercion.
    pub null_exchange_values: usize,
    /// Rollup rows dropped by the aggregate filter (zero when disabled).
    pub aggregate_rows: usize,
}

impl RemovalBreakdown {
    pub fn total(self) -> usize {
        self.null_exchange_values + self.aggregate_rows
    }
}

/// Audit snapshot of one cleaned dataset.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningSummary {
    /// `commercial` or `non_commercial`.
    pub data_type: String,
    /// RFC 3339 timestamp of summary generation.
    pub processing_timestamp: String,
    pub raw_row_count: usize,
    pub cleaned_row_count: usize,
    pub rows_removed: usize,
    pub removal_breakdown: RemovalBreakdown,
    /// None when no row retained a parseable year.
    pub date_range: Option<DateRange>,
    pub total_exchange_value: f64,
    /// Commercial only: distinct DAR reporting areas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_area_ids: Option<Vec<String>>,
    /// Non-commercial only: distinct islands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_islands: Option<Vec<String>>,
    pub unique_counties: Vec<String>,
    pub unique_species_groups: Vec<String>,
    pub unique_ecosystem_types: Vec<String>,
    pub records_by_year: BTreeMap<i64, usize>,
    pub records_by_county: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_by_island: Option<BTreeMap<String, usize>>,
    pub total_value_by_year: BTreeMap<i64, f64>,
    /// Advisory findings accumulated across the validation stages.
    pub issues: Vec<QualityIssue>,
}

/// Totals across both datasets; only produced when both succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct OverallTotals {
    pub total_records: usize,
    pub total_exchange_value: f64,
    pub combined_date_range: Option<DateRange>,
}

/// The orchestrator's merged report over both sub-pipelines.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedSummary {
    /// RFC 3339 timestamp of the pipeline run.
    pub pipeline_timestamp: String,
    /// Null when the commercial sub-pipeline failed.
    pub commercial: Option<CleaningSummary>,
    /// Null when the non-commercial sub-pipeline failed.
    pub non_commercial: Option<CleaningSummary>,
    /// Absent unless both sub-pipelines succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<OverallTotals>,
}

impl CombinedSummary {
    /// Merge two per-dataset outcomes.
    ///
    /// `overall` is computed only when both summaries are present;
    /// otherwise the field is omitted entirely so callers never mistake a
    /// failed feed for an empty one.
    pub fn merge(
        pipeline_timestamp: String,
        commercial: Option<CleaningSummary>,
        non_commercial: Option<CleaningSummary>,
    ) -> Self {
        let overall = match (&commercial, &non_commercial) {
            (Some(comm), Some(noncomm)) => Some(OverallTotals {
                total_records: comm.cleaned_row_count + noncomm.cleaned_row_count,
                total_exchange_value: comm.total_exchange_value + noncomm.total_exchange_value,
                combined_date_range: DateRange::merge(comm.date_range, noncomm.date_range),
            }),
            _ => None,
        };
        Self {
            pipeline_timestamp,
            commercial,
            non_commercial,
            overall,
        }
    }
}
