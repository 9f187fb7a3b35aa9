//! The dataset cleaning state machine.
//!
//! Stages run in a mandatory order; later stages assume earlier ones ran.
//! Only the structural stages (load, schema) and export can fail — every
//! content check is advisory and accumulates [`QualityIssue`]s instead of
//! halting. Each stage method is public so tests can drive the machine one
//! step at a time; [`DatasetCleaner::run`] drives the full order.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, error, info, info_span, warn};

use fisheries_ingest::{find_source_file, parse_f64, parse_year, read_csv_table, write_csv_table};
use fisheries_model::{
    CleaningSummary, QualityIssue, RegionDimension, RemovalBreakdown, SchemaContract,
};

use crate::dataset::Dataset;
use crate::error::CleaningError;
use crate::summary::build_summary;

/// Policy switches passed uniformly to both cleaners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanerOptions {
    /// Drop rollup rows ("All Ecosystems", and "All Species" where the
    /// contract defines a species aggregate). On by default: rollups
    /// double-count when per-category totals are summed downstream.
    pub remove_aggregates: bool,
    /// Drop presentation-only columns. Off by default: dropping them is a
    /// storage optimization, not a correctness requirement.
    pub remove_display: bool,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            remove_aggregates: true,
            remove_display: false,
        }
    }
}

/// Null counts per coerced column, measured after coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionCounts {
    pub null_years: usize,
    pub null_exchange_values: usize,
}

/// What a successful run produces.
#[derive(Debug, Clone)]
pub struct CleanerOutcome {
    pub output_file: PathBuf,
    pub summary: CleaningSummary,
}

/// Cleans one dataset against one immutable schema contract.
///
/// A cleaner is built for a single run: it accumulates the advisory issue
/// list and per-stage removal counts for that run's summary. The
/// orchestrator constructs a fresh cleaner per dataset per run.
#[derive(Debug)]
pub struct DatasetCleaner {
    contract: SchemaContract,
    input_dir: PathBuf,
    output_dir: PathBuf,
    issues: Vec<QualityIssue>,
    removals: RemovalBreakdown,
}

impl DatasetCleaner {
    pub fn new(
        contract: SchemaContract,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            contract,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            issues: Vec::new(),
            removals: RemovalBreakdown::default(),
        }
    }

    pub fn contract(&self) -> &SchemaContract {
        &self.contract
    }

    /// Advisory findings accumulated so far.
    pub fn issues(&self) -> &[QualityIssue] {
        &self.issues
    }

    /// Stage 1: locate and parse the single source file.
    pub fn load(&self) -> Result<Dataset, CleaningError> {
        let kind = self.contract.kind;
        let patterns = &self.contract.file_patterns;
        let path = find_source_file(&self.input_dir, &patterns.primary, &patterns.fallback)
            .map_err(|source| CleaningError::Load { kind, source })?;
        let table =
            read_csv_table(&path).map_err(|source| CleaningError::Load { kind, source })?;
        let dataset = Dataset::new(kind, table);
        info!(
            source_file = %path.display(),
            row_count = dataset.raw_row_count(),
            "loaded source data"
        );
        Ok(dataset)
    }

    /// Stage 2: every required column must be present.
    ///
    /// Present display columns are logged for transparency but never
    /// required.
    pub fn validate_schema(&self, dataset: &Dataset) -> Result<(), CleaningError> {
        let missing: Vec<String> = self
            .contract
            .required_columns
            .iter()
            .filter(|column| !dataset.has_column(column))
            .cloned()
            .collect();
        if !missing.is_empty() {
            error!(missing = ?missing, "missing required columns");
            return Err(CleaningError::Schema {
                kind: self.contract.kind,
                missing,
            });
        }

        let present_display: Vec<&String> = self
            .contract
            .display_columns
            .iter()
            .filter(|column| dataset.has_column(column))
            .collect();
        if !present_display.is_empty() {
            info!(columns = ?present_display, "optional display columns present");
        }
        debug!("schema validation passed");
        Ok(())
    }

    /// Stage 3: permissive type coercion.
    ///
    /// `year` and `exchange_value` cells are coerced in place: parseable
    /// cells are canonicalized (years rewritten as integer text), anything
    /// else becomes the empty marker. Bad cells surface as nulls, never as
    /// errors. Idempotent: a second pass changes nothing and reports the
    /// same counts.
    pub fn validate_data_types(&mut self, dataset: &mut Dataset) -> CoercionCounts {
        let mut counts = CoercionCounts::default();

        if let Some(column) = dataset.column_index("year") {
            counts.null_years = coerce_column(dataset, column, |cell| {
                parse_year(cell).map(|year| year.to_string())
            });
        }
        if let Some(column) = dataset.column_index("exchange_value") {
            counts.null_exchange_values = coerce_column(dataset, column, |cell| {
                parse_f64(cell).map(|_| cell.trim().to_string())
            });
        }

        if counts.null_years > 0 {
            warn!(count = counts.null_years, "null years after coercion");
            self.issues.push(QualityIssue::NullAfterCoercion {
                column: "year".to_string(),
                count: counts.null_years,
            });
        }
        if counts.null_exchange_values > 0 {
            warn!(
                count = counts.null_exchange_values,
                "null exchange values after coercion"
            );
            self.issues.push(QualityIssue::NullAfterCoercion {
                column: "exchange_value".to_string(),
                count: counts.null_exchange_values,
            });
        }
        counts
    }

    /// Stage 4: range checks.
    ///
    /// Detects negative exchange values and years outside the contract's
    /// bounds. Non-destructive by design: the output is an issue list for
    /// audit, never a filter.
    pub fn validate_ranges(&mut self, dataset: &Dataset) {
        let mut negative = 0usize;
        let mut out_of_range = std::collections::BTreeSet::new();
        let bounds = self.contract.valid_years;

        for row in 0..dataset.len() {
            if let Some(value) = dataset.exchange_value(row)
                && value < 0.0
            {
                negative += 1;
            }
            if let Some(year) = dataset.year(row)
                && !bounds.contains(year)
            {
                out_of_range.insert(year);
            }
        }

        if negative > 0 {
            let issue = QualityIssue::NegativeExchangeValues { count: negative };
            warn!(%issue, "data quality issue");
            self.issues.push(issue);
        }
        if !out_of_range.is_empty() {
            let issue = QualityIssue::YearsOutOfRange {
                min_year: bounds.min,
                max_year: bounds.max,
                observed: out_of_range.into_iter().collect(),
            };
            warn!(%issue, "data quality issue");
            self.issues.push(issue);
        }
    }

    /// Stage 5: vocabulary checks for every categorical dimension.
    ///
    /// Unexpected values are flagged so upstream drift is visible before
    /// aggregation consumes bad categories silently. Never fatal, never
    /// filters rows. The `area_id` dimension is an identifier without a
    /// vocabulary; only its distinct count is logged.
    pub fn validate_categoricals(&mut self, dataset: &Dataset) {
        let checks: [(&str, &[String]); 3] = [
            ("species_group", &self.contract.expected_species_groups),
            ("ecosystem_type", &self.contract.expected_ecosystem_types),
            ("county", &self.contract.expected_counties),
        ];
        let mut found = Vec::new();
        for (column, expected) in checks {
            if let Some(issue) = unexpected_categories(dataset, column, expected) {
                found.push(issue);
            }
        }
        match &self.contract.region {
            RegionDimension::Island { expected } => {
                if let Some(issue) = unexpected_categories(dataset, "island", expected) {
                    found.push(issue);
                }
            }
            RegionDimension::AreaId => {
                debug!(
                    distinct_areas = dataset.unique_values("area_id").len(),
                    "area identifiers counted"
                );
            }
        }

        for issue in found {
            warn!(%issue, "data quality issue");
            self.issues.push(issue);
        }
    }

    /// Stage 6: unconditionally drop rows whose exchange value is null.
    ///
    /// A null cannot be summed or charted; keeping it would silently bias
    /// totals downward.
    pub fn remove_null_exchange_values(&mut self, dataset: &mut Dataset) -> usize {
        let Some(column) = dataset.column_index("exchange_value") else {
            return 0;
        };
        let removed = dataset.retain_rows(|row| {
            row.get(column).is_some_and(|cell| parse_f64(cell).is_some())
        });
        self.removals.null_exchange_values += removed;
        if removed > 0 {
            info!(removed, "removed rows with null exchange values");
        } else {
            debug!("no null exchange values to remove");
        }
        removed
    }

    /// Stage 7: drop rollup rows, unless the caller wants them preserved
    /// (e.g. to reconcile per-category sums against the rollup).
    pub fn remove_aggregate_rows(&mut self, dataset: &mut Dataset, remove_aggregates: bool) -> usize {
        if !remove_aggregates {
            info!("keeping aggregate rows");
            return 0;
        }

        let ecosystem = dataset.column_index("ecosystem_type");
        let species = dataset.column_index("species_group");
        let contract = &self.contract;
        let removed = dataset.retain_rows(|row| {
            let is_ecosystem_rollup = ecosystem
                .and_then(|idx| row.get(idx))
                .is_some_and(|value| contract.is_aggregate_ecosystem(value));
            let is_species_rollup = species
                .and_then(|idx| row.get(idx))
                .is_some_and(|value| contract.is_aggregate_species(value));
            !(is_ecosystem_rollup || is_species_rollup)
        });
        self.removals.aggregate_rows += removed;
        if removed > 0 {
            info!(removed, "removed aggregate rows");
        } else {
            debug!("no aggregate rows to remove");
        }
        removed
    }

    /// Stage 8: drop presentation-only columns when asked to.
    pub fn remove_display_columns(&self, dataset: &mut Dataset, remove_display: bool) -> Vec<String> {
        if !remove_display {
            debug!("keeping display columns");
            return Vec::new();
        }
        let removed = dataset.drop_columns(&self.contract.display_columns);
        if removed.is_empty() {
            debug!("no display columns to remove");
        } else {
            info!(columns = ?removed, "removed display columns");
        }
        removed
    }

    /// Stage 9: write the cleaned table to a date-stamped file.
    ///
    /// One file per run; rerunning on the same day overwrites the
    /// same-named file. The dataset becomes immutable here.
    pub fn export(&self, dataset: &mut Dataset) -> Result<PathBuf, CleaningError> {
        let kind = self.contract.kind;
        std::fs::create_dir_all(&self.output_dir).map_err(|source| CleaningError::Export {
            kind,
            source: fisheries_ingest::IngestError::CreateDir {
                path: self.output_dir.clone(),
                source,
            },
        })?;

        let date = Local::now().format("%Y%m%d");
        let output_file = self
            .output_dir
            .join(format!("cleaned_{}_{date}.csv", kind.file_stem()));
        write_csv_table(&output_file, dataset.table())
            .map_err(|source| CleaningError::Export { kind, source })?;
        dataset.mark_exported();
        info!(
            output_file = %output_file.display(),
            row_count = dataset.len(),
            "exported cleaned data"
        );
        Ok(output_file)
    }

    /// Stage 10: derive the audit snapshot over the cleaned table.
    pub fn summarize(&self, dataset: &Dataset) -> CleaningSummary {
        build_summary(&self.contract, dataset, self.removals, &self.issues)
    }

    /// Runs the full stage order and returns the export path and summary.
    pub fn run(&mut self, options: CleanerOptions) -> Result<CleanerOutcome, CleaningError> {
        let span = info_span!("clean", kind = %self.contract.kind);
        let _guard = span.enter();
        let start = Instant::now();
        info!(
            input_dir = %self.input_dir.display(),
            output_dir = %self.output_dir.display(),
            remove_aggregates = options.remove_aggregates,
            remove_display = options.remove_display,
            "cleaning started"
        );

        let mut dataset = self.load()?;
        self.validate_schema(&dataset)?;
        self.validate_data_types(&mut dataset);
        self.validate_ranges(&dataset);
        self.validate_categoricals(&dataset);
        self.remove_null_exchange_values(&mut dataset);
        self.remove_aggregate_rows(&mut dataset, options.remove_aggregates);
        self.remove_display_columns(&mut dataset, options.remove_display);
        let output_file = self.export(&mut dataset)?;
        let summary = self.summarize(&dataset);

        info!(
            raw_rows = dataset.raw_row_count(),
            cleaned_rows = dataset.len(),
            removed = dataset.raw_row_count() - dataset.len(),
            issue_count = self.issues.len(),
            duration_ms = start.elapsed().as_millis(),
            "cleaning complete"
        );
        Ok(CleanerOutcome {
            output_file,
            summary,
        })
    }
}

/// Coerces every cell of one column in place.
///
/// `canonical` returns the canonical text for a parseable cell; anything
/// else becomes the empty marker. Returns the number of cells that are
/// null after coercion (pre-existing empties included, which is what keeps
/// repeated passes reporting identical counts).
fn coerce_column<F>(dataset: &mut Dataset, column: usize, canonical: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let mut nulls = 0usize;
    for row in 0..dataset.len() {
        let cell = dataset.cell(row, column);
        match canonical(cell) {
            Some(text) => {
                if text != cell {
                    dataset.set_cell(row, column, text);
                }
            }
            None => {
                nulls += 1;
                if !cell.is_empty() {
                    dataset.set_cell(row, column, String::new());
                }
            }
        }
    }
    nulls
}

/// Distinct non-empty values of `column` not covered by `expected`.
fn unexpected_categories(
    dataset: &Dataset,
    column: &str,
    expected: &[String],
) -> Option<QualityIssue> {
    let unexpected: Vec<String> = dataset
        .unique_values(column)
        .into_iter()
        .filter(|value| !expected.contains(value))
        .collect();
    if unexpected.is_empty() {
        debug!(column, "all values match the expected vocabulary");
        None
    } else {
        Some(QualityIssue::UnexpectedCategories {
            column: column.to_string(),
            values: unexpected,
        })
    }
}
