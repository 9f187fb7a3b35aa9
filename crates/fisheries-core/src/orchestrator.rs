//! Runs both dataset cleaners and merges their summaries.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, info_span};

use fisheries_model::{CleaningSummary, CombinedSummary, DatasetKind, SchemaContract};

use crate::cleaner::{CleanerOptions, DatasetCleaner};
use crate::error::CleaningError;

/// Outcome of one dataset's cleaning run.
///
/// Recorded separately per dataset so one side's structural failure never
/// hides the other side's result.
#[derive(Debug)]
pub enum DatasetOutcome {
    Succeeded {
        output_file: PathBuf,
        summary: CleaningSummary,
    },
    Failed {
        error: CleaningError,
    },
}

impl DatasetOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, DatasetOutcome::Succeeded { .. })
    }

    pub fn summary(&self) -> Option<&CleaningSummary> {
        match self {
            DatasetOutcome::Succeeded { summary, .. } => Some(summary),
            DatasetOutcome::Failed { .. } => None,
        }
    }

    pub fn output_file(&self) -> Option<&Path> {
        match self {
            DatasetOutcome::Succeeded { output_file, .. } => Some(output_file),
            DatasetOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CleaningError> {
        match self {
            DatasetOutcome::Succeeded { .. } => None,
            DatasetOutcome::Failed { error } => Some(error),
        }
    }
}

/// What a full pipeline run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub commercial: DatasetOutcome,
    pub non_commercial: DatasetOutcome,
    pub combined: CombinedSummary,
    /// Path of the combined-summary JSON; `None` when both datasets failed
    /// and nothing was written.
    pub summary_file: Option<PathBuf>,
    /// AND of both per-dataset outcomes.
    pub overall_success: bool,
}

impl PipelineReport {
    pub fn outcome(&self, kind: DatasetKind) -> &DatasetOutcome {
        match kind {
            DatasetKind::Commercial => &self.commercial,
            DatasetKind::NonCommercial => &self.non_commercial,
        }
    }
}

/// Runs the commercial and non-commercial cleaners independently.
///
/// Partial-failure tolerance is the point: a broken non-commercial feed
/// must not prevent the commercial report from being produced. Dataset
/// failures are recorded in the report; only infrastructure failures
/// (writing the combined summary) propagate as errors.
#[derive(Debug)]
pub struct PipelineOrchestrator {
    input_dir: PathBuf,
    output_dir: PathBuf,
    options: CleanerOptions,
}

impl PipelineOrchestrator {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            options: CleanerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CleanerOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs both cleaners, writes the combined summary, and reports.
    pub fn run(&self) -> Result<PipelineReport> {
        let span = info_span!("pipeline");
        let _guard = span.enter();
        let start = Instant::now();
        info!(
            input_dir = %self.input_dir.display(),
            output_dir = %self.output_dir.display(),
            remove_aggregates = self.options.remove_aggregates,
            remove_display = self.options.remove_display,
            "fisheries cleaning pipeline started"
        );

        let commercial = self.run_dataset(DatasetKind::Commercial);
        let non_commercial = self.run_dataset(DatasetKind::NonCommercial);

        let combined = CombinedSummary::merge(
            Local::now().to_rfc3339(),
            commercial.summary().cloned(),
            non_commercial.summary().cloned(),
        );

        // A fully failed run leaves no orchestrator artifact behind.
        let summary_file = if commercial.succeeded() || non_commercial.succeeded() {
            Some(
                self.export_summary(&combined)
                    .context("export combined summary")?,
            )
        } else {
            None
        };

        let overall_success = commercial.succeeded() && non_commercial.succeeded();
        info!(
            overall_success,
            commercial_ok = commercial.succeeded(),
            non_commercial_ok = non_commercial.succeeded(),
            duration_ms = start.elapsed().as_millis(),
            "fisheries cleaning pipeline finished"
        );

        Ok(PipelineReport {
            commercial,
            non_commercial,
            combined,
            summary_file,
            overall_success,
        })
    }

    fn run_dataset(&self, kind: DatasetKind) -> DatasetOutcome {
        let mut cleaner = DatasetCleaner::new(
            SchemaContract::for_kind(kind),
            &self.input_dir,
            &self.output_dir,
        );
        match cleaner.run(self.options) {
            Ok(outcome) => DatasetOutcome::Succeeded {
                output_file: outcome.output_file,
                summary: outcome.summary,
            },
            Err(error) => {
                error!(kind = %kind, %error, "dataset cleaning failed");
                DatasetOutcome::Failed { error }
            }
        }
    }

    fn export_summary(&self, combined: &CombinedSummary) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("create {}", self.output_dir.display()))?;
        let date = Local::now().format("%Y%m%d");
        let path = self.output_dir.join(format!("cleaning_summary_{date}.json"));
        let json = serde_json::to_string_pretty(combined).context("serialize combined summary")?;
        std::fs::write(&path, format!("{json}\n"))
            .with_context(|| format!("write {}", path.display()))?;
        info!(summary_file = %path.display(), "exported combined summary");
        Ok(path)
    }
}
