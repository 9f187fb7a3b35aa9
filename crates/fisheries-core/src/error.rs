//! Fatal cleaning failures.
//!
//! The pipeline has exactly two severities: fatal structural failures,
//! which are these variants, and advisory findings, which are
//! [`QualityIssue`](fisheries_model::QualityIssue) values. A fatal error
//! halts that dataset's run; the orchestrator records it and keeps the
//! sibling dataset running.

use fisheries_ingest::IngestError;
use fisheries_model::DatasetKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleaningError {
    /// The source file could not be located or parsed.
    #[error("{kind} load failed: {source}")]
    Load {
        kind: DatasetKind,
        #[source]
        source: IngestError,
    },

    /// Required columns are missing from the loaded table.
    #[error("{kind} schema validation failed: missing required column(s): {}", missing.join(", "))]
    Schema {
        kind: DatasetKind,
        missing: Vec<String>,
    },

    /// The cleaned table could not be written out.
    #[error("{kind} export failed: {source}")]
    Export {
        kind: DatasetKind,
        #[source]
        source: IngestError,
    },
}

impl CleaningError {
    /// The dataset this failure belongs to.
    pub fn kind(&self) -> DatasetKind {
        match self {
            CleaningError::Load { kind, .. }
            | CleaningError::Schema { kind, .. }
            | CleaningError::Export { kind, .. } => *kind,
        }
    }
}
