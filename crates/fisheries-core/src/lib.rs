//! Core of the fisheries exchange-value cleaning pipeline.
//!
//! The [`DatasetCleaner`] is a state machine over one loaded [`Dataset`]:
//! load, schema gate, permissive type coercion, advisory range and
//! vocabulary checks, null/aggregate row removal, export, summary. The
//! [`PipelineOrchestrator`] runs the commercial and non-commercial cleaners
//! independently and merges their summaries, tolerating the failure of
//! either side.

mod cleaner;
mod dataset;
mod error;
mod orchestrator;
pub mod projection;
mod summary;

pub use cleaner::{CleanerOptions, CleanerOutcome, CoercionCounts, DatasetCleaner};
pub use dataset::Dataset;
pub use error::CleaningError;
pub use orchestrator::{DatasetOutcome, PipelineOrchestrator, PipelineReport};
pub use summary::build_summary;
