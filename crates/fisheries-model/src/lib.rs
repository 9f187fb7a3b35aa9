//! Data model for the fisheries exchange-value cleaning pipeline.
//!
//! This crate is pure data: the two dataset kinds, their immutable schema
//! contracts, the advisory quality-issue vocabulary, and the summary
//! payloads exported after cleaning. No I/O and no mutable state live here.

mod contract;
mod issue;
mod kind;
mod summary;

pub use contract::{FilePatterns, SchemaContract, YearRange};
pub use issue::QualityIssue;
pub use kind::{DatasetKind, RegionDimension};
pub use summary::{
    CleaningSummary, CombinedSummary, DateRange, OverallTotals, RemovalBreakdown,
};
