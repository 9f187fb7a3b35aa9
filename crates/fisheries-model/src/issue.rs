//! Advisory data-quality findings.

use std::fmt;

use serde::Serialize;

/// A non-fatal data-quality finding recorded during validation.
///
/// Issues are advisory by contract: none of them removes rows or mutates
/// values beyond the coercion-to-null stage that produced them. They are
/// logged as warnings and carried into the cleaning summary for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityIssue {
    /// Cells in `column` that hold no usable value after type coercion.
    NullAfterCoercion { column: String, count: usize },
    /// Exchange values below zero.
    NegativeExchangeValues { count: usize },
    /// Distinct years outside the contract's valid range.
    YearsOutOfRange {
        min_year: i64,
        max_year: i64,
        observed: Vec<i64>,
    },
    /// Distinct values in `column` not covered by the contract vocabulary.
    UnexpectedCategories { column: String, values: Vec<String> },
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::NullAfterCoercion { column, count } => {
                write!(f, "{count} null {column} value(s) after type coercion")
            }
            QualityIssue::NegativeExchangeValues { count } => {
                write!(f, "{count} negative exchange value(s)")
            }
            QualityIssue::YearsOutOfRange {
                min_year,
                max_year,
                observed,
            } => {
                let years: Vec<String> = observed.iter().map(i64::to_string).collect();
                write!(
                    f,
                    "years outside expected range ({min_year}-{max_year}): {}",
                    years.join(", ")
                )
            }
            QualityIssue::UnexpectedCategories { column, values } => {
                write!(f, "unexpected {column} value(s): {}", values.join(", "))
            }
        }
    }
}
