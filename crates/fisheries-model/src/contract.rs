//! Per-kind schema contracts.
//!
//! A contract is the immutable description of what a valid dataset of a
//! given kind looks like: required and display-only columns, categorical
//! vocabularies, the inclusive year bounds, which values are rollups, and
//! the filename patterns used to locate the source file. Contracts are
//! plain values passed into each cleaner at construction so tests can
//! supply alternates without touching process state.

use crate::kind::{DatasetKind, RegionDimension};

/// Inclusive year bounds for a dataset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i64,
    pub max: i64,
}

impl YearRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(self, year: i64) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Filename substrings used to locate the source CSV.
///
/// The primary pattern is tried first; the fallback is a broader match for
/// files that were renamed upstream. First match in filename-sorted order
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatterns {
    pub primary: String,
    pub fallback: String,
}

impl FilePatterns {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }
}

/// Immutable schema contract for one dataset kind.
///
/// The two built-in contracts agree on shape but differ on the region
/// dimension (`area_id` + county vs `island` + county), the year bounds,
/// the county and species vocabularies, and the aggregate value lists.
/// The species aggregate exists only for commercial data; non-commercial
/// has a single species group with nothing to aggregate over, so its
/// `aggregate_species_values` list is empty. That asymmetry is contract
/// data, not cleaner behavior.
#[derive(Debug, Clone)]
pub struct SchemaContract {
    pub kind: DatasetKind,
    /// Columns that must be present for the pipeline to proceed.
    pub required_columns: Vec<String>,
    /// Presentation-only columns: translated labels and pre-formatted
    /// currency strings. Optional on input, dropped when `remove_display`
    /// is set.
    pub display_columns: Vec<String>,
    /// The region dimension carried alongside `county`.
    pub region: RegionDimension,
    pub expected_counties: Vec<String>,
    pub expected_species_groups: Vec<String>,
    pub expected_ecosystem_types: Vec<String>,
    /// Species-group values that are rollups over all species.
    pub aggregate_species_values: Vec<String>,
    /// Ecosystem-type values that are rollups over all ecosystems.
    pub aggregate_ecosystem_values: Vec<String>,
    pub valid_years: YearRange,
    pub file_patterns: FilePatterns,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

impl SchemaContract {
    /// Contract for commercial catch reports.
    pub fn commercial() -> Self {
        Self {
            kind: DatasetKind::Commercial,
            required_columns: strings(&[
                "year",
                "area_id",
                "county",
                "species_group",
                "ecosystem_type",
                "exchange_value",
            ]),
            display_columns: strings(&["county_olelo", "exchange_value_formatted"]),
            region: RegionDimension::AreaId,
            expected_counties: strings(&["Hawaii", "Maui", "Honolulu", "Kauai", "Kalawao"]),
            expected_species_groups: strings(&[
                "Deep 7 Bottomfish",
                "Shallow Bottomfish",
                "Pelagics",
                "Reef-Associated",
                "All Species",
            ]),
            expected_ecosystem_types: strings(&[
                "Inshore — Reef",
                "Coastal — Open Ocean",
                "All Ecosystems",
            ]),
            aggregate_species_values: strings(&["All Species"]),
            aggregate_ecosystem_values: strings(&["All Ecosystems"]),
            valid_years: YearRange::new(1997, 2021),
            file_patterns: FilePatterns::new("tidied_comm_ev", "comm_ev"),
        }
    }

    /// Contract for non-commercial MRIP survey estimates.
    ///
    /// Niihau and Kahoolawe are absent from the island list because the
    /// MRIP survey does not sample them; Kalawao is absent from the county
    /// list because Molokai maps to Maui county in the survey design.
    pub fn non_commercial() -> Self {
        Self {
            kind: DatasetKind::NonCommercial,
            required_columns: strings(&[
                "year",
                "island",
                "county",
                "species_group",
                "ecosystem_type",
                "exchange_value",
            ]),
            display_columns: strings(&[
                "island_olelo",
                "county_olelo",
                "exchange_value_formatted",
            ]),
            region: RegionDimension::Island {
                expected: strings(&["Hawaii", "Kauai", "Lanai", "Maui", "Molokai", "Oahu"]),
            },
            expected_counties: strings(&["Hawaii", "Maui", "Honolulu", "Kauai"]),
            expected_species_groups: strings(&["Herbivores"]),
            expected_ecosystem_types: strings(&[
                "Inshore — Reef",
                "Coastal — Open Ocean",
                "All Ecosystems",
            ]),
            aggregate_species_values: Vec::new(),
            aggregate_ecosystem_values: strings(&["All Ecosystems"]),
            valid_years: YearRange::new(2005, 2022),
            file_patterns: FilePatterns::new("tidied_noncomm_ev", "noncomm_ev"),
        }
    }

    /// Contract for the given kind.
    pub fn for_kind(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Commercial => Self::commercial(),
            DatasetKind::NonCommercial => Self::non_commercial(),
        }
    }

    /// True when `value` is a species-group rollup for this kind.
    pub fn is_aggregate_species(&self, value: &str) -> bool {
        self.aggregate_species_values
            .iter()
            .any(|aggregate| aggregate == value)
    }

    /// True when `value` is an ecosystem-type rollup.
    pub fn is_aggregate_ecosystem(&self, value: &str) -> bool {
        self.aggregate_ecosystem_values
            .iter()
            .any(|aggregate| aggregate == value)
    }
}
