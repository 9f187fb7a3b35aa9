//! Integration tests for the dataset cleaning stages.

use std::fmt::Write as _;
use std::path::Path;

use tempfile::TempDir;

use fisheries_core::{CleanerOptions, CleaningError, Dataset, DatasetCleaner};
use fisheries_ingest::{CsvTable, read_csv_table};
use fisheries_model::{DatasetKind, QualityIssue, SchemaContract};

const COMMERCIAL_HEADER: &str = "year,area_id,county,species_group,ecosystem_type,exchange_value";
const NONCOMMERCIAL_HEADER: &str = "year,island,county,species_group,ecosystem_type,exchange_value";

fn write_input(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn commercial_cleaner(input: &TempDir, output: &TempDir) -> DatasetCleaner {
    DatasetCleaner::new(
        SchemaContract::commercial(),
        input.path(),
        output.path(),
    )
}

/// 100 commercial rows: 3 with null exchange values, 5 tagged as the
/// species rollup, the rest ordinary.
fn scenario_csv() -> String {
    let mut csv = String::from(COMMERCIAL_HEADER);
    csv.push('\n');
    for idx in 0..100 {
        let species = if idx < 5 { "All Species" } else { "Pelagics" };
        let value = if (5..8).contains(&idx) {
            String::new()
        } else {
            format!("{}", 1000 + idx)
        };
        writeln!(
            csv,
            "{},A{},Maui,{},Inshore — Reef,{}",
            2000 + (idx % 20),
            idx,
            species,
            value
        )
        .unwrap();
    }
    csv
}

fn dataset_from(kind: DatasetKind, header: &str, rows: &[&str]) -> Dataset {
    let headers = header.split(',').map(str::to_string).collect();
    let rows = rows
        .iter()
        .map(|row| row.split(',').map(str::to_string).collect())
        .collect();
    Dataset::new(kind, CsvTable { headers, rows })
}

#[test]
fn commercial_scenario_with_defaults_removes_eight_rows() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "hdar_tidied_comm_ev.csv", &scenario_csv());

    let mut cleaner = commercial_cleaner(&input, &output);
    let outcome = cleaner.run(CleanerOptions::default()).unwrap();

    let summary = &outcome.summary;
    assert_eq!(summary.raw_row_count, 100);
    assert_eq!(summary.cleaned_row_count, 92);
    assert_eq!(summary.rows_removed, 8);
    assert_eq!(summary.removal_breakdown.null_exchange_values, 3);
    assert_eq!(summary.removal_breakdown.aggregate_rows, 5);
    assert_eq!(summary.rows_removed, summary.removal_breakdown.total());

    let name = outcome.output_file.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("cleaned_commercial_"));
    assert!(name.ends_with(".csv"));
    assert!(outcome.output_file.exists());

    let exported = read_csv_table(&outcome.output_file).unwrap();
    assert_eq!(exported.len(), 92);
}

#[test]
fn aggregate_rows_survive_when_removal_is_disabled() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let csv = format!(
        "{COMMERCIAL_HEADER}\n\
         2005,A1,Maui,Pelagics,Inshore — Reef,100\n\
         2005,A1,Maui,Pelagics,All Ecosystems,300\n\
         2006,A2,Maui,All Species,Inshore — Reef,400\n"
    );
    write_input(input.path(), "hdar_tidied_comm_ev.csv", &csv);

    let mut cleaner = commercial_cleaner(&input, &output);
    let options = CleanerOptions {
        remove_aggregates: false,
        ..CleanerOptions::default()
    };
    let outcome = cleaner.run(options).unwrap();

    assert_eq!(outcome.summary.cleaned_row_count, 3);
    let exported = read_csv_table(&outcome.output_file).unwrap();
    let ecosystem = exported.column_index("ecosystem_type").unwrap();
    let rollups = exported
        .rows
        .iter()
        .filter(|row| row[ecosystem] == "All Ecosystems")
        .count();
    assert_eq!(rollups, 1);
}

#[test]
fn aggregate_rows_are_gone_when_removal_is_enabled() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let csv = format!(
        "{COMMERCIAL_HEADER}\n\
         2005,A1,Maui,Pelagics,Inshore — Reef,100\n\
         2005,A1,Maui,Pelagics,All Ecosystems,300\n\
         2006,A2,Maui,All Species,Inshore — Reef,400\n"
    );
    write_input(input.path(), "hdar_tidied_comm_ev.csv", &csv);

    let mut cleaner = commercial_cleaner(&input, &output);
    let outcome = cleaner.run(CleanerOptions::default()).unwrap();

    let exported = read_csv_table(&outcome.output_file).unwrap();
    assert_eq!(exported.len(), 1);
    let ecosystem = exported.column_index("ecosystem_type").unwrap();
    let species = exported.column_index("species_group").unwrap();
    for row in &exported.rows {
        assert_ne!(row[ecosystem], "All Ecosystems");
        assert_ne!(row[species], "All Species");
    }
}

#[test]
fn missing_required_column_fails_before_any_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    // No exchange_value column.
    write_input(
        input.path(),
        "hdar_tidied_comm_ev.csv",
        "year,area_id,county,species_group,ecosystem_type\n2005,A1,Maui,Pelagics,Inshore — Reef\n",
    );

    let mut cleaner = commercial_cleaner(&input, &output);
    let error = cleaner.run(CleanerOptions::default()).unwrap_err();

    let CleaningError::Schema { kind, missing } = error else {
        panic!("expected a schema failure, got {error}");
    };
    assert_eq!(kind, DatasetKind::Commercial);
    assert_eq!(missing, vec!["exchange_value"]);

    let written: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
    assert!(written.is_empty(), "no file may be written on schema failure");
}

#[test]
fn empty_input_directory_is_a_load_failure() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let mut cleaner = commercial_cleaner(&input, &output);
    let error = cleaner.run(CleanerOptions::default()).unwrap_err();
    assert!(matches!(error, CleaningError::Load { .. }));
    let written: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
    assert!(written.is_empty());
}

#[test]
fn unexpected_island_is_advisory_and_the_row_survives() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let csv = format!(
        "{NONCOMMERCIAL_HEADER}\n\
         2010,Oahu,Honolulu,Herbivores,Inshore — Reef,250\n\
         2011,Niihau,Kauai,Herbivores,Inshore — Reef,80\n"
    );
    write_input(input.path(), "hdar_tidied_noncomm_ev.csv", &csv);

    let mut cleaner = DatasetCleaner::new(
        SchemaContract::non_commercial(),
        input.path(),
        output.path(),
    );
    let outcome = cleaner.run(CleanerOptions::default()).unwrap();

    assert_eq!(outcome.summary.cleaned_row_count, 2);
    let flagged = outcome.summary.issues.iter().any(|issue| {
        matches!(
            issue,
            QualityIssue::UnexpectedCategories { column, values }
                if column == "island" && values.contains(&"Niihau".to_string())
        )
    });
    assert!(flagged, "Niihau should be flagged as an unexpected island");
    assert!(
        outcome
            .summary
            .unique_islands
            .as_ref()
            .unwrap()
            .contains(&"Niihau".to_string())
    );
}

#[test]
fn range_validation_never_removes_rows() {
    let mut dataset = dataset_from(
        DatasetKind::Commercial,
        COMMERCIAL_HEADER,
        &[
            "1950,A1,Maui,Pelagics,Inshore — Reef,-50",
            "2030,A2,Maui,Pelagics,Inshore — Reef,100",
            "2005,A3,Maui,Pelagics,Inshore — Reef,200",
        ],
    );
    let mut cleaner = DatasetCleaner::new(SchemaContract::commercial(), "in", "out");
    cleaner.validate_data_types(&mut dataset);

    let before = dataset.len();
    cleaner.validate_ranges(&dataset);
    assert_eq!(dataset.len(), before);

    let issues = cleaner.issues();
    assert!(
        issues
            .iter()
            .any(|issue| matches!(issue, QualityIssue::NegativeExchangeValues { count: 1 }))
    );
    assert!(issues.iter().any(|issue| matches!(
        issue,
        QualityIssue::YearsOutOfRange { observed, .. } if observed == &vec![1950, 2030]
    )));
}

#[test]
fn type_coercion_is_idempotent() {
    let mut dataset = dataset_from(
        DatasetKind::Commercial,
        COMMERCIAL_HEADER,
        &[
            "2005.0,A1,Maui,Pelagics,Inshore — Reef,100.5",
            "bad-year,A2,Maui,Pelagics,Inshore — Reef,not-a-number",
            ",A3,Maui,Pelagics,Inshore — Reef,",
        ],
    );
    let mut cleaner = DatasetCleaner::new(SchemaContract::commercial(), "in", "out");

    let first = cleaner.validate_data_types(&mut dataset);
    let snapshot = dataset.table().clone();
    let second = cleaner.validate_data_types(&mut dataset);

    assert_eq!(first, second);
    assert_eq!(first.null_years, 2);
    assert_eq!(first.null_exchange_values, 2);
    assert_eq!(dataset.table(), &snapshot, "second pass must change nothing");
    // Float-formatted year was canonicalized to integer text.
    assert_eq!(dataset.cell(0, 0), "2005");
    assert_eq!(dataset.cell(1, 0), "");
}

#[test]
fn display_columns_are_kept_by_default_and_dropped_on_request() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let csv = "year,area_id,county,species_group,ecosystem_type,exchange_value,county_olelo,exchange_value_formatted\n\
               2005,A1,Maui,Pelagics,Inshore — Reef,100,Mau‘i,\"$100\"\n";
    write_input(input.path(), "hdar_tidied_comm_ev.csv", csv);

    let mut cleaner = commercial_cleaner(&input, &output);
    let outcome = cleaner.run(CleanerOptions::default()).unwrap();
    let exported = read_csv_table(&outcome.output_file).unwrap();
    assert!(exported.column_index("county_olelo").is_some());

    let mut cleaner = commercial_cleaner(&input, &output);
    let options = CleanerOptions {
        remove_display: true,
        ..CleanerOptions::default()
    };
    let outcome = cleaner.run(options).unwrap();
    let exported = read_csv_table(&outcome.output_file).unwrap();
    assert!(exported.column_index("county_olelo").is_none());
    assert!(exported.column_index("exchange_value_formatted").is_none());
    assert!(exported.column_index("exchange_value").is_some());
}

#[test]
fn summary_reports_breakdowns_and_totals() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let csv = format!(
        "{COMMERCIAL_HEADER}\n\
         2005,A1,Maui,Pelagics,Inshore — Reef,100\n\
         2005,A2,Honolulu,Deep 7 Bottomfish,Inshore — Reef,250\n\
         2007,A1,Maui,Pelagics,Coastal — Open Ocean,50\n"
    );
    write_input(input.path(), "hdar_tidied_comm_ev.csv", &csv);

    let mut cleaner = commercial_cleaner(&input, &output);
    let outcome = cleaner.run(CleanerOptions::default()).unwrap();
    let summary = outcome.summary;

    assert_eq!(summary.data_type, "commercial");
    assert_eq!(summary.total_exchange_value, 400.0);
    let range = summary.date_range.unwrap();
    assert_eq!((range.min_year, range.max_year), (2005, 2007));
    assert_eq!(summary.records_by_year.get(&2005), Some(&2));
    assert_eq!(summary.records_by_year.get(&2007), Some(&1));
    assert_eq!(summary.total_value_by_year.get(&2005), Some(&350.0));
    assert_eq!(summary.records_by_county.get(&"Maui".to_string()), Some(&2));
    assert_eq!(summary.unique_counties, vec!["Honolulu", "Maui"]);
    assert_eq!(
        summary.unique_area_ids.as_deref(),
        Some(["A1".to_string(), "A2".to_string()].as_slice())
    );
    assert!(summary.unique_islands.is_none());
    assert!(summary.records_by_island.is_none());
}
