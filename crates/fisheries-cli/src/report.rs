//! Final pipeline report printed after a clean run.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fisheries_core::{DatasetOutcome, PipelineReport};
use fisheries_model::{DatasetKind, DateRange};

/// Prints the per-dataset results, overall totals, and advisory issues.
pub fn print_report(report: &PipelineReport) {
    if let Some(path) = &report.summary_file {
        println!("Combined summary: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Status"),
        header_cell("Input Rows"),
        header_cell("Output Rows"),
        header_cell("Removed"),
        header_cell("Years"),
        header_cell("Total Value"),
        header_cell("Output File"),
    ]);
    apply_report_table_style(&mut table);
    for column in 2..=4 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    align_column(&mut table, 6, CellAlignment::Right);

    for kind in DatasetKind::all() {
        table.add_row(outcome_row(kind, report.outcome(kind)));
    }
    if let Some(overall) = &report.combined.overall {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(overall.total_records).add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(range_text(overall.combined_date_range)),
            Cell::new(money(overall.total_exchange_value)).add_attribute(Attribute::Bold),
            dim_cell("-"),
        ]);
    }
    println!("{table}");

    print_issue_table(report);

    for kind in DatasetKind::all() {
        if let Some(error) = report.outcome(kind).error() {
            eprintln!("error: {error}");
        }
    }
}

fn outcome_row(kind: DatasetKind, outcome: &DatasetOutcome) -> Vec<Cell> {
    match outcome {
        DatasetOutcome::Succeeded {
            output_file,
            summary,
        } => vec![
            Cell::new(kind.display_name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new("SUCCESS")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.raw_row_count),
            Cell::new(summary.cleaned_row_count),
            Cell::new(summary.rows_removed),
            Cell::new(range_text(summary.date_range)),
            Cell::new(money(summary.total_exchange_value)),
            Cell::new(output_file.display()),
        ],
        DatasetOutcome::Failed { .. } => vec![
            Cell::new(kind.display_name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new("FAILED")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ],
    }
}

fn print_issue_table(report: &PipelineReport) {
    let mut issues = Vec::new();
    for kind in DatasetKind::all() {
        if let Some(summary) = report.outcome(kind).summary() {
            for issue in &summary.issues {
                issues.push((kind, issue));
            }
        }
    }
    if issues.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Dataset"), header_cell("Issue")]);
    apply_table_style(&mut table);
    for (kind, issue) in issues {
        table.add_row(vec![
            Cell::new(kind.display_name()).fg(Color::Blue),
            Cell::new(issue.to_string()).fg(Color::Yellow),
        ]);
    }
    println!();
    println!("Data quality issues:");
    println!("{table}");
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn range_text(range: Option<DateRange>) -> String {
    match range {
        Some(range) => format!("{}-{}", range.min_year, range.max_year),
        None => "-".to_string(),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
