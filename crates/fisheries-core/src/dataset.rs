//! One dataset owned by one cleaner run.

use std::collections::BTreeSet;

use fisheries_ingest::{CsvTable, parse_f64, parse_year};
use fisheries_model::DatasetKind;

/// An ordered table of records plus the two audit counters.
///
/// `raw_row_count` is fixed at load; `cleaned_row_count` is set exactly
/// once, at export, after which the table is treated as immutable and the
/// exported file is the authoritative state. The invariant
/// `cleaned_row_count <= raw_row_count` holds because rows are only ever
/// removed, never added.
#[derive(Debug, Clone)]
pub struct Dataset {
    kind: DatasetKind,
    table: CsvTable,
    raw_row_count: usize,
    cleaned_row_count: Option<usize>,
}

impl Dataset {
    /// Wraps a freshly loaded table, recording its raw row count.
    pub fn new(kind: DatasetKind, table: CsvTable) -> Self {
        let raw_row_count = table.len();
        Self {
            kind,
            table,
            raw_row_count,
            cleaned_row_count: None,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub fn table(&self) -> &CsvTable {
        &self.table
    }

    /// Current number of rows.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Row count recorded at load time.
    pub fn raw_row_count(&self) -> usize {
        self.raw_row_count
    }

    /// Row count recorded at export time; `None` before export.
    pub fn cleaned_row_count(&self) -> Option<usize> {
        self.cleaned_row_count
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.table.column_index(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell text, empty when the row or column is out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.table
            .rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        if let Some(cells) = self.table.rows.get_mut(row)
            && let Some(cell) = cells.get_mut(column)
        {
            *cell = value;
        }
    }

    /// Parsed year for a row, `None` when absent or unparseable.
    pub fn year(&self, row: usize) -> Option<i64> {
        let column = self.column_index("year")?;
        parse_year(self.cell(row, column))
    }

    /// Parsed exchange value for a row, `None` when absent or unparseable.
    pub fn exchange_value(&self, row: usize) -> Option<f64> {
        let column = self.column_index("exchange_value")?;
        parse_f64(self.cell(row, column))
    }

    /// Keeps only the rows the predicate accepts; returns how many were
    /// dropped.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[String]) -> bool,
    {
        let before = self.table.rows.len();
        self.table.rows.retain(|row| keep(row));
        before - self.table.rows.len()
    }

    /// Drops the named columns where present; returns the names actually
    /// removed, in header order.
    pub fn drop_columns(&mut self, names: &[String]) -> Vec<String> {
        let drop: Vec<usize> = self
            .table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| names.contains(header))
            .map(|(idx, _)| idx)
            .collect();
        if drop.is_empty() {
            return Vec::new();
        }

        let removed = drop
            .iter()
            .map(|&idx| self.table.headers[idx].clone())
            .collect();
        let keep = |idx: &usize| !drop.contains(idx);
        self.table.headers = filter_indexed(std::mem::take(&mut self.table.headers), keep);
        for row in &mut self.table.rows {
            *row = filter_indexed(std::mem::take(row), keep);
        }
        removed
    }

    /// Sorted distinct non-empty values of a column.
    pub fn unique_values(&self, name: &str) -> Vec<String> {
        let Some(column) = self.column_index(name) else {
            return Vec::new();
        };
        let mut uniques = BTreeSet::new();
        for row in 0..self.len() {
            let value = self.cell(row, column);
            if !value.is_empty() {
                uniques.insert(value.to_string());
            }
        }
        uniques.into_iter().collect()
    }

    /// Freezes the dataset at export time.
    pub fn mark_exported(&mut self) {
        self.cleaned_row_count = Some(self.len());
    }
}

fn filter_indexed<F>(values: Vec<String>, keep: F) -> Vec<String>
where
    F: Fn(&usize) -> bool,
{
    values
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| keep(idx))
        .map(|(_, value)| value)
        .collect()
}
