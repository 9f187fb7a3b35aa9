//! Plain string table over a CSV file.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{IngestError, Result};

/// An ordered table of string cells with a single header row.
///
/// The source files are pre-tidied, so the first record is always the
/// header. Cells are trimmed and BOM-stripped on read; short records are
/// padded to the header width and long ones truncated, so every row has
/// exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file into a [`CsvTable`].
///
/// Fully empty records are skipped; an empty file yields an empty table.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        if headers.is_empty() {
            headers = record.iter().map(normalize_header).collect();
            continue;
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}

/// Writes a [`CsvTable`] to `path`, overwriting any existing file.
pub fn write_csv_table(path: &Path, table: &CsvTable) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|source| IngestError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    let write_error = |source: csv::Error| IngestError::Write {
        path: path.to_path_buf(),
        source,
    };
    writer.write_record(&table.headers).map_err(write_error)?;
    for row in &table.rows {
        writer.write_record(row).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|source| write_error(csv::Error::from(source)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_trimmed_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "year, county ,exchange_value\n 2005 ,Maui, 120.5 \n",
        );

        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.headers, vec!["year", "county", "exchange_value"]);
        assert_eq!(table.rows, vec![vec!["2005", "Maui", "120.5"]]);
    }

    #[test]
    fn strips_byte_order_mark_from_first_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bom.csv", "\u{feff}year,county\n2005,Maui\n");

        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.headers[0], "year");
        assert_eq!(table.column_index("year"), Some(0));
    }

    #[test]
    fn skips_fully_empty_records_and_pads_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "gaps.csv",
            "year,county,exchange_value\n,,\n2006,Oahu\n",
        );

        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0], vec!["2006", "Oahu", ""]);
    }

    #[test]
    fn empty_file_yields_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.csv", "");

        let table = read_csv_table(&path).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn round_trips_through_write() {
        let dir = TempDir::new().unwrap();
        let table = CsvTable {
            headers: vec!["year".to_string(), "county".to_string()],
            rows: vec![
                vec!["2005".to_string(), "Maui".to_string()],
                vec!["2006".to_string(), "Oahu".to_string()],
            ],
        };

        let path = dir.path().join("out.csv");
        write_csv_table(&path, &table).unwrap();
        let reread = read_csv_table(&path).unwrap();
        assert_eq!(reread, table);
    }
}
