//! Source-file and cleaned-artifact discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory, sorted by filename.
///
/// Extension matching is case-insensitive; subdirectories are skipped.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("")
}

/// Locates exactly one source CSV by filename pattern.
///
/// Files whose stem contains `primary` are preferred; when none match, the
/// broader `fallback` substring is tried. Within a pattern the first match
/// in filename-sorted order wins, so a directory holding several candidates
/// resolves deterministically.
pub fn find_source_file(dir: &Path, primary: &str, fallback: &str) -> Result<PathBuf> {
    let files = list_csv_files(dir)?;

    let matched = files
        .iter()
        .find(|path| stem_of(path).contains(primary))
        .or_else(|| files.iter().find(|path| stem_of(path).contains(fallback)));

    match matched {
        Some(path) => {
            debug!(path = %path.display(), pattern = primary, "source file located");
            Ok(path.clone())
        }
        None => Err(IngestError::NoMatchingFile {
            dir: dir.to_path_buf(),
            primary: primary.to_string(),
            fallback: fallback.to_string(),
        }),
    }
}

/// Finds the most recent cleaned artifact for a file stem.
///
/// Cleaned files are named `cleaned_<stem>_<YYYYMMDD>.csv`, so the
/// lexicographically greatest matching filename is the newest. Returns
/// `Ok(None)` when no run has produced an artifact yet.
pub fn find_latest_cleaned(dir: &Path, stem: &str) -> Result<Option<PathBuf>> {
    let prefix = format!("cleaned_{stem}_");
    let files = list_csv_files(dir)?;
    Ok(files
        .into_iter()
        .filter(|path| stem_of(path).starts_with(&prefix))
        .next_back())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), "year\n2005\n").unwrap();
        }
        dir
    }

    fn file_name(path: &Path) -> &str {
        path.file_name().unwrap().to_str().unwrap()
    }

    #[test]
    fn lists_csv_files_sorted() {
        let dir = seed_dir(&["b.csv", "a.CSV", "notes.txt"]);
        let files = list_csv_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(file_name(&files[0]), "a.CSV");
        assert_eq!(file_name(&files[1]), "b.csv");
    }

    #[test]
    fn primary_pattern_wins_over_fallback() {
        let dir = seed_dir(&["hdar_comm_ev.csv", "hdar_tidied_comm_ev.csv"]);
        let found =
            find_source_file(dir.path(), "tidied_comm_ev", "comm_ev").unwrap();
        assert_eq!(file_name(&found), "hdar_tidied_comm_ev.csv");
    }

    #[test]
    fn falls_back_to_broader_pattern() {
        let dir = seed_dir(&["renamed_comm_ev_v2.csv"]);
        let found =
            find_source_file(dir.path(), "tidied_comm_ev", "comm_ev").unwrap();
        assert_eq!(file_name(&found), "renamed_comm_ev_v2.csv");
    }

    #[test]
    fn first_match_wins_within_a_pattern() {
        let dir = seed_dir(&["b_tidied_comm_ev.csv", "a_tidied_comm_ev.csv"]);
        let found =
            find_source_file(dir.path(), "tidied_comm_ev", "comm_ev").unwrap();
        assert_eq!(file_name(&found), "a_tidied_comm_ev.csv");
    }

    #[test]
    fn no_match_is_an_error() {
        let dir = seed_dir(&["unrelated.csv"]);
        let error = find_source_file(dir.path(), "tidied_comm_ev", "comm_ev").unwrap_err();
        assert!(matches!(error, IngestError::NoMatchingFile { .. }));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let error = find_source_file(&missing, "x", "y").unwrap_err();
        assert!(matches!(error, IngestError::DirectoryNotFound { .. }));
    }

    #[test]
    fn latest_cleaned_picks_greatest_timestamp() {
        let dir = seed_dir(&[
            "cleaned_commercial_20260101.csv",
            "cleaned_commercial_20260215.csv",
            "cleaned_noncommercial_20260301.csv",
        ]);
        let latest = find_latest_cleaned(dir.path(), "commercial").unwrap().unwrap();
        assert_eq!(file_name(&latest), "cleaned_commercial_20260215.csv");
    }

    #[test]
    fn latest_cleaned_is_none_without_artifacts() {
        let dir = seed_dir(&["hdar_tidied_comm_ev.csv"]);
        assert!(
            find_latest_cleaned(dir.path(), "commercial")
                .unwrap()
                .is_none()
        );
    }
}
