//! Discovery of calendar sources in the data directory.

use std::path::{Path, PathBuf};

use crate::error::{CsvCalError, CsvCalResult};

const SOURCE_EXTENSION: &str = "csv";

/// Names of all `<name>.csv` files in `data_dir`, sorted.
///
/// A missing data directory simply has no calendars.
pub fn list_calendars(data_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(data_dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();

    names.sort();
    names
}

/// Path of the CSV source for calendar `name`.
pub fn calendar_path(data_dir: &Path, name: &str) -> CsvCalResult<PathBuf> {
    let is_plain_name = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\']);
    if !is_plain_name {
        return Err(CsvCalError::CalendarNotFound(name.to_string()));
    }

    let path = data_dir.join(format!("{name}.{SOURCE_EXTENSION}"));
    if !path.is_file() {
        return Err(CsvCalError::CalendarNotFound(name.to_string()));
    }
    Ok(path)
}
