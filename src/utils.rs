use chrono::NaiveDateTime;
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;
use thiserror::Error;

/// Pattern user input and persisted date-times are parsed against (24-hour clock)
pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Pattern date-times are written to disk with, e.g. `2024-03-01T18:00`
pub const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Get the configuration directory path for Duker
pub fn get_config_dir() -> Option<PathBuf> {
    // On macOS this resolves to ~/Library/Application Support/com.duker.duker/
    ProjectDirs::from("com", "duker", "duker").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a date-time like 2024-03-01 18:00, got `{0}`")]
pub struct DateTimeFormatError(pub String);

/// Parse a date-time in `yyyy-MM-dd HH:mm` form.
///
/// Every field must be zero-padded; chrono alone would also take `2024-3-1 8:5`.
pub fn parse_date_time(text: &str) -> Result<NaiveDateTime, DateTimeFormatError> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 16
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 => *b == b':',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(DateTimeFormatError(text.to_string()));
    }
    NaiveDateTime::parse_from_str(text, INPUT_FORMAT)
        .map_err(|_| DateTimeFormatError(text.to_string()))
}

/// Render a date-time the way it is persisted
pub fn format_storage(value: &NaiveDateTime) -> String {
    value.format(STORAGE_FORMAT).to_string()
}
