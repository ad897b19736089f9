//! Utilities for size formatting, entry ids and path collection.

use crate::error::InputError;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::path::PathBuf;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count as a human-readable string.
///
/// Picks the largest unit up to GB (base 1024) and prints at most two
/// decimals, dropping trailing zeros.
///
/// ```
/// use pdfmerge::utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1048576), "1 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// Generate a short random token used as an entry id.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

/// Expand multiple glob patterns into filesystem paths.
///
/// Patterns are expanded in the order given; matches of one pattern keep the
/// order `glob` yields them in. A pattern that matches nothing contributes
/// nothing.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>, InputError>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        for entry in glob::glob(pattern.as_ref())? {
            resolved_paths.push(entry?);
        }
    }

    Ok(resolved_paths)
}
