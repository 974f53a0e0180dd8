//! Utilities for path collection and size formatting.

use crate::{Result, error::StitchError};
use std::path::PathBuf;

const GLOB_METACHARACTERS: &[char] = &['*', '?', '['];

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Plain paths (no glob metacharacters) are passed through untouched so
/// that a missing file is reported when it is loaded, not silently
/// dropped. Matches of a single pattern come back in sorted order.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
/// - Fails if a pattern matches nothing.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();

    if !pattern.contains(GLOB_METACHARACTERS) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| StitchError::Other {
        message: format!("Invalid pattern '{pattern}': {err}"),
    })?;

    for entry in paths {
        let path = entry.map_err(|err| StitchError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    if resolved_paths.is_empty() {
        return Err(StitchError::other(format!(
            "No files match pattern: {pattern}"
        )));
    }

    Ok(resolved_paths)
}

/// Format a byte count for display: `0 Bytes`, `512 Bytes`, `1.5 KB`,
/// `2.3 MB`.
///
/// Uses powers of 1024 and one decimal place, dropping a trailing `.0`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    const K: f64 = 1024.0;

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= K && unit < UNITS.len() - 1 {
        value /= K;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(0, "0 Bytes")]
    #[case(512, "512 Bytes")]
    #[case(1024, "1 KB")]
    #[case(1536, "1.5 KB")]
    #[case(150 * 1024, "150 KB")]
    #[case(2_411_724, "2.3 MB")]
    #[case(3 * 1024 * 1024 * 1024, "3 GB")]
    fn test_format_bytes(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(bytes), expected);
    }

    #[test]
    fn test_plain_paths_pass_through() {
        let paths = collect_paths_for_patterns(["missing.pdf", "dir/other.pdf"]).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("missing.pdf"), PathBuf::from("dir/other.pdf")]
        );
    }

    #[test]
    fn test_glob_expansion_is_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.pdf", "c.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let pattern = format!("{}/*.pdf", dir.path().display());
        let paths = collect_paths_for_patterns([pattern]).unwrap();

        assert_eq!(
            paths,
            vec![dir.path().join("a.pdf"), dir.path().join("b.pdf")]
        );
    }

    #[test]
    fn test_glob_without_matches_fails() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.pdf", dir.path().display());
        assert!(collect_paths_for_patterns([pattern]).is_err());
    }
}
