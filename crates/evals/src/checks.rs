// File presence and pattern occurrence checks

use crate::error::{EvalError, EvalResult};
use regex::RegexBuilder;
use std::path::Path;

/// Whether `name` (file or directory) exists under `dir`
pub fn check_file_exists(dir: &Path, name: &str) -> (bool, &'static str) {
    if dir.join(name).exists() {
        (true, "exists")
    } else {
        (false, "MISSING")
    }
}

/// Count case-insensitive, non-overlapping matches of `pattern` in the file.
/// A missing file counts as zero matches.
pub fn check_pattern_in_file(
    path: &Path,
    pattern: &str,
    min_occurrences: usize,
) -> EvalResult<(bool, usize)> {
    if !path.exists() {
        return Ok((false, 0));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| EvalError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

    let content = std::fs::read_to_string(path)?;
    let count = regex.find_iter(&content).count();
    Ok((count >= min_occurrences, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_and_directory_presence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "# Agent").unwrap();
        std::fs::create_dir(dir.path().join("memory")).unwrap();

        assert_eq!(check_file_exists(dir.path(), "AGENTS.md"), (true, "exists"));
        assert_eq!(check_file_exists(dir.path(), "memory"), (true, "exists"));
        assert_eq!(check_file_exists(dir.path(), "SOUL.md"), (false, "MISSING"));
    }

    #[test]
    fn test_pattern_counts_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("TOOLS.md");
        std::fs::write(&path, "## Tools\nuse the tool\nTOOL list\n").unwrap();

        assert_eq!(check_pattern_in_file(&path, "tool", 3).unwrap(), (true, 3));
        assert_eq!(check_pattern_in_file(&path, "tool", 4).unwrap(), (false, 3));
        assert_eq!(check_pattern_in_file(&path, "^## ", 1).unwrap(), (true, 1));
    }

    #[test]
    fn test_missing_file_has_no_matches() {
        let dir = TempDir::new().unwrap();
        let result = check_pattern_in_file(&dir.path().join("absent.md"), "x", 1).unwrap();
        assert_eq!(result, (false, 0));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AGENTS.md");
        std::fs::write(&path, "text").unwrap();

        let err = check_pattern_in_file(&path, "(unclosed", 1).unwrap_err();
        assert!(err.to_string().starts_with("Invalid pattern '(unclosed'"));
    }
}
