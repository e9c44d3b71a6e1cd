use std::{collections::HashSet, path::PathBuf};

use tracing::warn;

use crate::config::ConfigError;

/// Expand a glob pattern (recursive `**` supported) into an ordered,
/// deduplicated list of candidate files.
///
/// Directories are filtered out and unreadable entries are skipped with a
/// warning. No matches is a valid empty result, not an error.
pub fn resolve(pattern: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = glob::glob(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && seen.insert(path.clone()) {
                    files.push(path);
                }
            }
            Err(err) => {
                warn!(path = %err.path().display(), error = %err, "skipping unreadable entry");
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn recursive_glob_finds_nested_files() {
        let temp = tempfile::tempdir().unwrap();
        write(&temp.path().join("top.md"), "a");
        write(&temp.path().join("docs/inner.md"), "b");
        write(&temp.path().join("docs/deep/leaf.md"), "c");
        write(&temp.path().join("docs/readme.txt"), "not matched");

        let pattern = format!("{}/**/*.md", temp.path().display());
        let files = resolve(&pattern).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(files.len(), 3);
        assert!(names.contains(&"top.md".to_string()));
        assert!(names.contains(&"inner.md".to_string()));
        assert!(names.contains(&"leaf.md".to_string()));
    }

    #[test]
    fn directories_are_not_candidates() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("notes.md")).unwrap();
        write(&temp.path().join("real.md"), "text");

        let pattern = format!("{}/*.md", temp.path().display());
        let files = resolve(&pattern).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.md"));
    }

    #[test]
    fn no_matches_is_an_empty_result() {
        let temp = tempfile::tempdir().unwrap();
        let pattern = format!("{}/**/*.md", temp.path().display());
        assert!(resolve(&pattern).unwrap().is_empty());
    }

    #[test]
    fn resolution_order_is_stable() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["b.md", "a.md", "c.md"] {
            write(&temp.path().join(name), "text");
        }
        let pattern = format!("{}/*.md", temp.path().display());
        let first = resolve(&pattern).unwrap();
        let second = resolve(&pattern).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = resolve("docs/***.md").expect_err("triple star should be rejected");
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
