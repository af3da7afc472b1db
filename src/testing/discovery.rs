//! Tests file discovery

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Find every file called `tests_file` below `root`
///
/// Entries are visited in file-name order so runs are reproducible.
pub fn find_tests_files(root: &Path, tests_file: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == tests_file {
            debug!(path = %entry.path().display(), "found tests file");
            found.push(entry.into_path());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_finds_nested_tests_files_in_order() {
        let dir = tempdir().unwrap();
        for sub in ["b", "a", "a/deeper", "c"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        fs::write(dir.path().join("b/tests.yaml"), "steps: []").unwrap();
        fs::write(dir.path().join("a/tests.yaml"), "steps: []").unwrap();
        fs::write(dir.path().join("a/deeper/tests.yaml"), "steps: []").unwrap();
        fs::write(dir.path().join("c/other.yaml"), "steps: []").unwrap();

        let found: Vec<_> = find_tests_files(dir.path(), "tests.yaml")
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("a/deeper/tests.yaml"),
                PathBuf::from("a/tests.yaml"),
                PathBuf::from("b/tests.yaml"),
            ]
        );
    }

    #[test]
    fn test_directory_named_like_tests_file_is_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests.yaml")).unwrap();

        assert!(find_tests_files(dir.path(), "tests.yaml").is_empty());
    }
}
