//! Project root locator.
//!
//! Virtual paths are made relative to the nearest ancestor directory that
//! holds a manifest marker file, so that a component pushed from
//! `app/frontend/src/Button.jsx` is stored as `/src/Button.jsx` rather than
//! carrying the caller's checkout layout.

use std::path::{Path, PathBuf};

/// Walk upward from `start_dir` and return the first directory containing
/// `marker`.
///
/// The filesystem root itself is not probed. When no ancestor has the
/// marker, `start_dir` is returned unchanged and every discovered file is
/// placed relative to the entry file's own directory.
pub fn locate_root(start_dir: &Path, marker: &str) -> PathBuf {
    let mut current = start_dir;
    while let Some(parent) = current.parent() {
        if current.join(marker).is_file() {
            return current.to_path_buf();
        }
        current = parent;
    }
    start_dir.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_marker_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("frontend");
        let deep = project.join("src").join("components");
        fs::create_dir_all(&deep).unwrap();
        fs::write(project.join(MANIFEST_FILE), "{}").unwrap();

        assert_eq!(locate_root(&deep, MANIFEST_FILE), project);
    }

    #[test]
    fn test_nearest_marker_wins() {
        let tmp = TempDir::new().unwrap();
        let outer = tmp.path().join("mono");
        let inner = outer.join("packages").join("ui");
        fs::create_dir_all(inner.join("src")).unwrap();
        fs::write(outer.join(MANIFEST_FILE), "{}").unwrap();
        fs::write(inner.join(MANIFEST_FILE), "{}").unwrap();

        assert_eq!(locate_root(&inner.join("src"), MANIFEST_FILE), inner);
    }

    #[test]
    fn test_start_dir_with_marker_is_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "{}").unwrap();
        assert_eq!(locate_root(tmp.path(), MANIFEST_FILE), tmp.path());
    }

    #[test]
    fn test_falls_back_to_start_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("loose");
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(locate_root(&dir, "composter-marker-that-does-not-exist.json"), dir);
    }

    #[test]
    fn test_marker_directory_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a");
        fs::create_dir_all(dir.join("package.json")).unwrap();
        let start = dir.join("b");
        fs::create_dir_all(&start).unwrap();

        assert_ne!(locate_root(&start, "package.json"), dir);
    }
}
