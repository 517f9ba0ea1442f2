//! Package manifest (`package.json`) reader.
//!
//! Only the `dependencies` and `devDependencies` sections are consulted.
//! A manifest that cannot be read or parsed is never an error for callers:
//! [`ManifestLoad::Unreadable`] carries the reason so the caller can warn,
//! and [`ManifestLoad::into_manifest`] degrades it to an empty manifest.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::models::{decode_dependencies, DependencyMap};

/// Default manifest filename, also used as the project root marker.
pub const MANIFEST_FILE: &str = "package.json";

/// The two dependency sections of a package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub dependencies: DependencyMap,
    pub dev_dependencies: DependencyMap,
}

/// Outcome of trying to read a manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLoad {
    /// No file at the path.
    Absent,
    /// File read and parsed.
    Loaded(PackageManifest),
    /// File exists but could not be read or parsed.
    Unreadable { path: PathBuf, reason: String },
}

impl ManifestLoad {
    /// Collapse to a manifest, treating absent and unreadable files as empty.
    pub fn into_manifest(self) -> PackageManifest {
        match self {
            ManifestLoad::Loaded(manifest) => manifest,
            ManifestLoad::Absent | ManifestLoad::Unreadable { .. } => PackageManifest::default(),
        }
    }
}

impl PackageManifest {
    /// Read the manifest at `path`.
    pub fn load(path: &Path) -> ManifestLoad {
        if !path.is_file() {
            return ManifestLoad::Absent;
        }
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                return ManifestLoad::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        };
        match Self::parse(&content) {
            Ok(manifest) => ManifestLoad::Loaded(manifest),
            Err(e) => ManifestLoad::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        }
    }

    /// Parse manifest text. Sections that are missing or not objects are empty.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let doc: Value = serde_json::from_str(content)?;
        let section = |key: &str| {
            doc.get(key)
                .filter(|v| v.is_object())
                .map(decode_dependencies)
                .unwrap_or_default()
        };
        Ok(Self {
            dependencies: section("dependencies"),
            dev_dependencies: section("devDependencies"),
        })
    }

    /// Declared version for `name`, production section first.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }

    /// True when `name` appears in either section.
    pub fn is_installed(&self, name: &str) -> bool {
        self.version_of(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_version_prefers_production_section() {
        let manifest = PackageManifest::parse(
            r#"{
                "dependencies": {"clsx": "^2.0.0"},
                "devDependencies": {"clsx": "^1.0.0", "vitest": "^1.6.0"}
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.version_of("clsx"), Some("^2.0.0"));
        assert_eq!(manifest.version_of("vitest"), Some("^1.6.0"));
        assert_eq!(manifest.version_of("react"), None);
        assert!(manifest.is_installed("vitest"));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let manifest = PackageManifest::parse(r#"{"name": "app", "dependencies": 3}"#).unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.dev_dependencies.is_empty());
    }

    #[test]
    fn test_load_absent() {
        let tmp = TempDir::new().unwrap();
        let load = PackageManifest::load(&tmp.path().join(MANIFEST_FILE));
        assert_eq!(load, ManifestLoad::Absent);
    }

    #[test]
    fn test_load_malformed_degrades_to_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let load = PackageManifest::load(&path);
        assert!(matches!(load, ManifestLoad::Unreadable { .. }));
        assert_eq!(load.into_manifest(), PackageManifest::default());
    }
}
