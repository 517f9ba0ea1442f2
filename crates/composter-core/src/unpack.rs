//! Bundle unpacker: writes a pulled component back to disk.
//!
//! The inverse of the crawler's file collection. Each virtual path loses its
//! leading `/` and is joined onto the target directory; missing directories
//! are created and existing files are overwritten without prompting.
//!
//! Components stored before multi-file support carry raw source in `code`
//! instead of a JSON file map. Those are written as a single file named
//! after the target (when the target looks like a file path) or after the
//! component title.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::manifest::{ManifestLoad, PackageManifest, MANIFEST_FILE};
use crate::models::{Component, DependencyMap, VirtualFileMap};
use crate::vpath::to_relative_path;

/// Extension given to legacy single-file components pulled into a directory.
pub const LEGACY_EXTENSION: &str = "jsx";

/// Files written by [`unpack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackReport {
    /// Directory the files were written under.
    pub target_dir: PathBuf,
    /// Virtual paths without the leading `/`, in map order.
    pub written: Vec<String>,
    /// True when `code` was not a file map.
    pub legacy: bool,
}

/// Result of comparing a component's dependencies with a local manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyCheck {
    /// No manifest next to the caller; everything is listed as required.
    NoManifest { required: DependencyMap },
    /// Packages absent from both manifest sections.
    Missing { missing: DependencyMap },
    /// Every required package is declared.
    AllInstalled,
}

impl DependencyCheck {
    /// `npm install ...` for the missing packages, if any are missing.
    pub fn install_command(&self) -> Option<String> {
        match self {
            DependencyCheck::Missing { missing } if !missing.is_empty() => {
                let names: Vec<&str> = missing.keys().map(String::as_str).collect();
                Some(format!("npm install {}", names.join(" ")))
            }
            _ => None,
        }
    }
}

/// Decode a component's `code` into a file map.
///
/// Returns the map and whether the legacy single-file fallback was used.
pub fn decode_files(code: &str, title: &str, target: &Path) -> (VirtualFileMap, bool) {
    if let Ok(files) = serde_json::from_str::<VirtualFileMap>(code) {
        return (files, false);
    }
    let name = match (target.extension(), target.file_name()) {
        (Some(_), Some(file_name)) => file_name.to_string_lossy().into_owned(),
        _ => format!("{}.{}", title, LEGACY_EXTENSION),
    };
    let mut files = VirtualFileMap::new();
    files.insert(format!("/{}", name), code.to_string());
    (files, true)
}

/// Write `component` under `target`.
///
/// For a legacy component pulled to a file-like target (`./src/Button.js`)
/// the file lands at exactly that path.
pub fn unpack(component: &Component, target: &Path) -> Result<UnpackReport> {
    let code = match &component.code {
        Some(code) => code,
        None => bail!("component '{}' has no code", component.title),
    };
    let (files, legacy) = decode_files(code, &component.title, target);
    let dir = if legacy && target.extension().is_some() {
        target.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        target.to_path_buf()
    };
    let written = write_files(&files, &dir)?;
    Ok(UnpackReport {
        target_dir: dir,
        written,
        legacy,
    })
}

/// Write every entry of `files` under `dir`, returning the relative paths.
///
/// All virtual paths are validated before anything is written; a path that
/// would escape `dir` fails the whole operation.
pub fn write_files(files: &VirtualFileMap, dir: &Path) -> Result<Vec<String>> {
    let mut plan = Vec::with_capacity(files.len());
    for (virtual_path, content) in files {
        let Some(rel) = to_relative_path(virtual_path) else {
            bail!("refusing to write '{}': path escapes the target directory", virtual_path);
        };
        plan.push((virtual_path, rel, content));
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(plan.len());
    for (virtual_path, rel, content) in plan {
        let path = dir.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote file");
        written.push(virtual_path.trim_start_matches('/').to_string());
    }
    Ok(written)
}

/// Compare `required` against the manifest in `manifest_dir`.
///
/// An unreadable manifest counts as empty, so every package is reported
/// missing.
pub fn check_dependencies(required: &DependencyMap, manifest_dir: &Path) -> DependencyCheck {
    let manifest = match PackageManifest::load(&manifest_dir.join(MANIFEST_FILE)) {
        ManifestLoad::Absent => {
            return DependencyCheck::NoManifest {
                required: required.clone(),
            }
        }
        ManifestLoad::Unreadable { path, reason } => {
            warn!(path = %path.display(), %reason, "manifest unreadable, treating as empty");
            PackageManifest::default()
        }
        ManifestLoad::Loaded(manifest) => manifest,
    };
    let missing: DependencyMap = required
        .iter()
        .filter(|(name, _)| !manifest.is_installed(name))
        .map(|(name, version)| (name.clone(), version.clone()))
        .collect();
    if missing.is_empty() {
        DependencyCheck::AllInstalled
    } else {
        DependencyCheck::Missing { missing }
    }
}
