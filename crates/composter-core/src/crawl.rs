//! Local dependency crawler.
//!
//! Given an entry source file, discovers every same-project file it
//! transitively imports and every external package it references, without
//! executing anything.
//!
//! # Algorithm
//!
//! 1. Canonicalize the entry path and locate the project root (nearest
//!    ancestor holding the manifest file).
//! 2. Load the manifest once; it supplies versions for external packages.
//! 3. Breadth-first walk from the entry file. For each dequeued path:
//!    - skip it if already visited;
//!    - if it is not a file, record [`CrawlWarning::MissingFile`] and drop it;
//!    - otherwise read it, mark it visited, store it under its virtual path,
//!      and scan it for import specifiers.
//! 4. Each specifier is classified ([`classify`]):
//!    relative and alias imports are resolved to files and enqueued,
//!    external imports are recorded in the dependency map.
//! 5. The walk ends when the queue is empty.
//!
//! Cycles terminate because the visited set is keyed by canonical path.
//! Unresolvable local imports are dropped from the graph and recorded as
//! [`CrawlWarning::UnresolvedImport`]; they never fail the crawl. They are
//! deliberately quiet: logged at `debug`, not `warn`, so a caller that
//! wants to surface them must read [`CrawlReport::warnings`].
//!
//! Files that are not valid UTF-8 are decoded lossily (invalid bytes become
//! U+FFFD) and flagged with [`CrawlWarning::LossyDecode`].
//!
//! # Example
//!
//! ```rust,no_run
//! use composter_core::crawl::{CrawlOptions, Crawler};
//!
//! let report = Crawler::new(CrawlOptions::default())
//!     .crawl("/work/app/src/Button.jsx".as_ref())
//!     .unwrap();
//! for (path, _content) in &report.files {
//!     println!("{path}");
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::manifest::{ManifestLoad, PackageManifest, MANIFEST_FILE};
use crate::models::{ComponentBundle, DependencyMap, VirtualFileMap, LATEST};
use crate::resolve::{
    classify, ImportKind, Resolver, DEFAULT_ALIAS_DIR, DEFAULT_ALIAS_PREFIX, DEFAULT_EXTENSIONS,
};
use crate::root::locate_root;
use crate::scan::{ImportScanner, RegexImportScanner};
use crate::vpath::{disambiguate, virtual_path, DEFAULT_EXTERNAL_PREFIX};

/// Resolution policy for a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Manifest filename; also the project root marker.
    pub manifest_file: String,
    /// Prefix of alias imports (`@/`).
    pub alias_prefix: String,
    /// Directory under the root that alias imports resolve into (`src`).
    pub alias_dir: String,
    /// Extensions tried for extensionless imports, in priority order.
    pub extensions: Vec<String>,
    /// Directory name substituted for leading `..` in virtual paths.
    pub external_prefix: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            manifest_file: MANIFEST_FILE.to_string(),
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            alias_dir: DEFAULT_ALIAS_DIR.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            external_prefix: DEFAULT_EXTERNAL_PREFIX.to_string(),
        }
    }
}

/// A non-fatal anomaly encountered during a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlWarning {
    /// A queued path (the entry file included) does not exist.
    MissingFile { path: PathBuf },
    /// A relative or alias import matched no candidate file.
    UnresolvedImport { importer: String, specifier: String },
    /// The manifest exists but could not be read; versions default to `latest`.
    ManifestUnreadable { path: PathBuf, reason: String },
    /// An external file was renamed because its virtual path was taken.
    ExternalCollision { virtual_path: String, path: PathBuf },
    /// A file was not valid UTF-8; invalid bytes were replaced.
    LossyDecode { path: PathBuf },
}

impl fmt::Display for CrawlWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlWarning::MissingFile { path } => {
                write!(f, "file not found: {}", path.display())
            }
            CrawlWarning::UnresolvedImport {
                importer,
                specifier,
            } => write!(f, "unresolved import '{}' in {}", specifier, importer),
            CrawlWarning::ManifestUnreadable { path, reason } => {
                write!(f, "could not read {}: {}", path.display(), reason)
            }
            CrawlWarning::ExternalCollision { virtual_path, path } => write!(
                f,
                "{} stored as {} to avoid a name collision",
                path.display(),
                virtual_path
            ),
            CrawlWarning::LossyDecode { path } => {
                write!(f, "{} is not valid UTF-8, invalid bytes replaced", path.display())
            }
        }
    }
}

/// Output of one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Project root the virtual paths are relative to.
    pub root: PathBuf,
    pub files: VirtualFileMap,
    pub dependencies: DependencyMap,
    pub warnings: Vec<CrawlWarning>,
}

impl CrawlReport {
    /// True when the crawl completed without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Package the crawl output for the vault.
    pub fn into_bundle(self, title: &str, category: &str) -> Result<ComponentBundle> {
        ComponentBundle::from_files(title, category, &self.files, self.dependencies)
    }
}

/// Breadth-first dependency crawler.
pub struct Crawler {
    options: CrawlOptions,
    resolver: Resolver,
    scanner: Box<dyn ImportScanner>,
}

impl Crawler {
    /// Crawler using the textual import scanner.
    pub fn new(options: CrawlOptions) -> Self {
        Self::with_scanner(options, Box::new(RegexImportScanner))
    }

    /// Crawler using a caller-supplied import scanner.
    pub fn with_scanner(options: CrawlOptions, scanner: Box<dyn ImportScanner>) -> Self {
        let resolver = Resolver::new(options.extensions.clone());
        Self {
            options,
            resolver,
            scanner,
        }
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Crawl from `entry`. Relative entries are taken from the current
    /// directory.
    ///
    /// Fails only when a file that exists cannot be read (permissions,
    /// I/O errors).
    pub fn crawl(&self, entry: &Path) -> Result<CrawlReport> {
        let entry = if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to read current directory")?
                .join(entry)
        };
        let entry = canonical_or_self(&entry);
        let start_dir = entry
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| entry.clone());
        let root = locate_root(&start_dir, &self.options.manifest_file);
        let alias_root = root.join(&self.options.alias_dir);

        let mut walk = Traversal::new(root.clone());
        let manifest = self.load_manifest(&root, &mut walk);

        walk.enqueue(entry);
        while let Some(path) = walk.queue.pop_front() {
            if walk.visited.contains(&path) {
                continue;
            }
            if !path.is_file() {
                warn!(path = %path.display(), "file not found, skipping");
                walk.warnings.push(CrawlWarning::MissingFile { path });
                continue;
            }

            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let content = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), "not valid UTF-8, decoding lossily");
                    walk.warnings
                        .push(CrawlWarning::LossyDecode { path: path.clone() });
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            walk.visited.insert(path.clone());

            let vpath = walk.assign_virtual_path(&path, &self.options.external_prefix);
            let specifiers = self.scanner.scan(&content);
            walk.files.insert(vpath.clone(), content);

            let dir = path.parent().unwrap_or(&root).to_path_buf();
            for spec in &specifiers {
                match classify(spec, &self.options.alias_prefix) {
                    ImportKind::Relative(rel) => self.follow(&mut walk, &dir, rel, &vpath, spec),
                    ImportKind::Alias(rest) => {
                        self.follow(&mut walk, &alias_root, rest, &vpath, spec)
                    }
                    ImportKind::External(name) => {
                        let version = manifest.version_of(name).unwrap_or(LATEST);
                        walk.dependencies
                            .insert(name.to_string(), version.to_string());
                    }
                }
            }
        }

        debug!(
            root = %root.display(),
            files = walk.files.len(),
            dependencies = walk.dependencies.len(),
            warnings = walk.warnings.len(),
            "crawl complete"
        );
        Ok(walk.finish())
    }

    fn load_manifest(&self, root: &Path, walk: &mut Traversal) -> PackageManifest {
        match PackageManifest::load(&root.join(&self.options.manifest_file)) {
            ManifestLoad::Loaded(manifest) => manifest,
            ManifestLoad::Absent => PackageManifest::default(),
            ManifestLoad::Unreadable { path, reason } => {
                warn!(path = %path.display(), %reason, "manifest unreadable, versions default to latest");
                walk.warnings
                    .push(CrawlWarning::ManifestUnreadable { path, reason });
                PackageManifest::default()
            }
        }
    }

    /// Resolve a local import and enqueue the target, or record it as
    /// unresolved.
    fn follow(&self, walk: &mut Traversal, base: &Path, spec: &str, importer: &str, raw: &str) {
        match self.resolver.resolve(base, spec) {
            Some(target) => walk.enqueue(canonical_or_self(&target)),
            None => {
                debug!(importer, specifier = raw, "unresolved local import dropped");
                walk.warnings.push(CrawlWarning::UnresolvedImport {
                    importer: importer.to_string(),
                    specifier: raw.to_string(),
                });
            }
        }
    }
}

/// Mutable state of one crawl. Never shared between crawls.
struct Traversal {
    root: PathBuf,
    queue: VecDeque<PathBuf>,
    visited: HashSet<PathBuf>,
    files: VirtualFileMap,
    dependencies: DependencyMap,
    /// Which file each virtual path was assigned to.
    owners: HashMap<String, PathBuf>,
    warnings: Vec<CrawlWarning>,
}

impl Traversal {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            files: VirtualFileMap::new(),
            dependencies: DependencyMap::new(),
            owners: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    fn enqueue(&mut self, path: PathBuf) {
        if !self.visited.contains(&path) {
            self.queue.push_back(path);
        }
    }

    /// Virtual path for `path`, disambiguated if another file already owns it.
    ///
    /// Distinct canonical paths under the root map to distinct virtual
    /// paths, so a collision always involves the external prefix.
    fn assign_virtual_path(&mut self, path: &Path, external_prefix: &str) -> String {
        let vpath = virtual_path(&self.root, path, external_prefix);
        let taken = self
            .owners
            .get(&vpath)
            .is_some_and(|owner| owner.as_path() != path);
        let vpath = if taken {
            let renamed = disambiguate(&vpath, path, external_prefix);
            warn!(path = %path.display(), from = %vpath, to = %renamed, "virtual path collision");
            self.warnings.push(CrawlWarning::ExternalCollision {
                virtual_path: renamed.clone(),
                path: path.to_path_buf(),
            });
            renamed
        } else {
            vpath
        };
        self.owners.insert(vpath.clone(), path.to_path_buf());
        vpath
    }

    fn finish(self) -> CrawlReport {
        CrawlReport {
            root: self.root,
            files: self.files,
            dependencies: self.dependencies,
            warnings: self.warnings,
        }
    }
}

fn canonical_or_self(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
