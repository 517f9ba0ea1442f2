//! Import classification and local path resolution.
//!
//! Every specifier found by the scanner falls into one of three kinds:
//!
//! | Specifier | Kind | Resolved against |
//! |-----------|------|------------------|
//! | `./Icon`, `../lib/cn` | [`ImportKind::Relative`] | the importing file's directory |
//! | `@/components/ui/button` | [`ImportKind::Alias`] | `<root>/<alias_dir>` |
//! | `react`, `@radix-ui/react-slot/dist` | [`ImportKind::External`] | not resolved; package name only |
//!
//! Local resolution tries, in order: the literal path as a regular file,
//! the path with each extension appended, then `index<ext>` inside the
//! path for each extension. The first existing file wins. Extensions are
//! appended to the lexically normalized path, so `..` tries `<parent>.tsx`.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Extensions tried when an import omits one, in priority order.
pub const DEFAULT_EXTENSIONS: [&str; 5] = [".tsx", ".ts", ".jsx", ".js", ".css"];

/// Prefix marking an alias import.
pub const DEFAULT_ALIAS_PREFIX: &str = "@/";

/// Directory under the project root that alias imports point into.
pub const DEFAULT_ALIAS_DIR: &str = "src";

/// How an import specifier is handled by the crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind<'a> {
    /// Dot-prefixed path, relative to the importing file.
    Relative(&'a str),
    /// Path after the alias prefix, relative to the alias directory.
    Alias(&'a str),
    /// Package name of a bare import.
    External(&'a str),
}

/// Classify `spec` given the alias prefix in use.
pub fn classify<'a>(spec: &'a str, alias_prefix: &str) -> ImportKind<'a> {
    if spec.starts_with('.') {
        ImportKind::Relative(spec)
    } else if let Some(rest) = spec.strip_prefix(alias_prefix) {
        ImportKind::Alias(rest)
    } else {
        ImportKind::External(package_name(spec))
    }
}

/// Package name of a bare import: `@scope/name` for scoped packages,
/// otherwise the first path segment.
pub fn package_name(spec: &str) -> &str {
    if spec.starts_with('@') {
        // End of the second segment, or the whole string when there is none.
        let end = spec
            .match_indices('/')
            .nth(1)
            .map(|(i, _)| i)
            .unwrap_or(spec.len());
        &spec[..end]
    } else {
        spec.split('/').next().unwrap_or(spec)
    }
}

/// Resolves local import specifiers to files on disk.
#[derive(Debug, Clone)]
pub struct Resolver {
    extensions: Vec<String>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

impl Resolver {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Resolve `spec` against `dir`, returning the first candidate that is
    /// an existing regular file.
    pub fn resolve(&self, dir: &Path, spec: &str) -> Option<PathBuf> {
        self.candidates(dir, spec).into_iter().find(|c| c.is_file())
    }

    /// All candidate paths for `spec` in the order they are tried.
    pub fn candidates(&self, dir: &Path, spec: &str) -> Vec<PathBuf> {
        let base = dir.join(spec);
        let stem = normalize(&base);
        let mut out = Vec::with_capacity(1 + 2 * self.extensions.len());
        out.push(base.clone());
        for ext in &self.extensions {
            out.push(append_suffix(&stem, ext));
        }
        for ext in &self.extensions {
            out.push(base.join(format!("index{ext}")));
        }
        out
    }
}

/// Drop `.` components and fold `..` into its parent, without touching
/// the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("./Icon", "@/"), ImportKind::Relative("./Icon"));
        assert_eq!(classify("../lib", "@/"), ImportKind::Relative("../lib"));
        assert_eq!(
            classify("@/components/ui/button", "@/"),
            ImportKind::Alias("components/ui/button")
        );
        assert_eq!(classify("react-dom/client", "@/"), ImportKind::External("react-dom"));
        assert_eq!(
            classify("@radix-ui/react-slot", "@/"),
            ImportKind::External("@radix-ui/react-slot")
        );
    }

    #[test]
    fn test_custom_alias_prefix() {
        assert_eq!(classify("~/lib/cn", "~/"), ImportKind::Alias("lib/cn"));
        assert_eq!(classify("@/lib/cn", "~/"), ImportKind::External("@/lib"));
    }

    #[test]
    fn test_scoped_package_name_uses_two_segments() {
        assert_eq!(package_name("@radix-ui/react-slot"), "@radix-ui/react-slot");
        assert_eq!(package_name("@radix-ui/react-slot/dist/index.js"), "@radix-ui/react-slot");
        assert_eq!(package_name("@scope"), "@scope");
        assert_eq!(package_name("lodash/debounce"), "lodash");
        assert_eq!(package_name("clsx"), "clsx");
    }

    #[test]
    fn test_exact_match_preferred() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Button.jsx"));
        touch(&tmp.path().join("Button.jsx.tsx"));

        let r = Resolver::default();
        assert_eq!(
            r.resolve(tmp.path(), "./Button.jsx"),
            Some(tmp.path().join("./Button.jsx"))
        );
    }

    #[test]
    fn test_extension_order() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Button.jsx"));
        touch(&tmp.path().join("Button.ts"));

        let r = Resolver::default();
        assert_eq!(
            r.resolve(tmp.path(), "./Button"),
            Some(tmp.path().join("./Button.ts"))
        );

        touch(&tmp.path().join("Button.tsx"));
        assert_eq!(
            r.resolve(tmp.path(), "./Button"),
            Some(tmp.path().join("./Button.tsx"))
        );
    }

    #[test]
    fn test_index_fallback() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("icons").join("index.js"));

        let r = Resolver::default();
        assert_eq!(
            r.resolve(tmp.path(), "./icons"),
            Some(tmp.path().join("./icons").join("index.js"))
        );
    }

    #[test]
    fn test_sibling_file_beats_index() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("icons").join("index.tsx"));
        touch(&tmp.path().join("icons.css"));

        let r = Resolver::default();
        assert_eq!(
            r.resolve(tmp.path(), "./icons"),
            Some(tmp.path().join("./icons.css"))
        );
    }

    #[test]
    fn test_unresolvable() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(Resolver::default().resolve(tmp.path(), "./Missing"), None);
    }

    #[test]
    fn test_candidate_order() {
        let r = Resolver::new(vec![".ts".into(), ".css".into()]);
        let c = r.candidates(Path::new("/p"), "./a");
        let shown: Vec<String> = c.iter().map(|p| p.display().to_string()).collect();
        assert_eq!(
            shown,
            vec!["/p/./a", "/p/a.ts", "/p/a.css", "/p/./a/index.ts", "/p/./a/index.css"]
        );

        let r = Resolver::new(vec![".js".into()]);
        let shown: Vec<String> = r
            .candidates(Path::new("/p/src/ui"), "..")
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(shown, vec!["/p/src/ui/..", "/p/src.js", "/p/src/ui/../index.js"]);
    }

    #[test]
    fn test_bare_dot_imports_try_directory_as_file_stem() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("src/ui");
        fs::create_dir_all(&dir).unwrap();
        touch(&tmp.path().join("src.js"));
        touch(&tmp.path().join("src/ui.tsx"));

        let r = Resolver::default();
        assert_eq!(r.resolve(&dir, ".."), Some(tmp.path().join("src.js")));
        assert_eq!(r.resolve(&dir, "."), Some(tmp.path().join("src/ui.tsx")));
    }

    #[test]
    fn test_bare_parent_prefers_index_only_after_stem() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("src/ui");
        fs::create_dir_all(&dir).unwrap();
        touch(&tmp.path().join("src/index.ts"));

        let r = Resolver::default();
        assert_eq!(
            r.resolve(&dir, ".."),
            Some(dir.join("..").join("index.ts"))
        );
    }
}
