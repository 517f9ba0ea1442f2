//! Mapping between filesystem paths and virtual paths.
//!
//! A virtual path is the key of a [`VirtualFileMap`](crate::VirtualFileMap):
//! `/`-prefixed, `/`-separated, relative to the project root. Files outside
//! the root have their leading `..` segments replaced by a single synthetic
//! directory (`_external` by default) so that no key ever contains `..`.

use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

/// Directory name that replaces leading `..` segments.
pub const DEFAULT_EXTERNAL_PREFIX: &str = "_external";

/// Virtual path of `file` relative to `root`.
///
/// Both paths are expected to be absolute and canonical; the comparison is
/// purely lexical.
pub fn virtual_path(root: &Path, file: &Path, external_prefix: &str) -> String {
    let parts = relative_parts(root, file);
    let ups = parts.iter().take_while(|p| *p == "..").count();
    if ups == 0 {
        format!("/{}", parts.join("/"))
    } else {
        format!("/{}/{}", external_prefix, parts[ups..].join("/"))
    }
}

/// True when `virtual_path` sits under the external prefix.
pub fn is_external(virtual_path: &str, external_prefix: &str) -> bool {
    virtual_path
        .strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(external_prefix))
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Rewrite an external virtual path to include a short hash of the file's
/// parent directory: `/_external/Button.jsx` becomes
/// `/_external/1a2b3c4d/Button.jsx`.
pub fn disambiguate(virtual_path: &str, file: &Path, external_prefix: &str) -> String {
    let parent = file.parent().unwrap_or(file);
    let mut hasher = Sha256::new();
    hasher.update(parent.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    let rest = virtual_path
        .strip_prefix('/')
        .and_then(|r| r.strip_prefix(external_prefix))
        .unwrap_or(virtual_path)
        .trim_start_matches('/');
    format!("/{}/{}/{}", external_prefix, &digest[..8], rest)
}

/// Relative filesystem path for a virtual path, or `None` if the virtual
/// path would leave the directory it is joined onto.
///
/// Empty and `.` segments are dropped; `..`, drive prefixes, and other
/// non-plain segments are rejected.
pub fn to_relative_path(virtual_path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for segment in virtual_path.split(['/', '\\']) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => out.push(name),
            _ => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn relative_parts(root: &Path, file: &Path) -> Vec<String> {
    let root: Vec<Component> = root.components().collect();
    let file: Vec<Component> = file.components().collect();
    let common = root
        .iter()
        .zip(file.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat("..".to_string())
        .take(root.len() - common)
        .collect();
    parts.extend(
        file[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXT: &str = DEFAULT_EXTERNAL_PREFIX;

    #[test]
    fn test_inside_root() {
        assert_eq!(
            virtual_path(Path::new("/w/app"), Path::new("/w/app/src/Button.jsx"), EXT),
            "/src/Button.jsx"
        );
    }

    #[test]
    fn test_outside_root_rewritten() {
        let vp = virtual_path(Path::new("/w/app"), Path::new("/w/shared/lib/cn.ts"), EXT);
        assert_eq!(vp, "/_external/shared/lib/cn.ts");
        assert!(!vp.contains("../"));

        let vp = virtual_path(Path::new("/w/app/web"), Path::new("/w/x.ts"), EXT);
        assert_eq!(vp, "/_external/x.ts");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("/_external/x.ts", EXT));
        assert!(!is_external("/_externalish/x.ts", EXT));
        assert!(!is_external("/src/_external/x.ts", EXT));
    }

    #[test]
    fn test_disambiguate_is_stable_and_distinct() {
        let a = disambiguate("/_external/Button.jsx", Path::new("/a/Button.jsx"), EXT);
        let b = disambiguate("/_external/Button.jsx", Path::new("/b/Button.jsx"), EXT);
        assert_ne!(a, b);
        assert_eq!(
            a,
            disambiguate("/_external/Button.jsx", Path::new("/a/Button.jsx"), EXT)
        );
        assert!(a.starts_with("/_external/"));
        assert!(a.ends_with("/Button.jsx"));
        assert_eq!(a.split('/').count(), 4);
    }

    #[test]
    fn test_to_relative_path() {
        assert_eq!(
            to_relative_path("/ui/Button.tsx"),
            Some(PathBuf::from("ui").join("Button.tsx"))
        );
        assert_eq!(to_relative_path("Button.tsx"), Some(PathBuf::from("Button.tsx")));
        assert_eq!(
            to_relative_path("/./ui//Icon.tsx"),
            Some(PathBuf::from("ui").join("Icon.tsx"))
        );
        assert_eq!(to_relative_path("/../etc/passwd"), None);
        assert_eq!(to_relative_path("/ui/../../x"), None);
        assert_eq!(to_relative_path("/"), None);
    }
}
