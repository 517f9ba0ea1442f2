//! Import specifier scanning.
//!
//! The crawler only needs the quoted module specifiers of static
//! `import` / `export ... from` statements. [`ImportScanner`] isolates that
//! step so a syntax-aware implementation can replace the textual one
//! without touching the traversal.

use once_cell::sync::Lazy;
use regex::Regex;

/// Captures the specifier of `import x from "m"`, `import "m"`,
/// `export { a } from "m"` and `export * from "m"`.
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import|export)\s+(?:[\w*\s{},]*\s+from\s+)?['"]([^'"]+)['"]"#)
        .unwrap_or_else(|e| panic!("import regex: {e}"))
});

/// Extracts module specifiers from source text.
pub trait ImportScanner: Send + Sync {
    /// Return every specifier in source order. Duplicates are kept.
    fn scan(&self, source: &str) -> Vec<String>;
}

/// Textual scanner over `import` / `export` statements.
///
/// This is a pattern match, not a parse. Import-shaped text inside comments
/// or string literals is reported as if it were code, and dynamic
/// `import("m")` or `require("m")` calls are not reported at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexImportScanner;

impl ImportScanner for RegexImportScanner {
    fn scan(&self, source: &str) -> Vec<String> {
        IMPORT_RE
            .captures_iter(source)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
