//! Core data models shared by the crawler, the unpacker, and the vault client.
//!
//! The two maps produced by a crawl are plain ordered maps so that their
//! JSON encoding is deterministic: crawling an unchanged tree twice yields
//! byte-identical `code` payloads.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Virtual path (always `/`-prefixed, forward slashes) to file content.
pub type VirtualFileMap = BTreeMap<String, String>;

/// External package name (possibly `@scope/name`) to version specifier.
pub type DependencyMap = BTreeMap<String, String>;

/// Version recorded for an external import the manifest does not declare.
pub const LATEST: &str = "latest";

/// Payload sent to the vault when pushing a component.
///
/// `code` holds the JSON-encoded [`VirtualFileMap`]; the vault stores it as
/// an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentBundle {
    pub title: String,
    pub category: String,
    pub code: String,
    pub dependencies: DependencyMap,
}

impl ComponentBundle {
    /// Build a bundle from crawl output, encoding `files` into `code`.
    pub fn from_files(
        title: &str,
        category: &str,
        files: &VirtualFileMap,
        dependencies: DependencyMap,
    ) -> Result<Self> {
        Ok(Self {
            title: title.to_string(),
            category: category.to_string(),
            code: serde_json::to_string(files)?,
            dependencies,
        })
    }
}

/// Category reference embedded in component records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
}

/// A category as listed by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// A component record as returned by the vault on pull, get, list, and search.
///
/// `code` is either a JSON-encoded [`VirtualFileMap`] or, for components
/// pushed before multi-file support, the raw source of a single file.
/// Listing endpoints may omit `code` entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub dependencies: serde_json::Value,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Component {
    /// Name of the owning category, when the vault included it.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Decode the `dependencies` field.
    ///
    /// Accepts an object or a string holding an encoded object. Anything
    /// else (null, malformed JSON, non-string versions) contributes nothing.
    pub fn dependency_map(&self) -> DependencyMap {
        decode_dependencies(&self.dependencies)
    }
}

/// Decode a dependency map stored either inline or as a JSON string.
pub fn decode_dependencies(value: &serde_json::Value) -> DependencyMap {
    match value {
        serde_json::Value::Object(map) => map
            .iter()
            .filter_map(|(name, version)| {
                version.as_str().map(|v| (name.clone(), v.to_string()))
            })
            .collect(),
        serde_json::Value::String(encoded) => serde_json::from_str::<serde_json::Value>(encoded)
            .ok()
            .filter(|inner| inner.is_object())
            .map(|inner| decode_dependencies(&inner))
            .unwrap_or_default(),
        _ => DependencyMap::new(),
    }
}
