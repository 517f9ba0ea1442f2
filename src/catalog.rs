//! Read-only vault commands plus category creation:
//! `categories`, `mkcat`, `list`, `search`, and `get`.

use std::path::Path;

use anyhow::{bail, Result};
use chrono::DateTime;
use composter_core::unpack::decode_files;
use composter_core::Component;

use crate::client::{VaultClient, VaultError};
use crate::config::Config;

/// `YYYY-MM-DD` for an RFC 3339 timestamp, `-` when absent or unparseable.
pub fn format_date(created_at: Option<&str>) -> String {
    created_at
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One table row per component, preceded by a header.
pub fn format_rows(components: &[Component]) -> Vec<String> {
    let mut rows = vec![format!("{:<32} {:<20} {}", "TITLE", "CATEGORY", "CREATED")];
    for c in components {
        rows.push(format!(
            "{:<32} {:<20} {}",
            c.title,
            c.category_name().unwrap_or("-"),
            format_date(c.created_at.as_deref())
        ));
    }
    rows
}

pub async fn run_categories(config: &Config) -> Result<()> {
    let client = VaultClient::from_config(&config.vault)?;
    let categories = client.list_categories().await?;
    if categories.is_empty() {
        println!("No categories yet. Create one with `composter mkcat <name>`.");
        return Ok(());
    }
    for category in categories {
        println!("{}", category.name);
    }
    Ok(())
}

pub async fn run_mkcat(config: &Config, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("category name is required");
    }
    if name.contains(char::is_whitespace) {
        bail!("category name must not contain whitespace: '{}'", name);
    }
    let client = VaultClient::from_config(&config.vault)?;
    client.create_category(name).await?;
    println!("Category '{}' created.", name);
    Ok(())
}

pub async fn run_list(config: &Config, category: Option<&str>) -> Result<()> {
    let client = VaultClient::from_config(&config.vault)?;
    let components = match category {
        Some(category) => client.list_by_category(category).await?,
        None => client.list_components().await?,
    };
    if components.is_empty() {
        match category {
            Some(category) => println!("No components in '{}'.", category),
            None => println!("No components yet."),
        }
        return Ok(());
    }
    for row in format_rows(&components) {
        println!("{}", row);
    }
    Ok(())
}

pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("search query is required");
    }
    let client = VaultClient::from_config(&config.vault)?;
    let components = client.search_components(query).await?;
    if components.is_empty() {
        println!("No components found matching '{}'.", query);
        return Ok(());
    }
    for row in format_rows(&components) {
        println!("{}", row);
    }
    Ok(())
}

/// Print one component's metadata, file listing, and dependencies.
pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let client = VaultClient::from_config(&config.vault)?;
    let component = match client.get_component(id).await {
        Ok(c) => c,
        Err(VaultError::NotFound(_)) => bail!("component not found: {}", id),
        Err(e) => return Err(e.into()),
    };

    println!("--- Component ---");
    println!("id:        {}", component.id.as_deref().unwrap_or(id));
    println!("title:     {}", component.title);
    println!("category:  {}", component.category_name().unwrap_or("-"));
    println!("created:   {}", format_date(component.created_at.as_deref()));

    if let Some(code) = &component.code {
        let (files, legacy) = decode_files(code, &component.title, Path::new(""));
        println!();
        println!(
            "--- Files ({}){} ---",
            files.len(),
            if legacy { " [legacy]" } else { "" }
        );
        for (path, content) in &files {
            println!("{:<48} {:>8} bytes", path, content.len());
        }
    }

    let deps = component.dependency_map();
    if !deps.is_empty() {
        println!();
        println!("--- Dependencies ({}) ---", deps.len());
        for (name, version) in &deps {
            println!("{:<48} {}", name, version);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use composter_core::models::CategoryRef;
    use serde_json::json;

    fn component(title: &str, category: Option<&str>, created_at: Option<&str>) -> Component {
        Component {
            id: None,
            title: title.to_string(),
            code: None,
            dependencies: json!({}),
            created_at: created_at.map(str::to_string),
            category: category.map(|name| CategoryRef {
                name: name.to_string(),
            }),
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-05-01T10:00:00.000Z")), "2024-05-01");
        assert_eq!(format_date(Some("2024-05-01T23:30:00+02:00")), "2024-05-01");
        assert_eq!(format_date(Some("yesterday")), "-");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_format_rows() {
        let rows = format_rows(&[
            component("Button", Some("ui"), Some("2024-05-01T10:00:00Z")),
            component("Orphan", None, None),
        ]);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("TITLE"));
        assert!(rows[1].starts_with("Button"));
        assert!(rows[1].contains("ui"));
        assert!(rows[1].ends_with("2024-05-01"));
        assert!(rows[2].ends_with("-"));
    }
}
