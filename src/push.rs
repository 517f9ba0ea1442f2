//! `composter push` and `composter scan`.
//!
//! Both crawl an entry file locally. `scan` only prints what would be
//! bundled; `push` sends the bundle to the vault.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use composter_core::{ComponentBundle, CrawlReport, CrawlWarning, Crawler};
use serde_json::json;

use crate::client::VaultClient;
use crate::config::Config;

/// Absolute form of `path`, relative paths taken from the current directory.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("Failed to read current directory")?
            .join(path))
    }
}

/// Crawl `file` with the configured resolution policy.
pub fn crawl_entry(config: &Config, file: &Path) -> Result<CrawlReport> {
    let entry = absolutize(file)?;
    if !entry.is_file() {
        bail!("File not found: {}", entry.display());
    }
    Crawler::new(config.crawl.to_options()).crawl(&entry)
}

/// Validate arguments and crawl, producing the payload for the vault.
pub fn prepare_bundle(
    config: &Config,
    category: &str,
    title: &str,
    file: &Path,
) -> Result<(ComponentBundle, CrawlReport)> {
    if category.trim().is_empty() || title.trim().is_empty() || file.as_os_str().is_empty() {
        bail!("category, title, and file path are required");
    }
    let report = crawl_entry(config, file)?;
    let bundle = ComponentBundle::from_files(
        title,
        category,
        &report.files,
        report.dependencies.clone(),
    )?;
    Ok((bundle, report))
}

/// CLI entry point for `composter push`.
pub async fn run_push(config: &Config, category: &str, title: &str, file: &Path) -> Result<()> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    println!("Scanning {} and its dependencies...", name);

    let (bundle, report) = prepare_bundle(config, category, title, file)?;
    println!("{}", bundle_summary(&report));
    print_warnings(&report);

    let client = VaultClient::from_config(&config.vault)?;
    client
        .push_component(&bundle)
        .await
        .with_context(|| format!("Failed to push '{}' to '{}'", title, category))?;
    println!("Component '{}' pushed to '{}'.", title, category);
    Ok(())
}

/// One-line summary of what a push will upload.
pub fn bundle_summary(report: &CrawlReport) -> String {
    format!(
        "Bundled {} file(s) and detected {} external package(s).",
        report.files.len(),
        report.dependencies.len()
    )
}

/// CLI entry point for `composter scan`.
pub fn run_scan(config: &Config, file: &Path, as_json: bool) -> Result<()> {
    let report = crawl_entry(config, file)?;

    if as_json {
        let out = json!({
            "files": report.files,
            "dependencies": report.dependencies,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("root: {}", report.root.display());
    println!();
    println!("--- Files ({}) ---", report.files.len());
    for (path, content) in &report.files {
        println!("{:<48} {:>8} bytes", path, content.len());
    }
    println!();
    println!("--- Dependencies ({}) ---", report.dependencies.len());
    for (name, version) in &report.dependencies {
        println!("{:<48} {}", name, version);
    }
    print_warnings(&report);
    Ok(())
}

/// Print the warnings a user can act on. Unresolved imports are left to
/// the debug log.
fn print_warnings(report: &CrawlReport) {
    let shown: Vec<&CrawlWarning> = report
        .warnings
        .iter()
        .filter(|w| !matches!(w, CrawlWarning::UnresolvedImport { .. }))
        .collect();
    if shown.is_empty() {
        return;
    }
    println!();
    println!("Warnings:");
    for warning in shown {
        println!("  - {}", warning);
    }
}
