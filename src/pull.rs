//! `composter pull`: fetch a component from the vault and write it out.
//!
//! After the files land, the component's declared packages are compared
//! with the manifest in the manifest directory (the current directory
//! unless `--manifest-dir` is given) and the user is told what to install.

use std::path::Path;

use anyhow::{bail, Result};
use composter_core::{check_dependencies, unpack, Component, DependencyCheck, UnpackReport};

use crate::client::{VaultClient, VaultError};
use crate::config::Config;
use crate::push::absolutize;

/// Fetch `(category, title)` and unpack it under `target`.
pub async fn pull_component(
    client: &VaultClient,
    category: &str,
    title: &str,
    target: &Path,
) -> Result<(Component, UnpackReport)> {
    if category.trim().is_empty() || title.trim().is_empty() || target.as_os_str().is_empty() {
        bail!("category, title, and target path are required");
    }
    let component = match client.pull_component(category, title).await {
        Ok(component) => component,
        Err(VaultError::NotFound(_)) => {
            bail!("Component '{}' not found in category '{}'", title, category)
        }
        Err(e) => return Err(e.into()),
    };
    let target = absolutize(target)?;
    let report = unpack(&component, &target)?;
    Ok((component, report))
}

/// CLI entry point for `composter pull`.
pub async fn run_pull(
    config: &Config,
    category: &str,
    title: &str,
    target: &Path,
    manifest_dir: &Path,
) -> Result<()> {
    println!("Fetching '{}' from '{}'...", title, category);
    let client = VaultClient::from_config(&config.vault)?;
    let (component, report) = pull_component(&client, category, title, target).await?;

    if report.legacy {
        println!("Legacy single-file component.");
    }
    println!(
        "Unpacked {} file(s) into {}",
        report.written.len(),
        report.target_dir.display()
    );
    for rel in &report.written {
        println!("  + {}", rel);
    }

    let required = component.dependency_map();
    if !required.is_empty() {
        let check = check_dependencies(&required, &absolutize(manifest_dir)?);
        println!();
        print_dependency_check(&check);
    }

    println!();
    println!("Component '{}' pulled successfully.", title);
    Ok(())
}

fn print_dependency_check(check: &DependencyCheck) {
    match check {
        DependencyCheck::NoManifest { required } => {
            println!("No package.json found. This component requires:");
            for (name, version) in required {
                println!("  - {}@{}", name, version);
            }
        }
        DependencyCheck::Missing { .. } => {
            println!("Missing dependencies. Run:");
            if let Some(cmd) = check.install_command() {
                println!("  {}", cmd);
            }
        }
        DependencyCheck::AllInstalled => {
            println!("All dependencies are already installed.");
        }
    }
}
