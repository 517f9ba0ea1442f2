//! # Composter CLI (`composter`)
//!
//! ## Usage
//!
//! ```bash
//! composter --config ./composter.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `composter scan <file>` | Show what a push of `<file>` would bundle |
//! | `composter push <category> <title> <file>` | Bundle a component and store it |
//! | `composter pull <category> <title> <target>` | Fetch a component into `<target>` |
//! | `composter categories` | List your categories |
//! | `composter mkcat <name>` | Create a category |
//! | `composter list [--category <name>]` | List components |
//! | `composter search <query>` | Search components by title |
//! | `composter get <id>` | Show one component |
//!
//! ## Examples
//!
//! ```bash
//! # Store a button and everything it imports locally
//! composter push ui "Fancy Button" ./src/components/Button.jsx
//!
//! # Recreate it in another project
//! composter pull ui "Fancy Button" ./src/components/fancy
//!
//! # Point at a local vault
//! COMPOSTER_BASE_URL=http://localhost:3000/api composter list
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use composter::{catalog, config, pull, push};
use tracing_subscriber::EnvFilter;

/// Composter: a vault for React components and their local dependencies.
///
/// Logging goes to stderr and is controlled with `RUST_LOG`
/// (default `warn`).
#[derive(Parser)]
#[command(name = "composter", version, about = "Push and pull React components with their local dependencies")]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Optional. Built-in defaults are used when the file does not exist.
    #[arg(long, global = true, default_value = "./composter.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl an entry file and print the bundle without uploading it.
    Scan {
        /// Entry file of the component.
        file: PathBuf,

        /// Print the file map and dependency map as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Bundle a component and its local imports and store it in the vault.
    Push {
        /// Category to store the component under.
        category: String,
        /// Component title, unique within the category.
        title: String,
        /// Entry file of the component.
        file: PathBuf,
    },

    /// Fetch a component and write its files under a target directory.
    ///
    /// Afterwards the component's packages are checked against the
    /// package.json in the manifest directory.
    Pull {
        category: String,
        title: String,
        /// Output directory (or file path, for single-file components).
        target: PathBuf,

        /// Directory holding the package.json to check dependencies against.
        #[arg(long, default_value = ".")]
        manifest_dir: PathBuf,
    },

    /// List categories.
    Categories,

    /// Create a category.
    Mkcat {
        /// Category name (no whitespace).
        name: String,
    },

    /// List components, optionally restricted to one category.
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// Search components by title.
    Search { query: String },

    /// Show a component by id.
    Get { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_minimal(&cli.config)?;

    match cli.command {
        Commands::Scan { file, json } => {
            push::run_scan(&cfg, &file, json)?;
        }
        Commands::Push {
            category,
            title,
            file,
        } => {
            push::run_push(&cfg, &category, &title, &file).await?;
        }
        Commands::Pull {
            category,
            title,
            target,
            manifest_dir,
        } => {
            pull::run_pull(&cfg, &category, &title, &target, &manifest_dir).await?;
        }
        Commands::Categories => {
            catalog::run_categories(&cfg).await?;
        }
        Commands::Mkcat { name } => {
            catalog::run_mkcat(&cfg, &name).await?;
        }
        Commands::List { category } => {
            catalog::run_list(&cfg, category.as_deref()).await?;
        }
        Commands::Search { query } => {
            catalog::run_search(&cfg, &query).await?;
        }
        Commands::Get { id } => {
            catalog::run_get(&cfg, &id).await?;
        }
    }

    Ok(())
}
