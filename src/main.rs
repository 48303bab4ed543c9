use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vendo::{ConfigStore, RepoRecord, SyncEngine, SystemGit, DEFAULT_BRANCH};

#[derive(Parser)]
#[command(name = "vendo")]
#[command(about = "Track and mirror external git repositories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Vendor root directory (defaults to ~/.vendor)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new repo to manage
    Add {
        /// Unique name for the repo
        name: String,

        /// Remote URL to clone from
        url: String,

        /// Git branch to track
        #[arg(long, default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Local path for the repo (default: <root>/<name>)
        #[arg(long)]
        path: Option<String>,
    },

    /// Remove a repo from management
    Remove {
        /// Name of the repo to stop tracking
        name: String,
    },

    /// Update repos (all or a specific one)
    Update {
        /// Only update the repo with this name
        name: Option<String>,
    },

    /// List configured repos
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = open_store(cli.root.as_deref())?;

    match cli.command {
        Commands::Add {
            name,
            url,
            branch,
            path,
        } => cmd_add(&store, name, url, branch, path),
        Commands::Remove { name } => cmd_remove(&store, &name),
        Commands::Update { name } => cmd_update(&store, name.as_deref()),
        Commands::List => cmd_list(&store),
    }
}

/// Initialize logging based on verbosity level. Diagnostics go to stderr so
/// command output on stdout stays clean.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Resolve the vendor root: the explicit flag wins, otherwise ~/.vendor.
fn open_store(root: Option<&str>) -> Result<ConfigStore> {
    match root {
        Some(raw) => Ok(ConfigStore::new(expand_path(raw)?)),
        None => Ok(ConfigStore::from_default_root()?),
    }
}

/// Expand `~` and environment variables in a user-supplied path.
fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("failed to expand path '{raw}'"))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn cmd_add(
    store: &ConfigStore,
    name: String,
    url: String,
    branch: String,
    path: Option<String>,
) -> Result<()> {
    let path = path.as_deref().map(expand_path).transpose()?;

    let mut registry = store.load()?;
    let record = RepoRecord::new(name, url, Some(branch), path, store.root());
    let name = record.name.clone();
    registry.add(record)?;
    store.save(&registry)?;

    println!("✓ Added repo '{name}' to config");
    Ok(())
}

fn cmd_remove(store: &ConfigStore, name: &str) -> Result<()> {
    let mut registry = store.load()?;
    registry.remove(name)?;
    store.save(&registry)?;

    println!("✓ Removed repo '{name}' from config");
    Ok(())
}

fn cmd_update(store: &ConfigStore, name: Option<&str>) -> Result<()> {
    let registry = store.load()?;
    if registry.is_empty() {
        println!("No repos configured");
        return Ok(());
    }

    // Per-repo failures are reported by the engine and do not affect the
    // exit code; only load failures and an unknown explicit name do.
    let engine = SyncEngine::new(SystemGit);
    engine.sync(&registry, name)?;
    Ok(())
}

fn cmd_list(store: &ConfigStore) -> Result<()> {
    let registry = store.load()?;
    if registry.is_empty() {
        println!("No repos configured");
        return Ok(());
    }

    println!("Configured repos:");
    for repo in registry.iter() {
        println!(
            "  {} ({}) - {} [{}]",
            repo.name,
            repo.status_label(),
            repo.url,
            repo.branch
        );
    }
    Ok(())
}
