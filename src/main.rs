use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemekeeper::{
    Config, GitClient, HealthCheck, Layout, Manifest, PullOutcome, SyncEngine, SyncOutcome,
};

#[derive(Parser)]
#[command(name = "schemekeeper")]
#[command(about = "Colorscheme collection manager for Vim")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Collection root (overrides the configured value)
    #[arg(short, long)]
    root: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone new repositories and update existing ones (default)
    Pull,

    /// Copy colorscheme files into the unified plugin tree
    Sync,

    /// Remove the generated destination trees (keeps the repos cache)
    Clean,

    /// Check the environment and collection health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    info!("Starting schemekeeper v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = load_config(cli.config)?;
    if let Some(root) = cli.root {
        config.root = root;
        config.expand_paths()?;
    }

    // Execute command (default to pull if no command specified)
    match cli.command.unwrap_or(Commands::Pull) {
        Commands::Pull => cmd_pull(&config).await,
        Commands::Sync => cmd_sync(&config).await,
        Commands::Clean => cmd_clean(&config).await,
        Commands::Doctor => cmd_doctor(&config),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(),
    }
}

/// Load the manifest from the configured location
fn load_manifest(config: &Config) -> Result<Manifest> {
    let path = config.manifest_path();
    let manifest = Manifest::load(&path)?;

    if manifest.is_empty() {
        println!("⚠️  Manifest {} lists no repositories", path.display());
    }

    info!(
        "Loaded {} manifest entries from {}",
        manifest.len(),
        path.display()
    );
    Ok(manifest)
}

/// Clone new repositories and update existing ones
async fn cmd_pull(config: &Config) -> Result<()> {
    let manifest = load_manifest(config)?;
    let layout = Layout::new(&config.root_dir());
    layout.ensure().await?;

    println!("🎨 Pulling {} repositories", manifest.len());

    let client = GitClient::new(layout);
    let summary = client.pull_all(&manifest).await?;

    println!();
    println!("🎉 Pull complete!");
    println!("   📦 Total repositories: {}", summary.total);
    println!("   📥 Cloned: {}", summary.cloned);
    println!("   🔄 Updated: {}", summary.updated);
    println!("   ❌ Failed: {}", summary.failed);
    println!("   ⏱️  Duration: {:.2}s", summary.duration.as_secs_f64());

    if summary.failed > 0 {
        println!();
        println!("🔍 Failed repositories:");
        for outcome in &summary.outcomes {
            if let PullOutcome::Failed { name, error } = outcome {
                println!("   ❌ {}: {}", name, error);
            }
        }
    }

    Ok(())
}

/// Copy colorscheme files into the unified plugin tree
async fn cmd_sync(config: &Config) -> Result<()> {
    let manifest = load_manifest(config)?;
    let layout = Layout::new(&config.root_dir());
    layout.ensure().await?;

    println!("🎨 Syncing {} repositories", manifest.len());

    let engine = SyncEngine::new(layout);
    let summary = engine.sync_all(&manifest).await?;

    println!();
    println!("🎉 Sync complete!");
    println!("   📦 Total repositories: {}", summary.total);
    println!("   ✅ Synced: {}", summary.synced);
    println!("   ⏭️  Skipped: {}", summary.skipped);
    println!("   ❌ Failed: {}", summary.failed);
    println!("   📄 Files copied: {}", summary.files_copied);
    println!("   ⏱️  Duration: {:.2}s", summary.duration.as_secs_f64());

    if summary.skipped > 0 {
        println!();
        println!("⏭️  Skipped repositories:");
        for outcome in &summary.outcomes {
            if let SyncOutcome::Skipped { name, reason } = outcome {
                println!("   ⏭️  {}: {}", name, reason);
            }
        }
    }

    if summary.failed > 0 {
        println!();
        println!("🔍 Failed repositories:");
        for outcome in &summary.outcomes {
            if let SyncOutcome::Failed { name, error } = outcome {
                println!("   ❌ {}: {}", name, error);
            }
        }
    }

    Ok(())
}

/// Remove the generated destination trees, keeping the repos cache
async fn cmd_clean(config: &Config) -> Result<()> {
    let layout = Layout::new(&config.root_dir());
    layout.ensure().await?;

    println!("🧹 Cleaning destination trees in {}", layout.root().display());
    let removed = layout.clean().await?;

    println!("✅ Removed {} directories (repos cache untouched)", removed);
    Ok(())
}

/// Check the environment and collection health
fn cmd_doctor(config: &Config) -> Result<()> {
    let health = HealthCheck::run(config);
    print_health_report(&health);
    Ok(())
}

/// Print health check report to stdout
fn print_health_report(health: &HealthCheck) {
    use schemekeeper::health::CheckResult;

    fn print_check(name: &str, result: &CheckResult) {
        println!("{}:", name);
        let icon = if result.passed {
            if result.is_warning {
                "⚠️ "
            } else {
                "✅"
            }
        } else {
            "❌"
        };
        println!("  {} {}", icon, result.message);
        if let Some(details) = &result.details {
            for line in details.lines() {
                println!("     {}", line);
            }
        }
    }

    println!("🔍 schemekeeper diagnostics");
    println!();

    for (name, result) in health.all_checks() {
        print_check(name, result);
        println!();
    }

    if health.all_passed() {
        println!("✅ All checks passed");
    } else {
        println!("❌ Some checks failed");
    }
}
