//! Prefix-Census main entry point
//!
//! This is the command-line interface for the Prefix-Census thread counter.

use anyhow::Context;
use clap::Parser;
use prefix_census::config::{load_config_or_default, validate, Config};
use prefix_census::crawler::scan;
use prefix_census::output::print_summary;
use prefix_census::progress::{ConsoleProgress, LogProgress, ScanProgress};
use prefix_census::token::load_token;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Prefix-Census: per-prefix thread counter
///
/// Walks every listing page of a forum category once for each configured
/// prefix and prints how many threads carry that prefix.
#[derive(Parser, Debug)]
#[command(name = "prefix-census")]
#[command(version)]
#[command(about = "Counts forum threads per prefix", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// File holding the auth token, overrides `[auth] token-path`
    #[arg(short, long, value_name = "PATH")]
    token: Option<PathBuf>,

    /// Category to scan, overrides `[forum] category-id`
    #[arg(short, long, value_name = "ID")]
    category: Option<u32>,

    /// Report progress as log lines instead of progress bars
    #[arg(long)]
    no_progress: bool,

    /// Validate config and show what would be scanned without sending requests
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scan(config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("prefix_census=info,warn"),
            1 => EnvFilter::new("prefix_census=debug,info"),
            2 => EnvFilter::new("prefix_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using built-in defaults"),
    }

    let mut config = load_config_or_default(cli.config.as_deref())
        .context("configuration could not be loaded")?;

    if let Some(category) = cli.category {
        config.forum.category_id = category;
    }
    if let Some(token) = &cli.token {
        config.auth.token_path = token.display().to_string();
    }
    validate(&config).context("command-line overrides are invalid")?;

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be scanned
fn handle_dry_run(config: &Config) {
    println!("=== Prefix-Census Dry Run ===\n");

    println!("Forum:");
    println!("  Base URL: {}", config.forum.base_url);
    println!("  Category: {}", config.forum.category_id);
    println!("  Thread state: {}", config.forum.thread_state);

    println!("\nAuth:");
    println!("  Cookie: {}", config.auth.cookie_name);
    println!("  Token file: {}", config.auth.token_path);

    println!("\nHTTP:");
    if config.http.user_agents.is_empty() {
        println!("  User agents: built-in pool");
    } else {
        println!("  User agents: {} configured", config.http.user_agents.len());
    }
    for (name, value) in &config.http.headers {
        println!("  {}: {}", name, value);
    }

    println!("\nPrefixes ({}):", config.prefixes.len());
    for prefix in &config.prefixes {
        println!("  - {} ({})", prefix.name, prefix.id);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scan operation
async fn handle_scan(config: Config, cli: &Cli) -> anyhow::Result<()> {
    let token_path = config.auth.token_path.clone();
    let token = load_token(Path::new(&token_path))
        .with_context(|| format!("auth token could not be loaded from {}", token_path))?;

    let mut progress: Box<dyn ScanProgress> = if cli.no_progress || cli.quiet {
        Box::new(LogProgress)
    } else {
        Box::new(ConsoleProgress::new())
    };

    match scan(config, &token, progress.as_mut()).await {
        Ok(report) => {
            tracing::info!(
                "Scan completed: {} threads in {}s",
                report.result.total_threads(),
                report.duration_seconds()
            );
            if !cli.quiet {
                print_summary(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            Err(e.into())
        }
    }
}
