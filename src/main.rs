//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `truthlens` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Page loading (remote URL or local file)
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use truthlens::initialization::init_logger_with;
use truthlens::{Config, Engine, LogFormat, LogLevel, MemoryStore, SqliteStore, StateStore};

/// Scan a product-listing page and badge each product card with its
/// classification.
#[derive(Debug, Parser)]
#[command(name = "truthlens", version, about)]
struct Cli {
    /// Page to scan: an http(s) URL, or a path to a local HTML file
    input: String,

    /// Source URL to associate with a local HTML file (drives site-profile
    /// resolution)
    #[arg(long, default_value = "https://example.com/")]
    page_url: String,

    /// Base URL of the product-analysis backend
    #[arg(long, default_value = "http://localhost:8000")]
    api: String,

    /// SQLite database for persisted state; in-memory when omitted
    #[arg(long)]
    db: Option<PathBuf>,

    /// Maximum distinct fingerprints retained by the classification cache
    #[arg(long, default_value_t = 512)]
    cache_capacity: usize,

    /// Per-request timeout for backend calls, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_seconds: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,
}

async fn load_page(cli: &Cli) -> Result<(String, String)> {
    if cli.input.starts_with("http://") || cli.input.starts_with("https://") {
        let html = reqwest::get(&cli.input)
            .await
            .context("Failed to fetch page")?
            .error_for_status()
            .context("Page fetch returned an error status")?
            .text()
            .await
            .context("Failed to read page body")?;
        Ok((html, cli.input.clone()))
    } else {
        let html = std::fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read {}", cli.input))?;
        Ok((html, cli.page_url.clone()))
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config {
        api_base: cli.api.clone(),
        cache_capacity: cli.cache_capacity,
        timeout_seconds: cli.timeout_seconds,
        log_level: cli.log_level.clone(),
        log_format: cli.log_format.clone(),
        ..Default::default()
    };

    let store: Arc<dyn StateStore> = match &cli.db {
        Some(path) => Arc::new(
            SqliteStore::open(path)
                .await
                .context("Failed to open state database")?,
        ),
        None => Arc::new(MemoryStore::new()),
    };

    let (html, url) = load_page(&cli).await?;
    let mut engine =
        Engine::new(&config, &html, &url, store).context("Failed to initialize engine")?;
    engine.start().await;

    let (legit, scam, uncertain) = engine.renderer().status_counts();
    println!(
        "✅ Scanned {} — {} product{} badged ({} legit, {} scam, {} uncertain)",
        url,
        engine.renderer().badge_count(),
        if engine.renderer().badge_count() == 1 {
            ""
        } else {
            "s"
        },
        legit,
        scam,
        uncertain
    );
    println!("{}", engine.stats().snapshot());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("truthlens error: {:#}", e);
            process::exit(1);
        }
    }
}
