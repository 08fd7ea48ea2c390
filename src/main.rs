//! Docs-Mirror main entry point
//!
//! This is the command-line interface for the incremental documentation mirror.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use docs_mirror::cache::load_cache;
use docs_mirror::config::{hash_with_overrides, load_config_with_hash, Config};
use docs_mirror::crawler::run_crawl;
use docs_mirror::output::{print_statistics, Manifest};
use docs_mirror::state::{Budget, CrawlState};
use docs_mirror::storage::{FsStorage, Storage};
use docs_mirror::{normalize_url, Freshness, SiteRoot};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Docs-Mirror: an incremental documentation mirror
///
/// Docs-Mirror crawls a versioned documentation site into a local Markdown
/// corpus. Records from earlier runs are reused while fresh, and versioned
/// pages are skipped whenever their unversioned counterpart exists.
#[derive(Parser, Debug)]
#[command(name = "docs-mirror")]
#[command(version)]
#[command(about = "An incremental documentation mirror", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Maximum number of pages to fetch this run
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "unbounded")]
    max_pages: Option<u32>,

    /// Fetch without a page budget
    #[arg(long)]
    unbounded: bool,

    /// Maximum age of a reusable record, in seconds (0 disables the cache)
    #[arg(long, value_name = "SECS", conflicts_with = "fresh")]
    stale_after: Option<u64>,

    /// Ignore persisted records and fetch every page
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the last run and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let overrides = apply_overrides(&mut config, &cli);
    let config_hash = if overrides.is_empty() {
        config_hash
    } else {
        tracing::info!("Command-line overrides: {}", overrides.join(", "));
        hash_with_overrides(&config_hash, &overrides)
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config, config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_mirror=info,warn"),
            1 => EnvFilter::new("docs_mirror=debug,info"),
            2 => EnvFilter::new("docs_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides of the entry parameters
///
/// Returns one `key=value` entry per override, for the manifest hash.
fn apply_overrides(config: &mut Config, cli: &Cli) -> Vec<String> {
    let mut applied = Vec::new();

    if cli.unbounded {
        config.crawler.max_pages = None;
        applied.push("max-pages=unbounded".to_string());
    } else if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
        applied.push(format!("max-pages={}", max_pages));
    }

    if cli.fresh {
        config.crawler.stale_after_secs = Some(0);
        applied.push("stale-after-secs=0".to_string());
    } else if let Some(secs) = cli.stale_after {
        config.crawler.stale_after_secs = Some(secs);
        applied.push(format!("stale-after-secs={}", secs));
    }

    applied
}

fn describe_budget(config: &Config) -> String {
    match Budget::from_max_pages(config.crawler.max_pages) {
        Budget::Unbounded => "unbounded".to_string(),
        Budget::Pages(n) => format!("{} pages", n),
    }
}

fn describe_freshness(freshness: Freshness) -> String {
    match freshness {
        Freshness::Disabled => "disabled (every page is fetched)".to_string(),
        Freshness::Always => "records never go stale".to_string(),
        Freshness::MaxAge(age) => format!("records older than {}s are refetched", age.as_secs()),
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let entry = normalize_url(&config.site.entry_url)?;
    let site = SiteRoot::new(&entry, config.site.root_path.as_deref())?;
    let freshness = config.crawler.freshness();

    println!("=== Docs-Mirror Dry Run ===\n");

    println!("Site:");
    println!("  Entry URL: {}", entry);
    println!("  Origin: {}", site.origin());
    println!("  Root path: {}", site.root_path());

    println!("\nCrawler Configuration:");
    println!("  Budget: {}", describe_budget(config));
    println!("  Cache: {}", describe_freshness(freshness));
    println!(
        "  Timeouts: {}ms base x {} attempts, {}ms probe",
        config.crawler.base_timeout_ms, config.crawler.max_attempts, config.crawler.probe_timeout_ms
    );

    println!("\nExtraction:");
    println!("  Include: {}", config.extract.include.join(", "));
    println!("  Exclude: {}", config.extract.exclude.join(", "));

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    let storage = FsStorage::from_config(&config.output);
    let mut state = CrawlState::new(Budget::from_max_pages(config.crawler.max_pages));
    let load = load_cache(&storage, &site, freshness, &mut state, Utc::now());

    println!("\n✓ Configuration is valid");
    println!(
        "✓ {} fresh records would be reused; would start at {} plus {} cached links",
        load.fresh_count,
        entry,
        load.candidates.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the last manifest
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = FsStorage::from_config(&config.output);

    let json = storage
        .read_manifest()?
        .with_context(|| format!("No manifest found in {}", config.output.directory))?;
    let manifest = Manifest::from_json(&json).context("Manifest is malformed")?;

    println!("Output: {}", storage.root().display());
    println!("Origin: {}", manifest.origin);
    println!("Generated: {}\n", manifest.generated_at.to_rfc3339());

    print_statistics(&manifest.stats);

    Ok(())
}

/// Handles the main mirror operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Budget: {}; cache: {}",
        describe_budget(&config),
        describe_freshness(config.crawler.freshness())
    );

    let stats = run_crawl(config, Some(config_hash))
        .await
        .context("Mirror run failed")?;

    print_statistics(&stats);
    Ok(())
}
