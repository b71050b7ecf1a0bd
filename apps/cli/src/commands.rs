//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reconmap_core::{dedup_urls, scan, write_urls_file, ScanOptions, ScanProgress};
use reconmap_shared::{init_config, load_config, AppConfig};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// reconmap — active URL-discovery reconnaissance against a single origin.
#[derive(Parser)]
#[command(
    name = "reconmap",
    version,
    about = "Wordlist fuzzing, endpoint mining, and BFS crawling against one web origin.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scan a single web origin for URLs.
    Scan {
        /// Base URL of the target origin.
        base_url: String,

        /// Wordlist file (one path per line); auto-created if missing.
        #[arg(long, default_value = "common.txt")]
        wordlist: PathBuf,

        /// Output file for discovered URLs.
        #[arg(long, default_value = "urls.txt")]
        output: PathBuf,

        /// Output file for the response-analysis hook's findings.
        #[arg(long, default_value = "secrets_found.txt")]
        secrets_file: PathBuf,

        /// Concurrent fuzz probes.
        #[arg(long)]
        threads: Option<u32>,

        /// Per-request rate-limit base, in milliseconds.
        #[arg(long)]
        rate_limit_ms: Option<u64>,

        /// Run the endpoint extractor when the baseline looks like an SPA.
        #[arg(long, overrides_with = "no_enable_spa")]
        enable_spa: bool,

        /// Skip the endpoint extractor even on an SPA baseline.
        #[arg(long, overrides_with = "enable_spa")]
        no_enable_spa: bool,

        /// Pick a random browser User-Agent per probe.
        #[arg(long)]
        random_ua: bool,

        /// Scan responses for leaked secrets (§6 response-analysis hook).
        #[arg(long)]
        analyze_responses: bool,

        /// Run the BFS crawler as an additional stage.
        #[arg(long)]
        crawl: bool,

        /// Maximum BFS depth from the seed URL(s).
        #[arg(long)]
        max_depth: Option<u32>,

        /// Hard cap on URLs visited in one crawl.
        #[arg(long)]
        max_urls: Option<u32>,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "reconmap=info",
        1 => "reconmap=debug",
        _ => "reconmap=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            base_url,
            wordlist,
            output,
            secrets_file,
            threads,
            rate_limit_ms,
            enable_spa,
            no_enable_spa,
            random_ua,
            analyze_responses,
            crawl,
            max_depth,
            max_urls,
        } => {
            cmd_scan(
                &base_url,
                wordlist,
                output,
                secrets_file,
                threads,
                rate_limit_ms,
                enable_spa,
                no_enable_spa,
                random_ua,
                analyze_responses,
                crawl,
                max_depth,
                max_urls,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_scan(
    base_url: &str,
    wordlist: PathBuf,
    output: PathBuf,
    secrets_file: PathBuf,
    threads: Option<u32>,
    rate_limit_ms: Option<u64>,
    enable_spa: bool,
    no_enable_spa: bool,
    random_ua: bool,
    analyze_responses: bool,
    crawl: bool,
    max_depth: Option<u32>,
    max_urls: Option<u32>,
) -> Result<()> {
    let config = load_config()?;

    let opts = ScanOptions {
        wordlist_path: wordlist,
        threads: threads.unwrap_or(config.defaults.threads) as usize,
        enable_spa: if no_enable_spa {
            false
        } else if enable_spa {
            true
        } else {
            config.defaults.enable_spa
        },
        random_ua: random_ua || config.defaults.random_ua,
        enable_analysis: analyze_responses,
        secrets_file,
        rate_limit_ms: rate_limit_ms.unwrap_or(config.defaults.rate_limit_ms),
        crawl,
        max_depth: max_depth.unwrap_or(config.crawl.max_depth),
        max_urls: max_urls.unwrap_or(config.crawl.max_urls) as usize,
    };

    info!(base_url, threads = opts.threads, crawl, "starting scan");

    let progress = CliProgress::new();
    let outcome = scan(base_url, &opts, &progress).await.map_err(|e| eyre!(e))?;

    let urls = dedup_urls(&outcome.results, &outcome.spa_routes, opts.enable_spa);
    write_urls_file(&output, &urls).map_err(|e| eyre!(e))?;

    println!();
    println!("  Scan complete!");
    println!("  Baseline:   {}", if outcome.baseline.is_spa { "SPA" } else { "static" });
    if !outcome.baseline.spa_markers.is_empty() {
        println!("  Frameworks: {}", outcome.baseline.spa_markers.iter().cloned().collect::<Vec<_>>().join(", "));
    }
    println!("  Endpoints:  {}", outcome.spa_routes.len());
    println!("  Results:    {}", outcome.results.len());
    println!("  Saved:      {} ({} unique URLs)", output.display(), urls.len());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner, driven by the scan's
/// fuzz/crawl sub-progress streams.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ScanProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn fuzz_progress(&self, completed: usize, total: usize, found: usize) {
        let pct = if total > 0 { completed * 100 / total } else { 0 };
        self.spinner
            .set_message(format!("Progress: {completed}/{total} ({pct}%) | Found: {found}"));
    }

    fn crawl_progress(&self, visited: usize, max_urls: usize, depth: u32, url: &str) {
        self.spinner
            .set_message(format!("Visiting [{visited}/{max_urls}, depth {depth}]: {url}"));
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config().map_err(|e| eyre!(e))?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config().map_err(|e| eyre!(e))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
