//! reconmap CLI — active URL-discovery reconnaissance against a single
//! web origin.
//!
//! Combines wordlist fuzzing against an SPA-aware baseline fingerprint,
//! static endpoint mining from HTML/JS, and scope-bounded BFS crawling.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
