//! rowi - a markdown wiki server that keeps every open browser in sync.

mod actor;
mod cli;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod reload;
mod utils;
mod vcs;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::WikiConfig;
use content::{ContentStore, Scanner};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let config = Arc::new(WikiConfig::load(&cli)?);
    match &config.config_path {
        Some(path) => debug!("config"; "loaded {}", path.display()),
        None => debug!("config"; "using defaults"),
    }
    serve(config)
}

/// Scan once, then serve until Ctrl+C.
fn serve(config: Arc<WikiConfig>) -> Result<()> {
    let docroot = &config.content.docroot;
    let scanner = Arc::new(Scanner::new(docroot, config.git.program()));

    let snapshot = scanner
        .scan()
        .with_context(|| format!("initial scan of {} failed", docroot.display()))?;
    log!("scan"; "{} documents in {}", snapshot.len(), docroot.display());
    let store = Arc::new(ContentStore::new(snapshot));
    core::set_ready();

    let bound = cli::serve::bind_server(&config)?;
    debug!("serve"; "bound {}", bound.addr());
    bound.run(config, scanner, store)
}
