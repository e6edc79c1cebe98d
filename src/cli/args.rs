//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Markdown wiki server with live page updates
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rowi.toml, optional)
    #[arg(short = 'C', long, default_value = "rowi.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Address the HTTP server listens on (e.g. 0.0.0.0:8000)
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Directory holding the wiki documents
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub docroot: Option<PathBuf>,

    /// URL path prefix every route is mounted under (e.g. /wiki)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Port of the live-update WebSocket listener
    #[arg(long)]
    pub ws_port: Option<u16>,

    /// Disable the file watcher (pages are scanned once at startup)
    #[arg(long)]
    pub no_watch: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
