//! Command-line interface for rooncord.
//!
//! The bridge is a long-running daemon; the CLI only covers startup
//! overrides that don't belong in the config file.

use clap::Parser;
use std::path::PathBuf;

/// Roon to Discord rich-presence bridge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: OS config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Companion command producing zone events, overriding the config.
    /// Empty config and no flag means events are read from stdin.
    #[arg(long)]
    pub feed_command: Option<String>,
}
