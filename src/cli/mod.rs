//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

/// Run every executable in a batch directory and report JSON events
#[derive(Parser, Debug)]
#[command(name = "runt")]
#[command(version)]
#[command(about = "Run a batch of test executables in parallel")]
#[command(long_about = None)]
pub struct Args {
    /// Batch directory to scan for executables
    pub batch_dir: String,

    /// Number of executables to run at once
    #[arg(short, long)]
    pub concurrent: Option<usize>,

    /// Output format (json, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Label written to each event's @source
    #[arg(long)]
    pub source: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
