//! runt - parallel test-executable runner
//!
//! Scans a batch directory for executables, runs them under a concurrency
//! ceiling, and prints one Logstash-style JSON event per executable.
//!
//! ## Usage
//!
//! ```bash
//! # Run a batch with the defaults (4 at a time, JSON events)
//! runt suites/smoke
//!
//! # Eight at a time, human-readable summary
//! runt -c 8 --format summary suites/smoke
//! ```

use anyhow::Result;
use clap::Parser;
use std::process;
use tracing::debug;

use runt::cli::Args;
use runt::config::{AppConfig, EnvConfig};
use runt::utils::{init_logger, LogLevel};
use runt::Driver;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        problem(&e);
    }
}

/// Report `e` with a usage line and exit non-zero
fn problem(e: &anyhow::Error) -> ! {
    let program = std::env::args().next().unwrap_or_else(|| "runt".to_string());
    eprintln!("{e:#}");
    eprintln!("USAGE: {program} (options) batch-dir");
    process::exit(1);
}

async fn run(args: Args) -> Result<()> {
    let env = EnvConfig::load();
    let config_path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(Into::into));

    let mut config = AppConfig::resolve(config_path.as_deref())?;
    config.apply_env(&env);
    apply_args(&mut config, &args);
    config.validate()?;

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.level()
    };
    init_logger(level);
    debug!("Effective configuration: {:?}", config);

    let mut driver = Driver::new()
        .with_max_concurrent(config.max_concurrent)
        .with_source(config.source.clone());

    driver.use_batch(&args.batch_dir)?;
    driver.launch_suites().await?;

    let formatter = driver.formatter(config.output_format());
    for line in formatter.format_outcomes(driver.results())? {
        println!("{line}");
    }

    Ok(())
}

fn apply_args(config: &mut AppConfig, args: &Args) {
    if let Some(n) = args.concurrent {
        config.max_concurrent = n;
    }
    if let Some(ref format) = args.format {
        config.format = format.clone();
    }
    if let Some(ref source) = args.source {
        config.source = source.clone();
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }
}
