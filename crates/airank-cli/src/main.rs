//! airank - toolify.ai ranking puller
//!
//! Fetches the monthly, total, income and region leaderboards in English
//! and Chinese, normalizes them and writes JSON (optionally encrypted).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "airank")]
#[command(about = "Pull and normalize toolify.ai AI tool rankings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./airank.toml or ~/.config/airank/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Encryption key file (default: from config, else ./encryption_key.key)
    #[arg(long, global = true)]
    key_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch rankings and write them to the data directory
    Fetch(cmd::fetch::FetchArgs),
    /// Decrypt an .enc file back to JSON
    Decrypt(cmd::decrypt::DecryptArgs),
    /// Generate a new encryption key (replaces the existing one)
    Keygen,
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(airank_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, spinners show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let quiet = progress.is_tty() && !cli.debug;
    airank_core::init_logging(quiet, cli.debug, progress.multi())?;

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    // CLI flag overrides config file
    let key_file = cli
        .key_file
        .unwrap_or_else(|| config.encryption.key_file.clone());

    match cli.command {
        Command::Fetch(args) => cmd::fetch::run(args, &config, &key_file, &progress),
        Command::Decrypt(args) => cmd::decrypt::run(args, &key_file),
        Command::Keygen => cmd::keygen::run(&key_file),
        Command::Config => cmd::show_config(&config, &key_file),
    }
}
