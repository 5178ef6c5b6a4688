//! Fetch subcommand - pull rankings and write them to disk

use std::path::{Path, PathBuf};

use airank_core::{HttpTransport, SharedProgress};
use airank_store::{EncryptionKey, ResultWriter};
use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Ranking type: all, monthly_rank, total_rank, income_rank, region_rank
    #[arg(short = 't', long = "type", default_value = "all")]
    pub ranking: String,

    /// Language: all, en, zh
    #[arg(short, long, default_value = "all")]
    pub lang: String,

    /// Maximum pages per ranking
    #[arg(short, long, default_value_t = 10)]
    pub pages: u32,

    /// Also write an encrypted .enc file
    #[arg(short, long)]
    pub encrypt: bool,

    /// Output directory (default: from config, else ./data)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

pub fn run(
    args: FetchArgs,
    config: &Config,
    key_file: &Path,
    progress: &SharedProgress,
) -> Result<()> {
    let data_dir = args
        .output_dir
        .unwrap_or_else(|| config.output.data_dir.clone());

    // Rejects unknown selectors before anything touches the network
    let run_config = airank_toolify::Config {
        base_url: config.toolify.base_url.clone(),
        max_attempts: config.http.max_attempts,
        pacing: config.pacing.pacing(),
        ..airank_toolify::Config::try_from(airank_toolify::FetchArgs {
            ranking: args.ranking,
            language: args.lang,
            max_pages: args.pages,
            encrypt: args.encrypt,
        })?
    };

    log::info!(
        "Fetching {} combination(s), up to {} pages each",
        run_config.combination_count(),
        run_config.max_pages
    );
    log::info!("  Output: {}", data_dir.display());
    log::info!("  Encrypt: {}", run_config.encrypt);

    let mut writer = ResultWriter::new(&data_dir).keep_plaintext(config.output.keep_plaintext);
    if run_config.encrypt {
        match EncryptionKey::load_or_create(key_file) {
            Ok(key) => {
                log::info!("  Key: {} ({})", key_file.display(), key.fingerprint());
                writer = writer.with_key(key);
            }
            // Saves fall back to plaintext without a key
            Err(e) => log::error!("Cannot load key {}: {e}", key_file.display()),
        }
    }

    let transport = HttpTransport::new(&config.http.http_config())
        .context("Failed to build HTTP client")?;
    let summary = airank_toolify::run(&run_config, transport, &writer, progress);

    if progress.is_tty() {
        progress.println(summary.format_table());
    } else {
        summary.log();
    }

    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} combinations failed",
            summary.failed(),
            summary.reports.len()
        );
    }
    Ok(())
}
