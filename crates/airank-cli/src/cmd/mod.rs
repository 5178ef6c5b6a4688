pub mod decrypt;
pub mod fetch;
pub mod keygen;

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::config::Config;

/// Print a key-value table on stderr
pub(crate) fn print_table(title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}

/// `airank config`
pub fn show_config(config: &Config, key_file: &Path) -> Result<()> {
    let key_status = if key_file.exists() {
        match airank_store::EncryptionKey::load(key_file) {
            Ok(key) => format!("{} ({})", key_file.display(), key.fingerprint()),
            Err(e) => format!("{} (unreadable: {e})", key_file.display()),
        }
    } else {
        format!("{} (created on first use)", key_file.display())
    };
    let range = |[min, max]: [f64; 2]| format!("{min}-{max}s");

    print_table(
        "Setting",
        &[
            ("Data directory", config.output.data_dir.display().to_string()),
            ("Keep plaintext", config.output.keep_plaintext.to_string()),
            ("Key file", key_status),
            ("Base URL", config.toolify.base_url.clone()),
            ("Timeout", format!("{}s", config.http.timeout_secs)),
            ("Max attempts", config.http.max_attempts.to_string()),
            ("Retry delay", range(config.pacing.retry_delay)),
            ("Page delay", range(config.pacing.page_delay)),
            ("Combination delay", range(config.pacing.combination_delay)),
        ],
    );
    Ok(())
}
