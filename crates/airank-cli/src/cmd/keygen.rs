//! Keygen subcommand - replace the encryption key

use std::path::Path;

use airank_store::EncryptionKey;
use anyhow::{Context, Result};

pub fn run(key_file: &Path) -> Result<()> {
    if key_file.exists() {
        log::warn!(
            "Replacing {}: files encrypted with the old key can no longer be decrypted",
            key_file.display()
        );
    }
    let key = EncryptionKey::generate();
    key.save(key_file)
        .with_context(|| format!("Cannot write key {}", key_file.display()))?;

    super::print_table(
        "Encryption key",
        &[
            ("File", key_file.display().to_string()),
            ("Fingerprint", key.fingerprint()),
        ],
    );
    Ok(())
}
