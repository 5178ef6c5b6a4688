//! Decrypt subcommand - turn an .enc file back into JSON

use std::path::{Path, PathBuf};

use airank_store::{EncryptionKey, decoded_path, decrypt_file, write_decoded};
use anyhow::{Context, Result};
use clap::Args;

/// Characters of decoded JSON echoed to stdout
const PREVIEW_CHARS: usize = 1000;

#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Encrypted file to read
    pub file: PathBuf,

    /// Output path (default: FILE with .enc replaced by _decoded.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: DecryptArgs, key_file: &Path) -> Result<()> {
    let key = EncryptionKey::load_or_create(key_file)
        .with_context(|| format!("Cannot load key {}", key_file.display()))?;
    let value = decrypt_file(&args.file, &key)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| decoded_path(&args.file));
    write_decoded(&output, &value)?;
    log::info!("Decrypted {} -> {}", args.file.display(), output.display());

    if args.output.is_none() {
        let pretty = serde_json::to_string_pretty(&value)?;
        println!("{}", preview(&pretty));
    }
    Ok(())
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "豆".repeat(PREVIEW_CHARS + 10);
        let shown = preview(&text);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn decrypt_to_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("k.key");
        let key = EncryptionKey::load_or_create(&key_file).unwrap();

        let enc = dir.path().join("monthly_rank.enc");
        std::fs::write(&enc, key.encrypt_json(&json!({"data": [1, 2]})).unwrap()).unwrap();

        run(
            DecryptArgs {
                file: enc,
                output: None,
            },
            &key_file,
        )
        .unwrap();

        let decoded = std::fs::read(dir.path().join("monthly_rank_decoded.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(value, json!({"data": [1, 2]}));
    }

    #[test]
    fn wrong_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let enc = dir.path().join("x.enc");
        let token = EncryptionKey::generate().encrypt_json(&json!({})).unwrap();
        std::fs::write(&enc, token).unwrap();

        let output = dir.path().join("out.json");
        let result = run(
            DecryptArgs {
                file: enc,
                output: Some(output.clone()),
            },
            &dir.path().join("other.key"),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
