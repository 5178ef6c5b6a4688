//! Writing result sets to the data directory
//!
//! Layout:
//! ```text
//! {data_dir}/
//! ├── en/
//! │   ├── monthly_rank.json   # always (unless encrypted without plaintext copy)
//! │   └── monthly_rank.enc    # only with encryption
//! └── zh/
//!     └── ...
//! ```
//!
//! Every write replaces the previous file of the same name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::crypto::EncryptionKey;
use crate::result_set::ResultSet;

/// Path scheme for result files.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    data_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn language_dir(&self, language: &str) -> PathBuf {
        self.data_dir.join(language)
    }

    pub fn json_path(&self, ranking_type: &str, language: &str) -> PathBuf {
        self.language_dir(language).join(format!("{ranking_type}.json"))
    }

    pub fn enc_path(&self, ranking_type: &str, language: &str) -> PathBuf {
        self.language_dir(language).join(format!("{ranking_type}.enc"))
    }
}

/// Persists result sets, optionally encrypted.
#[derive(Debug)]
pub struct ResultWriter {
    layout: OutputLayout,
    key: Option<EncryptionKey>,
    keep_plaintext: bool,
}

impl ResultWriter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: OutputLayout::new(data_dir),
            key: None,
            keep_plaintext: true,
        }
    }

    /// Key used when a save asks for encryption
    pub fn with_key(mut self, key: EncryptionKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Whether encrypted saves also write the readable `.json` copy.
    ///
    /// On by default: the copy is what developers inspect, at the cost of
    /// leaving the data unencrypted on disk next to the `.enc` file.
    pub fn keep_plaintext(mut self, keep: bool) -> Self {
        self.keep_plaintext = keep;
        self
    }

    /// Wrap `records` with metadata and write them.
    ///
    /// Returns the `.enc` path when encryption succeeded, the `.json` path
    /// otherwise. Encryption problems degrade to a plaintext-only write;
    /// filesystem errors are returned.
    pub fn save<T: Serialize>(
        &self,
        records: &[T],
        ranking_type: &str,
        language: &str,
        encrypt: bool,
    ) -> Result<PathBuf> {
        let dir = self.layout.language_dir(language);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory {}", dir.display()))?;

        let result_set = ResultSet::new(records, ranking_type, language);
        let json_path = self.layout.json_path(ranking_type, language);

        if encrypt {
            let enc_path = self.layout.enc_path(ranking_type, language);
            match self.write_encrypted(&result_set, &enc_path) {
                Ok(()) => {
                    log::info!("Encrypted data saved to {}", enc_path.display());
                    if self.keep_plaintext {
                        write_pretty_json(&json_path, &result_set)?;
                        log::info!(
                            "Unencrypted copy saved to {} (debug aid)",
                            json_path.display()
                        );
                    }
                    return Ok(enc_path);
                }
                Err(e) => {
                    log::error!("{ranking_type}/{language}: encryption failed: {e:#}");
                    log::warn!("{ranking_type}/{language}: saving unencrypted JSON instead");
                }
            }
        }

        write_pretty_json(&json_path, &result_set)?;
        log::info!("Data saved to {}", json_path.display());
        Ok(json_path)
    }

    fn write_encrypted<T: Serialize>(
        &self,
        result_set: &ResultSet<'_, T>,
        path: &Path,
    ) -> Result<()> {
        let key = self.key.as_ref().context("no encryption key loaded")?;
        let token = key.encrypt_json(result_set)?;
        std::fs::write(path, token).with_context(|| format!("Cannot write {}", path.display()))
    }
}

fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).context("Failed to serialize result set")?;
    std::fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}

/// Decrypt an `.enc` file into its JSON document.
///
/// Wrong key or tampering surfaces as [`crate::CryptoError::DecryptionFailed`]
/// in the error chain; nothing partial is returned.
pub fn decrypt_file(path: &Path, key: &EncryptionKey) -> Result<serde_json::Value> {
    let token = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let value = key
        .decrypt_json(&token)
        .with_context(|| format!("Cannot decrypt {}", path.display()))?;
    Ok(value)
}

/// Default destination for a decrypted file: `x.enc` → `x_decoded.json`.
pub fn decoded_path(enc_path: &Path) -> PathBuf {
    let name = enc_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".enc").unwrap_or(&name);
    enc_path.with_file_name(format!("{stem}_decoded.json"))
}

/// Write a decrypted document as pretty JSON.
pub fn write_decoded(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    write_pretty_json(path, value)
}
