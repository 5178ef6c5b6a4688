//! Authenticated symmetric encryption for result files.
//!
//! Tokens use the Fernet layout so the site build can decode them:
//!
//! ```text
//! 0x80 | timestamp (u64 BE) | IV (16) | AES-128-CBC ciphertext | HMAC-SHA256 (32)
//! ```
//!
//! base64url-encoded with padding. The key file holds the base64url form of
//! 32 bytes: HMAC signing key first, AES key second.

use std::path::Path;

use aes::Aes128;
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use rand::{RngCore, rng};
use serde::Serialize;
use sha2::Sha256;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Key file used when none is configured
pub const DEFAULT_KEY_FILE: &str = "encryption_key.key";

const VERSION: u8 = 0x80;
const KEY_LEN: usize = 32;
const HALF_KEY: usize = KEY_LEN / 2;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const TAG_LEN: usize = 32;
/// version + timestamp + IV
const HEADER_LEN: usize = 1 + 8 + IV_LEN;

#[derive(Debug)]
pub enum CryptoError {
    /// Key material is not 32 bytes of base64url
    InvalidKey(String),
    /// Wrong key, tampered or malformed token
    DecryptionFailed,
    /// Plaintext is not valid JSON
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(msg) => write!(f, "invalid encryption key: {msg}"),
            Self::DecryptionFailed => f.write_str("decryption failed"),
            Self::Json(e) => write!(f, "JSON: {e}"),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for CryptoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CryptoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// 256-bit key: signing half + encryption half.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl EncryptionKey {
    /// Fresh random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Parse the key-file representation (surrounding whitespace ignored)
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = URL_SAFE
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let bytes: [u8; KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", decoded.len()))
        })?;
        Ok(Self { bytes })
    }

    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(self.bytes)
    }

    /// Short blake3 digest of the key, safe to print
    pub fn fingerprint(&self) -> String {
        blake3::hash(&self.bytes).to_hex()[..8].to_string()
    }

    fn signing_key(&self) -> &[u8] {
        &self.bytes[..HALF_KEY]
    }

    fn encryption_key(&self) -> &[u8] {
        &self.bytes[HALF_KEY..]
    }

    pub fn load(path: &Path) -> Result<Self, CryptoError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_base64(&content)
    }

    /// Write the key file, replacing any previous key.
    pub fn save(&self, path: &Path) -> Result<(), CryptoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_base64())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Load the key at `path`, generating and persisting one if absent.
    pub fn load_or_create(path: &Path) -> Result<Self, CryptoError> {
        if path.exists() {
            return Self::load(path);
        }
        let key = Self::generate();
        key.save(path)?;
        log::info!(
            "Generated new encryption key {} at {}",
            key.fingerprint(),
            path.display()
        );
        Ok(key)
    }

    /// Encrypt `plaintext` into a base64url token
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut iv = [0u8; IV_LEN];
        rng().fill_bytes(&mut iv);
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.encrypt_with(plaintext, now, &iv)
    }

    fn encrypt_with(&self, plaintext: &[u8], timestamp: u64, iv: &[u8; IV_LEN]) -> String {
        let ciphertext = Aes128CbcEnc::new_from_slices(self.encryption_key(), iv)
            .expect("key half and IV are 16 bytes")
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + TAG_LEN);
        token.push(VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(iv);
        token.extend_from_slice(&ciphertext);

        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.signing_key())
            .expect("HMAC accepts any key length");
        mac.update(&token);
        token.extend_from_slice(&mac.finalize().into_bytes());

        URL_SAFE.encode(token)
    }

    /// Verify and decrypt a token. Any mismatch is [`CryptoError::DecryptionFailed`].
    pub fn decrypt(&self, token: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let text = std::str::from_utf8(token).map_err(|_| CryptoError::DecryptionFailed)?;
        let data = URL_SAFE
            .decode(text.trim())
            .map_err(|_| CryptoError::DecryptionFailed)?;
        if data.len() < HEADER_LEN + BLOCK_LEN + TAG_LEN || data[0] != VERSION {
            return Err(CryptoError::DecryptionFailed);
        }

        let (signed, tag) = data.split_at(data.len() - TAG_LEN);
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.signing_key())
            .map_err(|_| CryptoError::DecryptionFailed)?;
        mac.update(signed);
        mac.verify_slice(tag)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        let iv = &signed[1 + 8..HEADER_LEN];
        let ciphertext = &signed[HEADER_LEN..];
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::DecryptionFailed);
        }
        Aes128CbcDec::new_from_slices(self.encryption_key(), iv)
            .map_err(|_| CryptoError::DecryptionFailed)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    /// Compact JSON → token
    pub fn encrypt_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CryptoError> {
        let json = serde_json::to_vec(value)?;
        Ok(self.encrypt(&json))
    }

    /// Token → JSON value
    pub fn decrypt_json(&self, token: &[u8]) -> Result<serde_json::Value, CryptoError> {
        let plaintext = self.decrypt(token)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}
