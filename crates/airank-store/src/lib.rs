//! airank-store: result-set persistence
//!
//! Wraps normalized records with run metadata and writes them as JSON
//! under `<data_dir>/<language>/<ranking>.json`, optionally alongside a
//! Fernet-encrypted `.enc` copy.

pub mod crypto;
pub mod result_set;
pub mod writer;

pub use crypto::{CryptoError, DEFAULT_KEY_FILE, EncryptionKey};
pub use result_set::{Metadata, ResultSet};
pub use writer::{OutputLayout, ResultWriter, decoded_path, decrypt_file, write_decoded};
