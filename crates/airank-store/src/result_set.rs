//! Result set: normalized records plus run metadata

use serde::{Deserialize, Serialize};

/// Header written above the records of one (ranking, language) run.
///
/// Key names are the ones the site frontend reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339 local time of the write
    pub last_updated: String,
    pub ranking_type: String,
    pub language: String,
    pub total_items: usize,
}

/// Borrowed view of records, serialized once and dropped.
#[derive(Debug, Serialize)]
pub struct ResultSet<'a, T> {
    pub metadata: Metadata,
    pub data: &'a [T],
}

impl<'a, T: Serialize> ResultSet<'a, T> {
    /// Stamp `records` with the current time.
    pub fn new(records: &'a [T], ranking_type: &str, language: &str) -> Self {
        Self {
            metadata: Metadata {
                last_updated: chrono::Local::now().to_rfc3339(),
                ranking_type: ranking_type.to_string(),
                language: language.to_string(),
                total_items: records.len(),
            },
            data: records,
        }
    }
}
