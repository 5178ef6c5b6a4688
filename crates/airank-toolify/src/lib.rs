//! airank toolify - ranking pipeline for the toolify.ai leaderboards
//!
//! Pages through the four "top" endpoints per language, normalizes every
//! item into a [`CanonicalRecord`] and hands the result to the store.

pub mod config;
pub mod headers;
pub mod normalize;
pub mod paginator;
pub mod ranking;
pub mod runner;

// Re-exports
pub use config::{Config, DEFAULT_BASE_URL, FetchArgs, Pacing};
pub use normalize::{CanonicalRecord, normalize};
pub use paginator::{Paginator, RankingFetch};
pub use ranking::{Language, RankingError, RankingRequestSpec, RankingType};
pub use runner::{BatchSummary, Combination, Outcome, combinations, run};
