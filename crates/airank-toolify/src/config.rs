//! Run configuration for a batch of ranking fetches

use airank_core::{Jitter, RetryPolicy};

use crate::ranking::{Language, RankingError, RankingType};

pub const DEFAULT_BASE_URL: &str = "https://www.toolify.ai/self-api/v1/top/";
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Selector value meaning "every ranking" / "every language"
const ALL: &str = "all";

/// CLI-facing arguments (plain struct, no clap derive)
#[derive(Debug, Clone)]
pub struct FetchArgs {
    /// `all` or a ranking name
    pub ranking: String,
    /// `all`, `en` or `zh`
    pub language: String,
    pub max_pages: u32,
    pub encrypt: bool,
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            ranking: ALL.to_string(),
            language: ALL.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            encrypt: false,
        }
    }
}

/// Randomized delays between requests
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Between attempts of one page request
    pub retry: Jitter,
    /// Between consecutive pages of one ranking
    pub page: Jitter,
    /// Between (ranking, language) combinations
    pub combination: Jitter,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            retry: Jitter::from_secs(2.0, 5.0),
            page: Jitter::from_secs(1.0, 3.0),
            combination: Jitter::from_secs(2.0, 5.0),
        }
    }
}

impl Pacing {
    /// No waiting at all (tests, replay)
    pub const fn none() -> Self {
        Self {
            retry: Jitter::none(),
            page: Jitter::none(),
            combination: Jitter::none(),
        }
    }
}

/// Internal config for a batch run
#[derive(Debug, Clone)]
pub struct Config {
    pub rankings: Vec<RankingType>,
    pub languages: Vec<Language>,
    pub max_pages: u32,
    pub encrypt: bool,
    pub base_url: String,
    pub max_attempts: u32,
    pub pacing: Pacing,
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: self.pacing.retry,
        }
    }

    /// Number of (ranking, language) combinations this run covers
    pub fn combination_count(&self) -> usize {
        self.rankings.len() * self.languages.len()
    }
}

impl TryFrom<FetchArgs> for Config {
    type Error = RankingError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let rankings = if args.ranking == ALL {
            RankingType::ALL.to_vec()
        } else {
            vec![RankingType::from_name(&args.ranking)?]
        };
        let languages = if args.language == ALL {
            Language::ALL.to_vec()
        } else {
            vec![Language::from_name(&args.language)?]
        };

        Ok(Self {
            rankings,
            languages,
            max_pages: args.max_pages,
            encrypt: args.encrypt,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: RetryPolicy::default().max_attempts,
            pacing: Pacing::default(),
        })
    }
}
