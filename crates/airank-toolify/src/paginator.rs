//! Page-by-page fetch of one (ranking, language) pair

use airank_core::{Jitter, RetryPolicy, Transport, fetch_with_retry};
use indicatif::ProgressBar;
use serde_json::Value;

use crate::config::DEFAULT_BASE_URL;
use crate::normalize::{CanonicalRecord, normalize};
use crate::ranking::{Language, RankingError, RankingRequestSpec, RankingType};

/// Everything one ranking run produced
#[derive(Debug, Default)]
pub struct RankingFetch {
    pub records: Vec<CanonicalRecord>,
    /// Pages that returned a body (including the empty one that ended the run)
    pub pages_fetched: u32,
    /// Pages that yielded nothing after every retry
    pub pages_skipped: u32,
}

/// Drives the retrying fetcher across pages.
pub struct Paginator<T> {
    transport: T,
    base_url: String,
    retry: RetryPolicy,
    page_delay: Jitter,
}

impl<T: Transport> Paginator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            page_delay: Jitter::from_secs(1.0, 3.0),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Jitter) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Full endpoint URL for a ranking
    pub fn endpoint(&self, spec: &RankingRequestSpec) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), spec.path)
    }

    /// Fetch by selector names, rejecting unknown rankings before any request.
    ///
    /// Any language other than `zh` is fetched as English.
    pub fn fetch_ranking_by_name(
        &self,
        ranking: &str,
        language: &str,
        max_pages: u32,
    ) -> Result<RankingFetch, RankingError> {
        let ranking = RankingType::from_name(ranking)?;
        let language = Language::from_code_or_default(language);
        Ok(self.fetch_ranking(ranking, language, max_pages, &ProgressBar::hidden()))
    }

    /// Fetch up to `max_pages` pages, stopping early at the first empty page.
    ///
    /// Pages that fail every retry are skipped without the page delay; the
    /// ranks of later pages are still computed from their page number.
    pub fn fetch_ranking(
        &self,
        ranking: RankingType,
        language: Language,
        max_pages: u32,
        pb: &ProgressBar,
    ) -> RankingFetch {
        let spec = ranking.spec();
        let url = self.endpoint(spec);
        let headers = language.headers();
        let mut fetch = RankingFetch::default();

        for page in 1..=max_pages {
            log::info!("{ranking}/{language}: fetching page {page}/{max_pages}");
            pb.set_message(format!(
                "page {page}/{max_pages}, {} records",
                fetch.records.len()
            ));

            let label = format!("{ranking}/{language} page {page}");
            let params = spec.params(page);
            let Some(body) =
                fetch_with_retry(&self.transport, &label, &url, &params, headers, &self.retry)
            else {
                log::warn!("{label}: no data, skipping page");
                fetch.pages_skipped += 1;
                continue;
            };
            fetch.pages_fetched += 1;

            let items = page_items(&body);
            if items.is_empty() {
                log::info!("{label}: no items, end of ranking");
                break;
            }

            log::info!("{label}: {} items", items.len());
            fetch.records.extend(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| normalize(item, ranking, page, index, spec.per_page)),
            );

            if page < max_pages {
                let delay = self.page_delay.pause();
                log::debug!("{label}: waited {:.2}s before next page", delay.as_secs_f64());
            }
        }

        log::info!(
            "{ranking}/{language}: {} records from {} pages ({} skipped)",
            fetch.records.len(),
            fetch.pages_fetched,
            fetch.pages_skipped
        );
        fetch
    }
}

/// Item list at `data.data`; anything else counts as empty
fn page_items(body: &Value) -> &[Value] {
    body.pointer("/data/data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
