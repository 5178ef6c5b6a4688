//! Bounded retry with randomized delay for ranking page requests

use serde_json::Value;

use crate::http::Transport;
use crate::pacing::Jitter;

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause between attempts (never after the last one)
    pub delay: Jitter,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Jitter::from_secs(2.0, 5.0),
        }
    }
}

/// GET `url` until it yields a JSON body or the attempt budget runs out.
///
/// Every failure (non-200, transport error, unparseable body) is logged and
/// retried. Exhaustion is not an error: it returns `None`, and the caller
/// decides whether a missing page matters.
pub fn fetch_with_retry<T: Transport + ?Sized>(
    transport: &T,
    label: &str,
    url: &str,
    params: &[(&str, String)],
    headers: &[(&str, &str)],
    policy: &RetryPolicy,
) -> Option<Value> {
    let max_attempts = policy.max_attempts;
    for attempt in 1..=max_attempts {
        match transport.get_json(url, params, headers) {
            Ok(body) => return Some(body),
            Err(e) => {
                log::warn!("{label}: attempt {attempt}/{max_attempts} failed: {e}");
            }
        }
        if attempt < max_attempts {
            let delay = policy.delay.pause();
            log::debug!("{label}: retrying after {:.2}s", delay.as_secs_f64());
        }
    }
    log::error!("{label}: no data after {max_attempts} attempts");
    None
}
