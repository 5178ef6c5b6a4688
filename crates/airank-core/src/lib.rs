//! airank core - shared plumbing for ranking pullers
//!
//! HTTP transport, retrying fetch, request pacing, logging and
//! progress reporting used by the source crates and the CLI.

pub mod error;
pub mod http;
pub mod logging;
pub mod pacing;
pub mod progress;
pub mod retry;

// Re-exports for convenience
pub use error::FetchError;
pub use http::{HttpConfig, HttpTransport, SHARED_RUNTIME, Transport};
pub use logging::{LineLogger, init_logging};
pub use pacing::Jitter;
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::{RetryPolicy, fetch_with_retry};
