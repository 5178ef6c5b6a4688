//! Error type for a single ranking page request

/// Failure of one request attempt.
///
/// Every variant is transient from the fetcher's point of view: the retry
/// loop re-issues the request until its attempt budget is spent.
#[derive(Debug)]
pub enum FetchError {
    /// Transport failure or non-200 status
    Http {
        status: Option<u16>,
        message: String,
    },
    /// 200 response whose body is not JSON
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode(msg) => write!(f, "invalid JSON body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// Create HTTP error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
