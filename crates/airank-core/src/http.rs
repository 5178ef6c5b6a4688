//! HTTP transport: GET with query parameters, headers and a fixed timeout.
//!
//! Uses async reqwest internally but presents a sync interface, so the
//! pipeline stays a plain sequential loop.

use std::sync::LazyLock;
use std::time::Duration;

use serde_json::Value;

use crate::error::FetchError;

/// Per-request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest body excerpt carried into an error message
const ERROR_BODY_EXCERPT: usize = 200;

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// One GET request returning a JSON document.
///
/// Implemented by [`HttpTransport`] for real traffic and by scripted fakes
/// in tests.
pub trait Transport {
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<Value, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        (**self).get_json(url, params, headers)
    }
}

/// Transport settings
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    /// Whole-request timeout (connect + headers + body)
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .build()
            .map_err(|e| FetchError::from_reqwest(&e))?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }
}

impl Transport for HttpTransport {
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let (status, body) = SHARED_RUNTIME.handle().block_on(async {
            let mut request = self.client.get(url).query(params).timeout(self.timeout);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            let response = request
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(&e))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| FetchError::from_reqwest(&e))?;
            Ok::<_, FetchError>((status, body))
        })?;

        parse_body(status, &body)
    }
}

/// Accept exactly HTTP 200 with a JSON body.
pub fn parse_body(status: u16, body: &str) -> Result<Value, FetchError> {
    if status != 200 {
        return Err(FetchError::Http {
            status: Some(status),
            message: excerpt(body),
        });
    }
    Ok(serde_json::from_str(body)?)
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_with_json_body() {
        let value = parse_body(200, r#"{"data":{"data":[]}}"#).unwrap();
        assert!(value["data"]["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn non_200_success_codes_rejected() {
        let err = parse_body(204, "").unwrap_err();
        assert!(matches!(
            err,
            FetchError::Http {
                status: Some(204),
                ..
            }
        ));
    }

    #[test]
    fn server_error_rejected() {
        let err = parse_body(503, "busy").unwrap_err();
        assert_eq!(format!("{err}"), "HTTP 503: busy");
    }

    #[test]
    fn unparseable_body_rejected() {
        let err = parse_body(200, "<html>blocked</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn long_error_body_truncated() {
        let body = "x".repeat(1000);
        let err = parse_body(500, &body).unwrap_err();
        let FetchError::Http { message, .. } = err else {
            panic!("expected HTTP error");
        };
        assert_eq!(message.len(), ERROR_BODY_EXCERPT + 3);
        assert!(message.ends_with("..."));
    }

    #[test]
    fn default_timeout_is_fifteen_seconds() {
        assert_eq!(HttpConfig::default().timeout, Duration::from_secs(15));
    }
}
