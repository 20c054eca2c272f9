//! HTTP fetcher implementation
//!
//! This module performs the single GET request behind every check:
//! - Building the HTTP client with the configured user agent and timeout
//! - Classifying failures into a small, fixed taxonomy
//!
//! Nothing here returns an error. Every failure becomes a [`FetchResult`]
//! value so the check service can branch on it directly.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Why a fetch did not produce a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// DNS failure, refused connection or timeout
    ConnectError,
    /// The server answered with a 4xx/5xx status, or redirects could not be followed
    RequestError,
    /// Anything else
    UnknownError,
}

impl FetchErrorKind {
    /// Machine-readable name, also stored as the check description
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectError => "connect_error",
            Self::RequestError => "request_error",
            Self::UnknownError => "unknown_error",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The server answered with a 2xx/3xx status and the body was read
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body decoded to text
        body: String,
    },

    /// The request failed
    Failure {
        /// Status code, when the server answered at all
        status_code: Option<u16>,
        /// Failure classification
        kind: FetchErrorKind,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<FetchErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Something that can fetch a page
///
/// [`HttpFetcher`] is the real implementation; the seam exists so the check
/// service can be driven with canned results.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use page_analyzer::checker::build_http_client;
/// use page_analyzer::config::FetcherConfig;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP with a single attempt per call
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// | Condition                         | Result                                 |
/// |-----------------------------------|----------------------------------------|
/// | 2xx/3xx and body read             | `Success`                              |
/// | 4xx/5xx                           | `Failure(Some(code), RequestError)`    |
/// | Timeout, refused connection, DNS  | `Failure(None, ConnectError)`          |
/// | Redirect loop / too many hops     | `Failure(None, RequestError)`          |
/// | Anything else                     | `Failure(_, UnknownError)`             |
///
/// No retries: a check is a point-in-time probe.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A `FetchResult` holding the body on success or the failure kind
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("GET {} failed: {}", url, e);
            return FetchResult::Failure {
                status_code: e.status().map(|s| s.as_u16()),
                kind: classify_error(&e),
            };
        }
    };

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return FetchResult::Failure {
            status_code: Some(status.as_u16()),
            kind: FetchErrorKind::RequestError,
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            body,
        },
        Err(e) => {
            tracing::debug!("Reading body of {} failed: {}", url, e);
            let kind = if e.is_timeout() {
                FetchErrorKind::ConnectError
            } else {
                FetchErrorKind::UnknownError
            };
            FetchResult::Failure {
                status_code: Some(status.as_u16()),
                kind,
            }
        }
    }
}

/// Maps a reqwest error onto the failure taxonomy
fn classify_error(e: &reqwest::Error) -> FetchErrorKind {
    if e.is_timeout() || e.is_connect() {
        FetchErrorKind::ConnectError
    } else if e.is_redirect() || e.is_status() {
        FetchErrorKind::RequestError
    } else {
        FetchErrorKind::UnknownError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> FetcherConfig {
        FetcherConfig {
            user_agent: "TestAnalyzer/1.0".to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(FetchErrorKind::ConnectError.as_str(), "connect_error");
        assert_eq!(FetchErrorKind::RequestError.as_str(), "request_error");
        assert_eq!(FetchErrorKind::UnknownError.to_string(), "unknown_error");
    }

    #[test]
    fn test_fetch_result_accessors() {
        let ok = FetchResult::Success {
            status_code: 200,
            body: "<p>hi</p>".to_string(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.status_code(), Some(200));
        assert_eq!(ok.body(), Some("<p>hi</p>"));
        assert_eq!(ok.error_kind(), None);

        let failed = FetchResult::Failure {
            status_code: None,
            kind: FetchErrorKind::ConnectError,
        };
        assert!(!failed.is_success());
        assert_eq!(failed.status_code(), None);
        assert_eq!(failed.body(), None);
        assert_eq!(failed.error_kind(), Some(FetchErrorKind::ConnectError));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>Home</title>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&server.uri()).await;

        assert_eq!(
            result,
            FetchResult::Success {
                status_code: 200,
                body: "<title>Home</title>".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "TestAnalyzer/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&server.uri()).await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&server.uri()).await;

        assert_eq!(
            result,
            FetchResult::Failure {
                status_code: Some(404),
                kind: FetchErrorKind::RequestError,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&server.uri()).await;

        assert_eq!(result.status_code(), Some(503));
        assert_eq!(result.error_kind(), Some(FetchErrorKind::RequestError));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/landing"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&server.uri()).await;

        assert_eq!(result.status_code(), Some(200));
        assert_eq!(result.body(), Some("landed"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_connect_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&server.uri()).await;

        assert_eq!(
            result,
            FetchResult::Failure {
                status_code: None,
                kind: FetchErrorKind::ConnectError,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_refused_is_connect_error() {
        // Grab a free port, then release it so nothing is listening there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch(&format!("http://127.0.0.1:{}/", port)).await;

        assert_eq!(result.status_code(), None);
        assert_eq!(result.error_kind(), Some(FetchErrorKind::ConnectError));
    }

    #[tokio::test]
    async fn test_fetch_unsupported_scheme_is_unknown_error() {
        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let result = fetcher.fetch("ftp://files.example.net").await;

        assert_eq!(result.status_code(), None);
        assert_eq!(result.error_kind(), Some(FetchErrorKind::UnknownError));
    }
}
