//! Blocking reqwest implementation of [`HttpClient`].

use super::types::{ClientBuildError, HttpClient, HttpRequest, HttpResponse, TransportError};
use crate::config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ORIGIN, DEFAULT_READ_TIMEOUT_SECS, DEFAULT_REFERER,
    DEFAULT_USER_AGENT,
};
use crate::endpoint::HttpMethod;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Settings for the shared HTTP session.
///
/// # Example
///
/// ```
/// use sitport::http::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_user_agent("sitport-etl/1.0 (+cron)")
///     .with_read_timeout(Duration::from_secs(30));
/// assert_eq!(config.connect_timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    user_agent: String,
    origin: Option<String>,
    referer: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the `Origin` header. `None` omits it.
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the `Referer` header. `None` omits it.
    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Upper bound on the whole request once connected, body included.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Fixed headers sent with every request.
    fn default_headers(&self) -> Result<HeaderMap, ClientBuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let optional: [(HeaderName, Option<&str>); 2] =
            [(ORIGIN, self.origin()), (REFERER, self.referer())];
        for (name, value) in optional {
            if let Some(value) = value {
                let value = HeaderValue::from_str(value).map_err(|e| {
                    ClientBuildError(format!(
                        "invalid {} header value '{}': {}",
                        name.as_str(),
                        value,
                        e
                    ))
                })?;
                headers.insert(name, value);
            }
        }

        Ok(headers)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            origin: Some(DEFAULT_ORIGIN.to_string()),
            referer: Some(DEFAULT_REFERER.to_string()),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }
}

/// Production HTTP session.
///
/// Built once per run; the underlying connection pool is reused across
/// endpoint fetches.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientBuildError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .user_agent(config.user_agent())
            .default_headers(config.default_headers()?)
            .build()
            .map_err(|e| ClientBuildError(e.to_string()))?;

        Ok(Self { client })
    }
}

fn map_send_error(url: &str, e: reqwest::Error) -> TransportError {
    warn!(
        url = url,
        error = %e,
        is_connect = e.is_connect(),
        is_timeout = e.is_timeout(),
        "HTTP request failed"
    );
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

impl HttpClient for ReqwestClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        trace!(method = %request.method, url = %request.url, "HTTP request starting");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .map_err(|e| map_send_error(&request.url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(url = %request.url, status, "HTTP response received");

        // A timeout while streaming the body is still a timeout.
        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Body(e.to_string())
            }
        })?;
        trace!(url = %request.url, bytes = body.len(), "HTTP response body read");

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Scripted = Result<HttpResponse, TransportError>;

    /// Scripted HTTP client for tests.
    ///
    /// Each route is matched by URL suffix and replays its responses in order.
    /// The last response of a route repeats once the script runs out. Every
    /// request is recorded.
    #[derive(Default)]
    pub struct MockHttpClient {
        routes: Mutex<Vec<(String, VecDeque<Scripted>)>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a scripted route matched against the end of the request URL.
        pub fn route(self, suffix: &str, responses: Vec<Scripted>) -> Self {
            assert!(!responses.is_empty(), "route needs at least one response");
            self.routes
                .lock()
                .unwrap()
                .push((format!("/{}", suffix), responses.into()));
            self
        }

        /// Every request seen so far, in order.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Number of requests whose URL ends with `/{suffix}`.
        pub fn request_count(&self, suffix: &str) -> usize {
            let suffix = format!("/{}", suffix);
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.url.ends_with(&suffix))
                .count()
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());

            let mut routes = self.routes.lock().unwrap();
            let (_, queue) = routes
                .iter_mut()
                .find(|(suffix, _)| request.url.ends_with(suffix.as_str()))
                .unwrap_or_else(|| panic!("no scripted route for {}", request.url));

            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            }
        }
    }

    #[test]
    fn test_default_client_config() {
        let config = ClientConfig::default();
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.read_timeout(), Duration::from_secs(60));
        assert_eq!(config.origin(), Some(DEFAULT_ORIGIN));
    }

    #[test]
    fn test_default_headers_include_json_and_origin() {
        let headers = ClientConfig::default().default_headers().unwrap();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ORIGIN).unwrap(), DEFAULT_ORIGIN);
        assert_eq!(headers.get(REFERER).unwrap(), DEFAULT_REFERER);
    }

    #[test]
    fn test_optional_headers_can_be_omitted() {
        let headers = ClientConfig::new()
            .with_origin(None)
            .with_referer(None)
            .default_headers()
            .unwrap();
        assert!(headers.get(ORIGIN).is_none());
        assert!(headers.get(REFERER).is_none());
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let result = ClientConfig::new()
            .with_origin(Some("bad\nvalue".to_string()))
            .default_headers();
        assert!(result.is_err());
    }

    #[test]
    fn test_reqwest_client_builds_with_defaults() {
        assert!(ReqwestClient::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_mock_replays_then_repeats_last() {
        let mock = MockHttpClient::new().route(
            "alpha",
            vec![
                Ok(HttpResponse::json(503, "{}")),
                Ok(HttpResponse::json(200, "{\"x\":1}")),
            ],
        );
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://stub/alpha".to_string(),
            body: None,
        };

        assert_eq!(mock.execute(&request).unwrap().status, 503);
        assert_eq!(mock.execute(&request).unwrap().status, 200);
        assert_eq!(mock.execute(&request).unwrap().status, 200);
        assert_eq!(mock.request_count("alpha"), 3);
    }
}
