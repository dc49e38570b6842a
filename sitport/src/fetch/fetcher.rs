//! The retry loop.

use super::error::FetchError;
use super::outcome::{classify, AttemptOutcome};
use super::policy::RetryPolicy;
use super::sleeper::{Sleeper, ThreadSleeper};
use crate::endpoint::{endpoint_url, EndpointDescriptor};
use crate::http::{HttpClient, HttpRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A successful fetch together with the number of attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub payload: Value,
    pub attempts: u32,
}

/// Fetches single endpoints over a shared HTTP session, retrying
/// transient failures.
///
/// # Example
///
/// ```ignore
/// use sitport::fetch::{Fetcher, RetryPolicy};
/// use sitport::http::{ClientConfig, ReqwestClient};
/// use sitport::endpoint::EndpointDescriptor;
///
/// let client = ReqwestClient::new(&ClientConfig::default())?;
/// let fetcher = Fetcher::new(client, RetryPolicy::default());
/// let payload = fetcher.fetch(base_url, &EndpointDescriptor::get("Totalgeneral"))?;
/// ```
pub struct Fetcher<C> {
    client: C,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<C: HttpClient> Fetcher<C> {
    /// Creates a fetcher that sleeps the current thread between attempts.
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self::with_sleeper(client, policy, Arc::new(ThreadSleeper))
    }

    pub fn with_sleeper(client: C, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            client,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches one endpoint and returns its parsed JSON payload.
    pub fn fetch(
        &self,
        base_url: &str,
        endpoint: &EndpointDescriptor,
    ) -> Result<Value, FetchError> {
        self.fetch_with_report(base_url, endpoint)
            .map(|report| report.payload)
    }

    /// Like [`fetch`](Self::fetch), also reporting how many attempts were made.
    pub fn fetch_with_report(
        &self,
        base_url: &str,
        endpoint: &EndpointDescriptor,
    ) -> Result<FetchReport, FetchError> {
        let request = HttpRequest {
            method: endpoint.method(),
            url: endpoint_url(base_url, endpoint.name()),
            body: endpoint.request_body(),
        };
        let name = endpoint.name();
        let max_attempts = self.policy.max_attempts();

        let mut last_status = None;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let result = self.client.execute(&request);

            match &result {
                Ok(response) => info!(
                    endpoint = name,
                    attempt,
                    max_attempts,
                    status = response.status,
                    content_type = response.content_type.as_deref().unwrap_or(""),
                    "Attempt completed"
                ),
                Err(e) => warn!(
                    endpoint = name,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Attempt failed below HTTP"
                ),
            }

            match classify(result) {
                AttemptOutcome::Success(payload) => {
                    return Ok(FetchReport {
                        payload,
                        attempts: attempt,
                    });
                }
                AttemptOutcome::Fatal {
                    status,
                    reason,
                    body_preview,
                } => {
                    error!(
                        endpoint = name,
                        status,
                        reason = %reason,
                        body_preview = %body_preview,
                        "Fatal response, not retrying"
                    );
                    return Err(FetchError::Fatal {
                        endpoint: name.to_string(),
                        status,
                        reason,
                        body_preview,
                    });
                }
                AttemptOutcome::Retryable { status, reason } => {
                    last_status = status.or(last_status);
                    last_error = reason;

                    if attempt < max_attempts {
                        let delay = self.policy.backoff().delay_for(attempt);
                        warn!(
                            endpoint = name,
                            attempt,
                            reason = %last_error,
                            delay_secs = delay.as_secs_f64(),
                            "Retryable failure, backing off"
                        );
                        self.sleeper.sleep(delay);
                    }
                }
            }
        }

        error!(
            endpoint = name,
            attempts = max_attempts,
            last_status,
            "Retries exhausted"
        );
        Err(FetchError::Exhausted {
            endpoint: name.to_string(),
            attempts: max_attempts,
            last_status,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::HttpMethod;
    use crate::fetch::{BackoffPolicy, FatalReason, FetchErrorKind, RecordingSleeper};
    use crate::http::{HttpResponse, MockHttpClient, TransportError};
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "http://upstream.test/api";

    fn fetcher(
        mock: MockHttpClient,
        max_attempts: u32,
    ) -> (
        Fetcher<Arc<MockHttpClient>>,
        Arc<MockHttpClient>,
        Arc<RecordingSleeper>,
    ) {
        let mock = Arc::new(mock);
        let sleeper = Arc::new(RecordingSleeper::new());
        let fetcher = Fetcher::with_sleeper(
            Arc::clone(&mock),
            RetryPolicy::new().with_max_attempts(max_attempts),
            sleeper.clone(),
        );
        (fetcher, mock, sleeper)
    }

    fn unavailable_then_ok(failures: usize) -> MockHttpClient {
        let mut responses: Vec<_> = (0..failures)
            .map(|_| Ok(HttpResponse::html(503, "<h1>busy</h1>")))
            .collect();
        responses.push(Ok(HttpResponse::json(200, r#"{"ok":true}"#)));
        MockHttpClient::new().route("alpha", responses)
    }

    #[test]
    fn test_success_on_first_attempt() {
        let mock = MockHttpClient::new().route("alpha", vec![Ok(HttpResponse::json(200, "[1,2]"))]);
        let (fetcher, mock, sleeper) = fetcher(mock, 6);

        let report = fetcher
            .fetch_with_report(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap();

        assert_eq!(report.payload, json!([1, 2]));
        assert_eq!(report.attempts, 1);
        assert_eq!(mock.request_count("alpha"), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_succeeds_after_n_unavailable_responses() {
        let (fetcher, mock, sleeper) = fetcher(unavailable_then_ok(3), 6);

        let report = fetcher
            .fetch_with_report(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap();

        assert_eq!(report.attempts, 4);
        assert_eq!(report.payload, json!({"ok": true}));
        assert_eq!(mock.request_count("alpha"), 4);
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(6)
            ]
        );
    }

    #[test]
    fn test_succeeds_on_last_allowed_attempt() {
        let (fetcher, mock, _) = fetcher(unavailable_then_ok(5), 6);

        let result = fetcher.fetch(BASE, &EndpointDescriptor::get("alpha"));

        assert_eq!(result.unwrap(), json!({"ok": true}));
        assert_eq!(mock.request_count("alpha"), 6);
    }

    #[test]
    fn test_exhausted_when_budget_too_small() {
        let (fetcher, mock, sleeper) = fetcher(unavailable_then_ok(6), 6);

        let error = fetcher
            .fetch(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap_err();

        assert_eq!(error.kind(), FetchErrorKind::Exhausted);
        assert_eq!(
            error,
            FetchError::Exhausted {
                endpoint: "alpha".to_string(),
                attempts: 6,
                last_status: Some(503),
                last_error: "retryable status 503".to_string(),
            }
        );
        assert_eq!(mock.request_count("alpha"), 6);
        // No wait after the final attempt.
        assert_eq!(sleeper.delays().len(), 5);
    }

    #[test]
    fn test_not_found_is_fatal_after_one_attempt() {
        let mock = MockHttpClient::new().route(
            "alpha",
            vec![
                Ok(HttpResponse::html(404, "<h1>Not Found</h1>")),
                Ok(HttpResponse::json(200, "{}")),
            ],
        );
        let (fetcher, mock, sleeper) = fetcher(mock, 6);

        let error = fetcher
            .fetch(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap_err();

        assert_eq!(
            error,
            FetchError::Fatal {
                endpoint: "alpha".to_string(),
                status: 404,
                reason: FatalReason::HttpStatus,
                body_preview: "<h1>Not Found</h1>".to_string(),
            }
        );
        assert_eq!(mock.request_count("alpha"), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_html_success_page_is_fatal() {
        let mock = MockHttpClient::new().route(
            "alpha",
            vec![Ok(HttpResponse::html(200, "<html>WAF challenge</html>"))],
        );
        let (fetcher, mock, _) = fetcher(mock, 6);

        let error = fetcher
            .fetch(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap_err();

        assert_eq!(error.kind(), FetchErrorKind::Fatal);
        assert_eq!(error.status(), Some(200));
        assert_eq!(error.body_preview(), Some("<html>WAF challenge</html>"));
        assert_eq!(mock.request_count("alpha"), 1);
    }

    #[test]
    fn test_fatal_after_retryable_stops_immediately() {
        let mock = MockHttpClient::new().route(
            "alpha",
            vec![
                Ok(HttpResponse::json(429, "{}")),
                Ok(HttpResponse::json(401, r#"{"error":"unauthorized"}"#)),
                Ok(HttpResponse::json(200, "{}")),
            ],
        );
        let (fetcher, mock, sleeper) = fetcher(mock, 6);

        let error = fetcher
            .fetch(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap_err();

        assert_eq!(error.status(), Some(401));
        assert_eq!(mock.request_count("alpha"), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(2)]);
    }

    #[test]
    fn test_network_errors_are_retried() {
        let mock = MockHttpClient::new().route(
            "alpha",
            vec![
                Err(TransportError::Timeout("read timed out".to_string())),
                Err(TransportError::Connect("refused".to_string())),
                Ok(HttpResponse::json(200, r#"{"y":2}"#)),
            ],
        );
        let (fetcher, _, _) = fetcher(mock, 6);

        let report = fetcher
            .fetch_with_report(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap();
        assert_eq!(report.attempts, 3);
        assert_eq!(report.payload, json!({"y": 2}));
    }

    #[test]
    fn test_exhausted_keeps_last_seen_status_across_network_errors() {
        let mock = MockHttpClient::new().route(
            "alpha",
            vec![
                Ok(HttpResponse::json(502, "{}")),
                Err(TransportError::Connect("refused".to_string())),
            ],
        );
        let (fetcher, _, _) = fetcher(mock, 3);

        let error = fetcher
            .fetch(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap_err();

        assert_eq!(
            error,
            FetchError::Exhausted {
                endpoint: "alpha".to_string(),
                attempts: 3,
                last_status: Some(502),
                last_error: "connection failed: refused".to_string(),
            }
        );
    }

    #[test]
    fn test_post_sends_empty_object_body() {
        let mock = MockHttpClient::new().route("beta", vec![Ok(HttpResponse::json(200, "{}"))]);
        let (fetcher, mock, _) = fetcher(mock, 1);

        fetcher
            .fetch(BASE, &EndpointDescriptor::post("beta"))
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://upstream.test/api/beta");
        assert_eq!(requests[0].body, Some(json!({})));
    }

    #[test]
    fn test_custom_backoff_is_used() {
        let mock = unavailable_then_ok(2);
        let mock = Arc::new(mock);
        let sleeper = Arc::new(RecordingSleeper::new());
        let policy = RetryPolicy::new().with_backoff(BackoffPolicy::new(
            Duration::from_secs(1),
            Duration::from_secs(3),
            Duration::from_secs(30),
        ));
        let fetcher = Fetcher::with_sleeper(Arc::clone(&mock), policy, sleeper.clone());

        fetcher
            .fetch(BASE, &EndpointDescriptor::get("alpha"))
            .unwrap();

        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(3), Duration::from_secs(3)]
        );
    }
}
