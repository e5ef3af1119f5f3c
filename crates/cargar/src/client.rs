//! Timed HTTP client for the target application.
//!
//! Thin wrapper over `reqwest` that owns the per-session cookie state
//! (Django's `csrftoken` and `sessionid` live here), times every request,
//! and reports the outcome to the shared [`StatsRecorder`] under the
//! caller-supplied normalized name. Timeouts and redirect handling are
//! delegated to the underlying client; nothing here retries.

use crate::result::CargarResult;
use crate::stats::StatsRecorder;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Header marking a request as AJAX-originated, required by the like endpoint.
pub const AJAX_MARKER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// HTTP client bound to one target deployment and one cookie jar.
#[derive(Debug, Clone)]
pub struct MenuClient {
    base_url: String,
    client: reqwest::Client,
    recorder: Arc<StatsRecorder>,
}

/// Outcome of a single timed request.
#[derive(Debug, Clone)]
pub struct TimedResponse {
    /// HTTP status code after redirects
    pub status: u16,
    /// Final URL after redirects
    pub final_url: String,
    /// Response body
    pub body: String,
    /// Total request duration
    pub latency: Duration,
    cookies: Vec<(String, String)>,
}

impl TimedResponse {
    /// Whether the final status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of a cookie set by this response, if any.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl MenuClient {
    /// Create a client for the given base URL (trailing slash trimmed)
    /// with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        recorder: Arc<StatsRecorder>,
    ) -> CargarResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            recorder,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path`, reported under `name`.
    pub async fn get(&self, path: &str, name: &str) -> CargarResult<TimedResponse> {
        let request = self.client.get(self.url(path));
        self.execute(request, name).await
    }

    /// GET `path` with the AJAX marker header, reported under `name`.
    pub async fn get_ajax(&self, path: &str, name: &str) -> CargarResult<TimedResponse> {
        let request = self
            .client
            .get(self.url(path))
            .header(AJAX_MARKER.0, AJAX_MARKER.1);
        self.execute(request, name).await
    }

    /// POST a form body to `path`, echoing the anti-forgery token as a
    /// header when one is available.
    pub async fn post_form(
        &self,
        path: &str,
        name: &str,
        form: &[(&str, &str)],
        csrf_token: Option<&str>,
    ) -> CargarResult<TimedResponse> {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(token) = csrf_token {
            request = request.header("X-CSRFToken", token);
        }
        self.execute(request, name).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        name: &str,
    ) -> CargarResult<TimedResponse> {
        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(endpoint = name, error = %e, "request failed");
                self.recorder.record_failure(name);
                return Err(e.into());
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();
        let cookies: Vec<(String, String)> = response
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(endpoint = name, error = %e, "failed reading response body");
                self.recorder.record_failure(name);
                return Err(e.into());
            }
        };
        let latency = start.elapsed();

        if status.is_success() {
            self.recorder.record_success(name, latency);
        } else {
            debug!(endpoint = name, status = status.as_u16(), "non-success status");
            self.recorder.record_failure(name);
        }

        Ok(TimedResponse {
            status: status.as_u16(),
            final_url,
            body,
            latency,
            cookies,
        })
    }
}
