//! Minimal HTTP client for fetching pages, images, and probing URLs.
//!
//! - Browser-like default headers so pages serve their normal markup
//! - Per-request options: timeout, retries, extra headers
//! - Retries 429/5xx/network errors with exponential backoff and `Retry-After`
//!   support when a retry budget is configured (the default is a single attempt)
//! - Optional *raw* request/response logging via `LINKPREVIEW_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), linkpreview_http::HttpError> {
//! let client = linkpreview_http::HttpClient::browser_like()?;
//! let page = client
//!     .get_page("https://example.com", linkpreview_http::RequestOpts::default())
//!     .await?;
//! println!("{} bytes from {}", page.body.len(), page.final_url);
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries, and final errors, plus
//! raw request/response lines (target `http.raw`) when `LINKPREVIEW_HTTP_RAW=1`.

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
    RETRY_AFTER, USER_AGENT,
};
use reqwest::{Client, Method, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "LINKPREVIEW_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, query string omitted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    let mut bare = url.clone();
    bare.set_query(None);
    parts.push(format!("'{}'", bare.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("cookie") {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server returned error {status}: {snippet}")]
    Status { status: StatusCode, snippet: String },
}

impl HttpError {
    /// HTTP status for [`HttpError::Status`] failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Request Options & Responses
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use linkpreview_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(5)),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 5);
/// assert!(opts.retries.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub headers: Option<HeaderMap>,
}

/// An HTML (or other text) document after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects.
    pub final_url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

struct RawResponse {
    final_url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

/// How a response body is read off the wire.
#[derive(Clone, Copy, Debug)]
enum ReadAs {
    Bytes,
    /// Decoded with the charset from `Content-Type`, UTF-8 when absent.
    Text,
}

enum Body {
    Bytes(Vec<u8>),
    Text(String),
}

impl Body {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Bytes(b) => b,
            Body::Text(t) => t.as_bytes(),
        }
    }

    fn into_text(self) -> String {
        match self {
            Body::Text(t) => t,
            Body::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Bytes(b) => b,
            Body::Text(t) => t.into_bytes(),
        }
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    default_headers: HeaderMap,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client that presents itself like a desktop browser.
    ///
    /// ```no_run
    /// use linkpreview_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::browser_like()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn browser_like() -> Result<Self, HttpError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Same as [`HttpClient::browser_like`] with a custom `User-Agent`.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_headers: browser_headers(user_agent)?,
            default_timeout: Duration::from_secs(10),
            max_retries: 0,
        })
    }

    /// Override the default timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget.
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET a document and decode it as text. Non-2xx statuses are errors.
    pub async fn get_page(&self, url: &str, opts: RequestOpts) -> Result<FetchedPage, HttpError> {
        let url = parse_url(url)?;
        let raw = self.send(Method::GET, url, &opts, ReadAs::Text).await?;
        ensure_success(&raw)?;
        let content_type = raw
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        tracing::info!(
            final_url=%raw.final_url,
            status=%raw.status,
            content_length=content_len(&raw.headers, raw.body.as_bytes().len()),
            "http.page.fetched"
        );
        Ok(FetchedPage {
            final_url: raw.final_url,
            status: raw.status,
            content_type,
            body: raw.body.into_text(),
        })
    }

    /// GET raw bytes (images). Non-2xx statuses are errors.
    ///
    /// Sent with image `Accept`/`Sec-Fetch-*` headers in place of the
    /// document ones; headers in `opts` still win.
    pub async fn get_bytes(&self, url: &str, mut opts: RequestOpts) -> Result<Vec<u8>, HttpError> {
        let url = parse_url(url)?;
        let mut headers = image_headers();
        if let Some(extra) = opts.headers.take() {
            for (k, v) in extra.iter() {
                headers.insert(k, v.clone());
            }
        }
        opts.headers = Some(headers);
        let raw = self.send(Method::GET, url, &opts, ReadAs::Bytes).await?;
        ensure_success(&raw)?;
        Ok(raw.body.into_bytes())
    }

    /// HEAD `url` and report whether it answered exactly `200 OK`.
    /// Any failure, including a timeout, counts as "does not exist".
    pub async fn exists(&self, url: &str, timeout: Duration) -> bool {
        let Ok(url) = parse_url(url) else {
            return false;
        };
        let opts = RequestOpts {
            timeout: Some(timeout),
            retries: Some(0),
            headers: None,
        };
        match self.send(Method::HEAD, url, &opts, ReadAs::Bytes).await {
            Ok(raw) => raw.status == StatusCode::OK,
            Err(err) => {
                tracing::debug!(error=%err, "http.probe.failed");
                false
            }
        }
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn send(
        &self,
        method: Method,
        url: Url,
        opts: &RequestOpts,
        read_as: ReadAs,
    ) -> Result<RawResponse, HttpError> {
        let mut attempt = 0usize;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut headers = self.default_headers.clone();
        if let Some(extra) = &opts.headers {
            for (k, v) in extra.iter() {
                headers.insert(k, v.clone());
            }
        }

        loop {
            let rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout)
                .headers(headers.clone());

            let req_id = uuid::Uuid::new_v4().simple().to_string();
            let attempt0 = attempt + 1;

            tracing::debug!(
                req_id=%req_id,
                attempt=attempt0,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                timeout_ms=timeout.as_millis() as u64,
                "http.request.start"
            );

            if raw_enabled() {
                let curl = make_curl(&method, &url, &headers);
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let is_timeout = err.is_timeout();
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id=%req_id,
                        attempt,
                        max_retries,
                        message=%message,
                        "http.network_error.send"
                    );
                    return Err(if is_timeout {
                        HttpError::Timeout(timeout)
                    } else {
                        HttpError::Network(message)
                    });
                }
            };
            let status = resp.status();
            let final_url = resp.url().clone();
            let resp_headers = resp.headers().clone();
            let read = match read_as {
                ReadAs::Bytes => resp.bytes().await.map(|b| Body::Bytes(b.to_vec())),
                ReadAs::Text => resp.text().await.map(Body::Text),
            };
            let body = match read {
                Ok(body) => body,
                Err(err) => {
                    let is_timeout = err.is_timeout();
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id=%req_id,
                        attempt,
                        max_retries,
                        message=%message,
                        "http.network_error.body"
                    );
                    return Err(if is_timeout {
                        HttpError::Timeout(timeout)
                    } else {
                        HttpError::Network(message)
                    });
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;

            tracing::debug!(
                req_id=%req_id,
                %status,
                final_url=%final_url,
                duration_ms=dur_ms,
                body_len=body.as_bytes().len(),
                content_type=?resp_headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
                "http.response.headers"
            );

            if raw_enabled() {
                let hdrs = redact_headers(&resp_headers);
                let mut body_snip = body.as_bytes().to_vec();
                let truncated = body_snip.len() > RAW_MAX_BODY;
                if truncated {
                    body_snip.truncate(RAW_MAX_BODY);
                }
                let text = String::from_utf8_lossy(&body_snip);
                tracing::info!(
                    target:"http.raw",
                    %req_id,
                    status=%status,
                    duration_ms=dur_ms,
                    headers=?hdrs,
                    body=%text,
                    truncated
                );
            }

            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            let is_5xx = status.is_server_error();

            if (is_429 || is_5xx) && attempt < max_retries {
                attempt += 1;
                let delay = if let Some(secs) = retry_after_delay_secs(&resp_headers) {
                    Duration::from_secs(secs)
                } else if is_429 {
                    // default floor for 429 when no Retry-After is present
                    backoff(attempt).max(Duration::from_millis(1100))
                } else {
                    backoff(attempt)
                };
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    body_snippet=%snip_body(body.as_bytes()),
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            return Ok(RawResponse {
                final_url,
                status,
                headers: resp_headers,
                body,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn browser_headers(user_agent: &str) -> Result<HeaderMap, HttpError> {
    let mut h = HeaderMap::new();
    h.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).map_err(|e| HttpError::Build(e.to_string()))?,
    );
    h.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    h.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    h.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    h.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );
    h.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    h.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    h.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("none"),
    );
    h.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    Ok(h)
}

fn image_headers() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(
        ACCEPT,
        HeaderValue::from_static("image/avif,image/webp,image/apng,image/*,*/*;q=0.8"),
    );
    h.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("image"),
    );
    h.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("no-cors"),
    );
    h
}

fn parse_url(raw: &str) -> Result<Url, HttpError> {
    let url = Url::parse(raw).map_err(|e| HttpError::Url(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpError::Url(format!("unsupported scheme: {other}"))),
    }
}

fn ensure_success(raw: &RawResponse) -> Result<(), HttpError> {
    if raw.status.is_success() {
        return Ok(());
    }
    let snippet = snip_body(raw.body.as_bytes());
    tracing::warn!(
        status=%raw.status,
        final_url=%raw.final_url,
        body_snippet=%snippet,
        "http.error"
    );
    Err(HttpError::Status {
        status: raw.status,
        snippet,
    })
}

fn backoff(attempt: usize) -> Duration {
    Duration::from_millis(200u64.saturating_mul(1 << (attempt.saturating_sub(1)).min(16)))
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let snip = String::from_utf8_lossy(body);
    if snip.chars().count() > 500 {
        let mut cut: String = snip.chars().take(500).collect();
        cut.push_str("...");
        cut
    } else {
        snip.into_owned()
    }
}

fn content_len(headers: &HeaderMap, body_len: usize) -> usize {
    headers
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(body_len)
}
