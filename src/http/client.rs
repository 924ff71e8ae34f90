//! Authenticated request client for the platform API.
//!
//! Wraps one outbound HTTP call with bearer authentication, a timeout or
//! caller-owned cancellation signal, response-body negotiation and error
//! normalization. Stateless across calls; any number of requests may be in
//! flight concurrently.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;

use super::cancel::CancelSignal;
use super::error::{ApiError, ResponseBody};
use crate::auth::TokenProvider;

/// Default per-request timeout when the caller supplies no cancellation
/// signal.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Per-request configuration. The caller is responsible for serializing
/// `body`; `timeout` is ignored whenever `cancel` is present, so exactly
/// one cancellation authority governs a request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub timeout: Duration,
    pub cancel: Option<CancelSignal>,
    /// Used only in timeout error messages; defaults to "<METHOD> <path>".
    pub label: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            cancel: None,
            label: None,
        }
    }
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// HTTP client for the platform API with bearer authentication and
/// timeout-based cancellation.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Creates a new client over the given reqwest Client and base URL.
    pub fn new(client: Client, base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            tokens,
        }
    }

    /// Performs one authenticated request and returns the negotiated body.
    ///
    /// Failures surface as [`ApiError`] (timeout, cancellation, transport,
    /// or non-2xx status), except token provider failures which propagate
    /// unchanged.
    #[tracing::instrument(skip(self, options))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ResponseBody> {
        let label = options
            .label
            .unwrap_or_else(|| format!("{} {}", options.method, path));
        let url = self.resolve_url(path);
        debug!("{} -> {}...", label, url);

        let token = self.tokens.fetch_token().await?;

        let mut headers = options.headers;
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Failed to build Authorization header")?;
            value.set_sensitive(true);
            // Applied after the caller's headers: the bearer always wins
            // over a caller-supplied Authorization header.
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }
        let send = builder.send();

        let outcome = match options.cancel {
            // The caller's signal is the only cancellation authority; no
            // internal timer exists and `timeout` is ignored.
            Some(signal) => {
                tokio::select! {
                    _ = signal.cancelled() => return Err(ApiError::Cancelled.into()),
                    outcome = send => outcome,
                }
            }
            // Dropping the elapsed timeout future releases the timer on
            // every exit path.
            None => match tokio::time::timeout(options.timeout, send).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(ApiError::Timeout { label }.into()),
            },
        };

        let response = outcome.map_err(ApiError::from_transport)?;
        let status = response.status();
        let body = decode_body(response).await;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::http(status, body).into())
        }
    }

    /// `request` with the method forced to GET, collapsed to a JSON value.
    #[tracing::instrument(skip(self, options))]
    pub async fn get_json(&self, path: &str, options: RequestOptions) -> Result<Value> {
        let options = RequestOptions {
            method: Method::GET,
            ..options
        };
        Ok(self.request(path, options).await?.into_value())
    }

    /// `request` with the method forced to POST and `data` JSON-encoded.
    /// A caller-supplied Content-Type header is preserved.
    #[tracing::instrument(skip(self, data, options))]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &T,
        options: RequestOptions,
    ) -> Result<Value> {
        let mut options = RequestOptions {
            method: Method::POST,
            body: Some(serde_json::to_string(data).context("Failed to encode request payload")?),
            ..options
        };
        options
            .headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        Ok(self.request(path, options).await?.into_value())
    }

    /// Absolute URLs pass through unchanged; anything else is joined onto
    /// the configured base URL.
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Negotiates the response body from its declared content type. Never
/// fails: malformed JSON decodes to null, unreadable text to "".
async fn decode_body(response: Response) -> ResponseBody {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("json"))
        .unwrap_or(false);

    if is_json {
        match response.bytes().await {
            Ok(bytes) => ResponseBody::Json(serde_json::from_slice(&bytes).unwrap_or(Value::Null)),
            Err(_) => ResponseBody::Json(Value::Null),
        }
    } else {
        ResponseBody::Text(response.text().await.unwrap_or_default())
    }
}
