//! Normalized request errors and decoded response payloads.

use reqwest::StatusCode;
use serde_json::Value;

/// Response payload after content-type negotiation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared a JSON content type. Malformed JSON decodes
    /// to `Value::Null` rather than failing the request.
    Json(Value),
    /// Any non-JSON response, read as text (empty on read failure).
    Text(String),
}

impl ResponseBody {
    /// Collapses the payload into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }
}

/// Uniform failure shape for API requests, whether the failure originated
/// at the transport layer or from a non-2xx status.
#[derive(Debug)]
pub enum ApiError {
    /// The internal timer fired before the transport resolved.
    Timeout {
        /// Human-readable request label, e.g. "GET /loads".
        label: String,
    },
    /// The caller's cancellation signal fired.
    Cancelled,
    /// Low-level transport failure (DNS, refused connection, TLS, ...).
    Network {
        message: String,
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    Http {
        status: StatusCode,
        message: String,
        body: ResponseBody,
    },
}

impl ApiError {
    /// The HTTP status, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    /// The raw response body, retained on HTTP failures.
    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Wraps a transport-level reqwest failure.
    pub(crate) fn from_transport(source: reqwest::Error) -> Self {
        let message = source.to_string();
        let message = if message.is_empty() {
            "network error".to_string()
        } else {
            message
        };
        ApiError::Network { message, source }
    }

    /// Builds the non-2xx error, extracting the message from the body.
    /// Priority: JSON `detail` field, JSON `message` field, a plain string
    /// body, then the status reason phrase.
    pub(crate) fn http(status: StatusCode, body: ResponseBody) -> Self {
        let extracted = match &body {
            ResponseBody::Json(Value::Object(map)) => map
                .get("detail")
                .and_then(Value::as_str)
                .or_else(|| map.get("message").and_then(Value::as_str))
                .map(str::to_string),
            ResponseBody::Json(Value::String(text)) => Some(text.clone()),
            ResponseBody::Text(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        };

        let message = extracted.unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });

        ApiError::Http {
            status,
            message,
            body,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Timeout { label } => {
                write!(f, "{} timed out", label)
            }
            ApiError::Cancelled => {
                write!(f, "request cancelled")
            }
            ApiError::Network { message, .. } => {
                write!(f, "{}", message)
            }
            ApiError::Http { message, .. } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network { source, .. } => Some(source),
            _ => None,
        }
    }
}
