//! Authenticated HTTP client with timeout/cancellation and error normalization.

mod cancel;
mod client;
mod error;

pub use cancel::{CancelHandle, CancelSignal};
pub use client::{ApiClient, DEFAULT_TIMEOUT, RequestOptions};
pub use error::{ApiError, ResponseBody};
