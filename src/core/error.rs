//! Custom error types for the application.
//!
//! Every navigation failure is caught where it happens, logged, and turned
//! into an aborted navigation. The types here only carry enough detail for
//! the log line and for tests:
//!
//! - [`FetchError`] - Network/fetch-related errors for HTTP requests
//! - [`ExtractError`] - Fragment parsing and extraction failures
//! - [`NavigationError`] - Why a single `load_view` call was abandoned
//! - [`BehaviorError`] - Page behavior initialization failures

use thiserror::Error;

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, offline, ...)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// Invalid response content (not text)
    #[error("Invalid response content")]
    InvalidContent,
    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

/// Fragment parsing and extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The fragment has neither a view root nor a body to wrap.
    #[error("no body in {0}")]
    MissingBody(String),
    /// Extracted nodes could not be written back out as markup.
    #[error("failed to serialize {0}")]
    Serialize(String),
}

/// Reasons a navigation was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The fragment URL could not be resolved against the shell URL.
    #[error("cannot resolve {path} against {base}")]
    InvalidUrl { path: String, base: String },
    #[error("fetch failed for {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("parse/extract failed: {0}")]
    Extract(#[from] ExtractError),
    /// A newer navigation started before this one reached the DOM.
    #[error("navigation to {0} superseded")]
    Superseded(String),
}

/// Page behavior initialization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BehaviorError {
    /// Browser window or document not available
    #[error("Browser document not available")]
    NoDocument,
    /// A DOM call was rejected by the browser.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<wasm_bindgen::JsValue> for BehaviorError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
