//! Transport Port
//!
//! Raw request/response exchange with the backend REST API.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::ApiError;

/// HTTP methods used against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Patch => write!(f, "PATCH"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// A response that made it back, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase, used when the body is empty
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::new(),
            body: body.into(),
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport interface
///
/// Implementations resolve `path` against their configured base URL and
/// send `body` as JSON. Only failures to get any response at all are
/// errors here; status handling belongs to [`crate::api::ApiClient`].
///
/// # Example
///
/// ```rust,ignore
/// use callboard::ports::{HttpMethod, Transport};
///
/// let response = transport.send(HttpMethod::Get, "/api/calls", None).await?;
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;
}
