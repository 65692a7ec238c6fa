//! Backend API client
//!
//! Thin wrapper over a [`Transport`]: status checking, JSON decoding and
//! the endpoint paths of the dashboard backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::ApiError;
use crate::ports::{HttpMethod, RawResponse, Transport};

/// Base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:7163";

/// Endpoint paths, also used as cache keys
pub mod endpoints {
    pub const CALLS: &str = "/api/calls";
    pub const AGENT_CONFIG: &str = "/api/agent/config";
    pub const KNOWLEDGE_BASE: &str = "/api/agent/knowledgebase";

    pub fn escalate_call(call_id: i64) -> String {
        format!("{}/{}/escalate", CALLS, call_id)
    }

    pub fn knowledge_base_file(file_id: &str) -> String {
        format!("{}/{}", KNOWLEDGE_BASE, file_id)
    }
}

/// Build an absolute URL from `base` and `path`.
///
/// Paths that already carry a scheme are returned unchanged.
pub fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// What a read does with a 401
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedBehavior {
    /// Fail like any other status error
    #[default]
    Throw,
    /// Treat the read as returning no data
    ReturnNull,
}

/// API client shared by the cache and the services
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    on_unauthorized: UnauthorizedBehavior,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            on_unauthorized: UnauthorizedBehavior::default(),
        }
    }

    pub fn with_unauthorized_behavior(mut self, behavior: UnauthorizedBehavior) -> Self {
        self.on_unauthorized = behavior;
        self
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// GET `path` and parse the body.
    ///
    /// Returns `Ok(None)` only for a 401 under [`UnauthorizedBehavior::ReturnNull`].
    pub async fn get_json(&self, path: &str) -> Result<Option<Value>, ApiError> {
        let response = self.transport.send(HttpMethod::Get, path, None).await?;

        if response.status == 401 && self.on_unauthorized == UnauthorizedBehavior::ReturnNull {
            tracing::debug!(path = %path, "401 treated as empty result");
            return Ok(None);
        }

        let response = check_status(response, HttpMethod::Get, path)?;
        parse_body(&response.body).map(Some)
    }

    /// Send `method` with an optional JSON body. An empty success body is `Value::Null`.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let response = self.transport.send(method, path, body).await?;
        let response = check_status(response, method, path)?;
        parse_body(&response.body)
    }
}

fn check_status(response: RawResponse, method: HttpMethod, path: &str) -> Result<RawResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    let body = if response.body.is_empty() {
        response.status_text
    } else {
        response.body
    };

    tracing::warn!(
        method = %method,
        path = %path,
        status = response.status,
        body = %body,
        "API error"
    );

    Err(ApiError::Status {
        status: response.status,
        body,
    })
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}
