//! Callboard HTTP transport and service wiring

use std::sync::Arc;

use async_trait::async_trait;
use callboard::{
    resolve_url, AgentService, ApiClient, ApiError, CallService, HttpMethod, KnowledgeBaseService,
    QueryCache, RawResponse, Transport,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::config::Config;

/// reqwest-backed transport for the dashboard backend
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new transport against `base_url`
    pub fn new(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError> {
        let url = resolve_url(&self.base_url, path);
        tracing::debug!(method = %method, url = %url, "Sending request");

        let mut request = self.client.request(to_method(method), &url);
        if let Some(body) = body {
            // sets Content-Type: application/json
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = resp.status();
        tracing::debug!(status = status.as_u16(), url = %url, "Response received");

        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse::new(status.as_u16(), body)
            .with_status_text(status.canonical_reason().unwrap_or_default()))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Services sharing one cache
#[derive(Clone)]
pub struct Services {
    pub cache: Arc<QueryCache>,
    pub calls: CallService,
    pub agent: AgentService,
    pub knowledge_base: KnowledgeBaseService,
}

impl Services {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        let client = ApiClient::new(transport).with_unauthorized_behavior(config.on_unauthorized);
        let cache = Arc::new(QueryCache::new(client));

        Self {
            calls: CallService::new(Arc::clone(&cache)),
            agent: AgentService::new(Arc::clone(&cache)),
            knowledge_base: KnowledgeBaseService::new(Arc::clone(&cache))
                .with_refresh_delay(config.kb_refresh_delay()),
            cache,
        }
    }

    /// Services talking HTTP to `config.base_url`
    pub fn connect(config: &Config) -> Self {
        Self::new(Arc::new(HttpTransport::new(&config.base_url)), config)
    }
}
