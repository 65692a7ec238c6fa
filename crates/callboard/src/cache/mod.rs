//! Query cache
//!
//! Process-wide keyed store of backend reads. Keys are endpoint paths.
//! Entries live until explicitly invalidated; the call list is additionally
//! refreshed by a [`CachePoller`]. Concurrent refetches are last-write-wins.

pub mod poller;

pub use poller::*;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use crate::api::ApiClient;
use crate::domain::errors::ApiError;
use crate::ports::HttpMethod;

const INVALIDATION_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: DateTime<Utc>,
}

/// Keyed read cache over [`ApiClient`]
pub struct QueryCache {
    client: ApiClient,
    entries: RwLock<HashMap<String, CacheEntry>>,
    invalidations: broadcast::Sender<String>,
}

impl QueryCache {
    pub fn new(client: ApiClient) -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self {
            client,
            entries: RwLock::new(HashMap::new()),
            invalidations,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Cached value for `key`, fetching it first if absent.
    ///
    /// A 401 swallowed by [`crate::api::UnauthorizedBehavior::ReturnNull`]
    /// decodes `null` into `T` and caches nothing.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError> {
        if let Some(entry) = self.entries.read().await.get(key) {
            tracing::trace!(key = %key, fetched_at = %entry.fetched_at, "Cache hit");
            return Ok(serde_json::from_value(entry.value.clone())?);
        }

        self.refetch(key).await
    }

    /// Fetch `key` unconditionally and replace whatever is cached
    pub async fn refetch<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError> {
        tracing::debug!(key = %key, "Fetching");

        let Some(value) = self.client.get_json(key).await? else {
            return Ok(serde_json::from_value(Value::Null)?);
        };

        // decode before storing so a bad shape never lands in the cache
        let decoded = serde_json::from_value(value.clone())?;
        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                value,
                fetched_at: Utc::now(),
            },
        );

        Ok(decoded)
    }

    pub async fn is_cached(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// When `key` was last fetched
    pub async fn fetched_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.read().await.get(key).map(|e| e.fetched_at)
    }

    /// Drop the entry for `key` and tell subscribers to refetch
    pub async fn invalidate(&self, key: &str) {
        let removed = self.entries.write().await.remove(key).is_some();
        tracing::debug!(key = %key, removed, "Invalidated");
        // no subscribers is fine
        let _ = self.invalidations.send(key.to_string());
    }

    /// Invalidate `key` after `delay` on a background task
    pub fn invalidate_after(self: &Arc<Self>, key: &str, delay: Duration) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        let key = key.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            cache.invalidate(&key).await;
        })
    }

    /// Stream of invalidated keys
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.invalidations.subscribe()
    }

    /// Send a mutation. Never touches the cache; callers invalidate on success.
    ///
    /// The change is committed once a 2xx comes back, so a body that does not
    /// decode as `T` (empty, `{"success":true}`, ...) is an acknowledgement
    /// and yields `None`.
    pub async fn write<T, B>(&self, method: HttpMethod, key: &str, body: Option<&B>) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        let value = self.client.request(method, key, body.as_ref()).await?;

        match serde_json::from_value(value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Mutation acknowledged without a record");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UnauthorizedBehavior;
    use crate::domain::Call;
    use crate::ports::RawResponse;
    use crate::test_support::{calls_json, CallBuilder, FakeTransport};
    use serde_json::json;

    fn cache_with(transport: &Arc<FakeTransport>) -> QueryCache {
        QueryCache::new(ApiClient::new(transport.clone()))
    }

    #[tokio::test]
    async fn test_read_fetches_once_then_serves_cache() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/calls", calls_json(&[CallBuilder::new(1).build()]));
        let cache = cache_with(&transport);

        let first: Vec<Call> = cache.read("/api/calls").await.unwrap();
        let second: Vec<Call> = cache.read("/api/calls").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.count(HttpMethod::Get, "/api/calls"), 1);
        assert!(cache.fetched_at("/api/calls").await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_and_notifies() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/calls", calls_json(&[CallBuilder::new(1).build()]));
        transport.respond_json(
            HttpMethod::Get,
            "/api/calls",
            calls_json(&[CallBuilder::new(1).build(), CallBuilder::new(2).build()]),
        );
        let cache = cache_with(&transport);
        let mut invalidated = cache.subscribe();

        let before: Vec<Call> = cache.read("/api/calls").await.unwrap();
        cache.invalidate("/api/calls").await;
        assert!(!cache.is_cached("/api/calls").await);
        assert_eq!(invalidated.recv().await.unwrap(), "/api/calls");

        let after: Vec<Call> = cache.read("/api/calls").await.unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert_eq!(transport.count(HttpMethod::Get, "/api/calls"), 2);
    }

    #[tokio::test]
    async fn test_failed_read_caches_nothing() {
        let transport = FakeTransport::new();
        transport.respond(HttpMethod::Get, "/api/agent/config", RawResponse::new(500, "boom"));
        let cache = cache_with(&transport);

        let err = cache.read::<Value>("/api/agent/config").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!cache.is_cached("/api/agent/config").await);
    }

    #[tokio::test]
    async fn test_bad_shape_is_not_cached() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/calls", json!({ "calls": [] }));
        let cache = cache_with(&transport);

        let err = cache.read::<Vec<Call>>("/api/calls").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(!cache.is_cached("/api/calls").await);
    }

    #[tokio::test]
    async fn test_write_does_not_invalidate() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/calls", calls_json(&[]));
        transport.respond(HttpMethod::Post, "/api/calls/3/escalate", RawResponse::new(200, ""));
        let cache = cache_with(&transport);

        let _: Vec<Call> = cache.read("/api/calls").await.unwrap();
        let ack: Option<Call> = cache
            .write(HttpMethod::Post, "/api/calls/3/escalate", None::<&Value>)
            .await
            .unwrap();

        assert!(ack.is_none());
        assert!(cache.is_cached("/api/calls").await);
    }

    #[tokio::test]
    async fn test_write_treats_unexpected_body_as_ack() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Post, "/api/calls/3/escalate", json!({ "success": true }));
        let cache = cache_with(&transport);

        let ack: Option<Call> = cache
            .write(HttpMethod::Post, "/api/calls/3/escalate", None::<&Value>)
            .await
            .unwrap();
        assert!(ack.is_none());

        let raw: Option<Value> = cache
            .write(HttpMethod::Post, "/api/calls/3/escalate", None::<&Value>)
            .await
            .unwrap();
        assert_eq!(raw, Some(json!({ "success": true })));
    }

    #[tokio::test]
    async fn test_return_null_on_unauthorized() {
        let transport = FakeTransport::new();
        transport.respond(HttpMethod::Get, "/api/agent/config", RawResponse::new(401, ""));
        let client = ApiClient::new(transport.clone())
            .with_unauthorized_behavior(UnauthorizedBehavior::ReturnNull);
        let cache = QueryCache::new(client);

        let config: Option<Value> = cache.read("/api/agent/config").await.unwrap();
        assert!(config.is_none());
        assert!(!cache.is_cached("/api/agent/config").await);
    }

    #[tokio::test]
    async fn test_invalidate_after_delay() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/agent/config", json!({ "agentId": "a" }));
        let cache = Arc::new(cache_with(&transport));

        let _: Value = cache.read("/api/agent/config").await.unwrap();
        let handle = cache.invalidate_after("/api/agent/config", Duration::from_millis(30));
        assert!(cache.is_cached("/api/agent/config").await);

        handle.await.unwrap();
        assert!(!cache.is_cached("/api/agent/config").await);
    }
}
