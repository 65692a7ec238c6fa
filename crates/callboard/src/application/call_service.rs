//! Call Application Service (Use Case)
//!
//! Reads the call list through the cache and escalates calls.

use std::sync::Arc;

use crate::api::endpoints;
use crate::cache::{CachePoller, PollSubscription, PollerConfig, QueryCache};
use crate::domain::{ApiError, Call, EscalateCall};
use crate::ports::HttpMethod;

/// Application service for call operations
#[derive(Clone)]
pub struct CallService {
    cache: Arc<QueryCache>,
}

impl CallService {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    /// All calls, from cache when fresh.
    ///
    /// A 401 read as no data gives an empty list.
    pub async fn list(&self) -> Result<Vec<Call>, ApiError> {
        let calls: Option<Vec<Call>> = self.cache.read(endpoints::CALLS).await?;
        Ok(calls.unwrap_or_default())
    }

    /// Poll the call list in the background. `None` is a 401 read as no data.
    pub fn watch(&self, config: Option<PollerConfig>) -> PollSubscription<Option<Vec<Call>>> {
        CachePoller::new(Arc::clone(&self.cache), endpoints::CALLS, config).start()
    }

    /// Manual refresh
    pub async fn refresh(&self) {
        self.cache.invalidate(endpoints::CALLS).await;
    }

    /// Escalate a call and invalidate the call list.
    ///
    /// Returns the updated call when the backend sends one back.
    pub async fn escalate(&self, call_id: i64, reason: Option<String>) -> Result<Option<Call>, ApiError> {
        let body = reason.map(|attention_reason| EscalateCall { attention_reason });
        let updated: Option<Call> = self
            .cache
            .write(HttpMethod::Post, &endpoints::escalate_call(call_id), body.as_ref())
            .await?;

        tracing::info!(call_id, "Call escalated");
        self.cache.invalidate(endpoints::CALLS).await;

        Ok(updated)
    }
}
