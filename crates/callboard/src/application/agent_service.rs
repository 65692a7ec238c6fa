//! Agent Application Service (Use Case)

use std::sync::Arc;

use crate::api::endpoints;
use crate::cache::QueryCache;
use crate::domain::{AgentConfig, ApiError, UpdateAgentConfig};
use crate::ports::HttpMethod;

/// Application service for agent configuration
#[derive(Clone)]
pub struct AgentService {
    cache: Arc<QueryCache>,
}

impl AgentService {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    /// Current configuration; `None` when a 401 is read as no data
    pub async fn config(&self) -> Result<Option<AgentConfig>, ApiError> {
        self.cache.read(endpoints::AGENT_CONFIG).await
    }

    /// Apply a partial update.
    ///
    /// Fields already equal to the current configuration are dropped; when
    /// nothing is left no request is sent and the current config is returned.
    /// Returns the updated config when the backend sends one back.
    pub async fn update(&self, update: UpdateAgentConfig) -> Result<Option<AgentConfig>, ApiError> {
        let current = self.config().await?;
        let changes = match &current {
            Some(current) => update.changes_from(current),
            None => update,
        };

        if changes.is_empty() {
            tracing::debug!("Agent config unchanged, skipping update");
            return Ok(current);
        }

        let updated: Option<AgentConfig> = self
            .cache
            .write(HttpMethod::Patch, endpoints::AGENT_CONFIG, Some(&changes))
            .await?;

        tracing::info!(
            agent_id = updated.as_ref().map(|c| c.agent_id.as_str()).unwrap_or("-"),
            "Agent config updated"
        );
        self.cache.invalidate(endpoints::AGENT_CONFIG).await;

        Ok(updated)
    }

    /// Manual refresh
    pub async fn refresh(&self) {
        self.cache.invalidate(endpoints::AGENT_CONFIG).await;
    }
}
