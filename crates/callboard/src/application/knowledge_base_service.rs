//! Knowledge Base Application Service (Use Case)
//!
//! Add, edit and delete the agent's knowledge base files. File summaries come
//! from the agent config, so every mutation invalidates that key.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::endpoints;
use crate::cache::QueryCache;
use crate::domain::{
    full_text, AgentConfig, ApiError, CreateKnowledgeBaseFile, DomainError, KnowledgeBaseDraft,
    KnowledgeBaseFile, UpdateKnowledgeBaseFile,
};
use crate::ports::HttpMethod;

/// Delay before refreshing the agent config after an upload; the voice
/// platform indexes new files asynchronously.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(1000);

/// Where the text in a [`FileEditor`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// Full text from the file endpoint
    Full,
    /// Preview embedded in the agent config, used when the full fetch failed
    Preview,
}

/// A file opened for editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEditor {
    pub file_id: String,
    pub name: String,
    pub content: String,
    pub source: ContentSource,
}

/// Application service for knowledge base files
#[derive(Clone)]
pub struct KnowledgeBaseService {
    cache: Arc<QueryCache>,
    refresh_delay: Duration,
}

impl KnowledgeBaseService {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            refresh_delay: DEFAULT_REFRESH_DELAY,
        }
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    async fn agent_config(&self) -> Result<Option<AgentConfig>, ApiError> {
        self.cache.read(endpoints::AGENT_CONFIG).await
    }

    /// File summaries from the agent config; empty when a 401 is read as no data
    pub async fn list(&self) -> Result<Vec<KnowledgeBaseFile>, DomainError> {
        Ok(self
            .agent_config()
            .await?
            .map(|config| config.knowledgebase_files)
            .unwrap_or_default())
    }

    pub async fn find(&self, file_id: &str) -> Result<KnowledgeBaseFile, DomainError> {
        self.agent_config()
            .await?
            .and_then(|config| config.find_file(file_id).cloned())
            .ok_or_else(|| DomainError::not_found("KnowledgeBaseFile", file_id))
    }

    /// Upload the draft as a new file.
    ///
    /// On success the draft is cleared and the agent config is invalidated
    /// after the refresh delay. Returns the new file's summary when the
    /// backend sends one back.
    pub async fn add(&self, draft: &mut KnowledgeBaseDraft) -> Result<Option<KnowledgeBaseFile>, DomainError> {
        if draft.name.is_empty() {
            return Err(DomainError::Validation("File name is required".to_string()));
        }
        if draft.content.is_empty() {
            return Err(DomainError::Validation("File content is required".to_string()));
        }

        let body = CreateKnowledgeBaseFile {
            name: draft.name.clone(),
            content: draft.content.clone(),
        };
        let created: Option<KnowledgeBaseFile> = self
            .cache
            .write(HttpMethod::Post, endpoints::KNOWLEDGE_BASE, Some(&body))
            .await?;

        tracing::info!(
            file_id = created.as_ref().map(|f| f.file_id.as_str()).unwrap_or("-"),
            name = %body.name,
            "Knowledge base file added"
        );
        draft.clear();
        self.cache.invalidate_after(endpoints::AGENT_CONFIG, self.refresh_delay);

        Ok(created)
    }

    /// Replace a file's content
    pub async fn update(&self, file_id: &str, content: &str) -> Result<Option<KnowledgeBaseFile>, DomainError> {
        let body = UpdateKnowledgeBaseFile {
            content: content.to_string(),
        };
        let updated: Option<KnowledgeBaseFile> = self
            .cache
            .write(HttpMethod::Patch, &endpoints::knowledge_base_file(file_id), Some(&body))
            .await?;

        tracing::info!(file_id = %file_id, "Knowledge base file updated");
        self.cache.invalidate(endpoints::AGENT_CONFIG).await;

        Ok(updated)
    }

    pub async fn delete(&self, file_id: &str) -> Result<(), DomainError> {
        let _ack: Option<Value> = self
            .cache
            .write(HttpMethod::Delete, &endpoints::knowledge_base_file(file_id), None::<&Value>)
            .await?;

        tracing::info!(file_id = %file_id, "Knowledge base file deleted");
        self.cache.invalidate(endpoints::AGENT_CONFIG).await;

        Ok(())
    }

    /// Load the full text of `file` for editing, falling back to its preview
    pub async fn open_for_edit(&self, file: &KnowledgeBaseFile) -> FileEditor {
        let path = endpoints::knowledge_base_file(&file.file_id);
        let (content, source) = match self.cache.client().get_json(&path).await {
            Ok(Some(document)) => (full_text(&document), ContentSource::Full),
            Ok(None) => (file.content.clone(), ContentSource::Preview),
            Err(e) => {
                tracing::warn!(file_id = %file.file_id, error = %e, "Falling back to preview content");
                (file.content.clone(), ContentSource::Preview)
            }
        };

        FileEditor {
            file_id: file.file_id.clone(),
            name: file.name.clone(),
            content,
            source,
        }
    }
}
