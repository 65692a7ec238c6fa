//! Callboard Core Library
//!
//! Client-side core of the call-center dashboard: call records handled by
//! the AI phone agent, in-memory filtering and selection, a keyed query
//! cache over the backend REST API, and agent / knowledge base editing.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): records, value objects, filtering, formatting
//!   - `entities/`: Call, AgentConfig, KnowledgeBaseFile
//!   - `value_objects/`: Outcome, CallStatus, Speaker, StatusFilter, DateFilter
//!   - `errors/`: ApiError, DomainError
//!
//! - **Ports** (`ports/`): the `Transport` trait the HTTP adapter implements
//!
//! - **API / Cache** (`api`, `cache/`): status handling, keyed reads,
//!   invalidation and polling
//!
//! - **Application** (`application/`): services and the dashboard view model
//!
//! # Usage
//!
//! ```rust,ignore
//! use callboard::{ApiClient, QueryCache, CallService, Dashboard};
//!
//! let cache = Arc::new(QueryCache::new(ApiClient::new(transport)));
//! let calls = CallService::new(cache.clone());
//! let mut dashboard = Dashboard::new();
//! dashboard.set_calls(calls.list().await?);
//! ```

pub mod api;
pub mod application;
pub mod cache;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::{endpoints, resolve_url, ApiClient, UnauthorizedBehavior, DEFAULT_BASE_URL};
pub use application::{
    AgentService, CallService, ContentSource, Dashboard, FileEditor, KnowledgeBaseService,
    DEFAULT_REFRESH_DELAY,
};
pub use cache::{CachePoller, PollSubscription, PollerConfig, QueryCache, DEFAULT_POLL_INTERVAL};
pub use domain::{
    AgentConfig, ApiError, Call, CallFilter, CallStatus, DateFilter, DomainError, EscalateCall,
    KnowledgeBaseDraft, KnowledgeBaseFile, Outcome, Speaker, StatusFilter, Tone, TranscriptEntry,
    UpdateAgentConfig,
};
pub use ports::{HttpMethod, RawResponse, Transport};
