//! Domain Entities
//!
//! Records exchanged with the backend.
//! - Call: inbound phone call with transcript and AI decisions
//! - AgentConfig: voice agent settings
//! - KnowledgeBaseFile: documents the agent can draw on

mod agent;
mod call;
mod knowledge_base;

pub use agent::*;
pub use call::*;
pub use knowledge_base::*;
