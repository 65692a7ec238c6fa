//! Application Layer
//!
//! Use cases built on the query cache: reading and escalating calls, agent
//! configuration, knowledge base editing, and the dashboard view model.

mod agent_service;
mod call_service;
mod dashboard;
mod knowledge_base_service;

pub use agent_service::*;
pub use call_service::*;
pub use dashboard::*;
pub use knowledge_base_service::*;
