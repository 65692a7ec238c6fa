//! AgentConfig - Voice agent settings

use serde::{Deserialize, Serialize};

use super::KnowledgeBaseFile;

/// Agent configuration as served by `GET /api/agent/config`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub agent_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub first_message: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub system_prompt: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub language: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub phone_number: String,
    /// Summaries only; `content` is a preview
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub knowledgebase_files: Vec<KnowledgeBaseFile>,
}

impl AgentConfig {
    pub fn find_file(&self, file_id: &str) -> Option<&KnowledgeBaseFile> {
        self.knowledgebase_files.iter().find(|f| f.file_id == file_id)
    }
}

/// Partial update for `PATCH /api/agent/config`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UpdateAgentConfig {
    pub fn is_empty(&self) -> bool {
        self.first_message.is_none() && self.system_prompt.is_none() && self.phone_number.is_none()
    }

    /// Drop fields that already match `current`
    pub fn changes_from(self, current: &AgentConfig) -> Self {
        Self {
            first_message: self.first_message.filter(|v| *v != current.first_message),
            system_prompt: self.system_prompt.filter(|v| *v != current.system_prompt),
            phone_number: self.phone_number.filter(|v| *v != current.phone_number),
        }
    }
}
