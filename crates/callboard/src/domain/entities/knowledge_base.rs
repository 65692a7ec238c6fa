//! Knowledge base files attached to the agent

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Knowledge base file summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseFile {
    pub file_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub content: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub created_at: String,
}

/// Body for `POST /api/agent/knowledgebase`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKnowledgeBaseFile {
    pub name: String,
    pub content: String,
}

/// Body for `PATCH /api/agent/knowledgebase/{fileId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKnowledgeBaseFile {
    pub content: String,
}

/// Input form for a new file; cleared after a successful add
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBaseDraft {
    pub name: String,
    pub content: String,
}

impl KnowledgeBaseDraft {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.name.is_empty() && !self.content.is_empty()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.content.clear();
    }
}

/// Pull the full text out of a `GET /api/agent/knowledgebase/{fileId}` body.
///
/// The upstream platform has used several field names over time; the first
/// non-empty string among them wins.
pub fn full_text(document: &Value) -> String {
    ["extracted_inner_html", "content", "text"]
        .iter()
        .filter_map(|field| document.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_text_prefers_extracted_html() {
        let doc = json!({ "extracted_inner_html": "<p>Full</p>", "content": "Preview" });
        assert_eq!(full_text(&doc), "<p>Full</p>");
    }

    #[test]
    fn test_full_text_skips_empty_fields() {
        let doc = json!({ "extracted_inner_html": "", "content": "", "text": "plain" });
        assert_eq!(full_text(&doc), "plain");
        assert_eq!(full_text(&json!({ "id": "x" })), "");
    }

    #[test]
    fn test_draft_readiness_and_clear() {
        let mut draft = KnowledgeBaseDraft::new("faq.txt", "");
        assert!(!draft.is_ready());
        draft.content = "Parking at rear".to_string();
        assert!(draft.is_ready());
        draft.clear();
        assert_eq!(draft, KnowledgeBaseDraft::default());
    }
}
