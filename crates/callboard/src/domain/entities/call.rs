//! Call - Inbound phone call handled by the agent
//!
//! Created server-side when a call completes. Read-only on this side except
//! for escalation, which the backend applies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CallStatus, Outcome, Speaker};

/// Call record as served by `GET /api/calls`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: i64,
    #[serde(with = "crate::domain::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub patient_name: String,
    pub phone_number: String,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub is_verified: bool,
    pub reason: String,
    pub outcome: Outcome,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub needs_attention: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention_reason: Option<String>,
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    /// Always present; absent on the wire means empty
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub transcript: Vec<TranscriptEntry>,
    /// Always present; absent on the wire means empty
    #[serde(default, deserialize_with = "crate::domain::nullable::deserialize")]
    pub ai_decisions: Vec<String>,
}

impl Call {
    /// True when any appointment detail was captured
    pub fn has_appointment(&self) -> bool {
        self.appointment_type.is_some()
            || self.appointment_date_time.is_some()
            || self.doctor.is_some()
    }
}

/// One line of the call transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    /// Offset label, e.g. `00:12`
    pub timestamp: String,
    pub speaker: Speaker,
    pub message: String,
    #[serde(
        default,
        deserialize_with = "crate::domain::nullable::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub keywords: Vec<String>,
}

/// Optional body for `POST /api/calls/{id}/escalate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateCall {
    pub attention_reason: String,
}
