//! Shared fixtures for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::errors::ApiError;
use crate::domain::{Call, CallStatus, Outcome};
use crate::ports::{HttpMethod, RawResponse, Transport};

/// A request seen by [`FakeTransport`]
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Scripted transport. Each (method, path) has a queue of replies; the last
/// reply stays in place once the queue drains.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<(HttpMethod, String), VecDeque<Result<RawResponse, ApiError>>>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: HttpMethod, path: &str, response: RawResponse) {
        self.push(method, path, Ok(response));
    }

    pub fn respond_json(&self, method: HttpMethod, path: &str, body: Value) {
        self.respond(method, path, RawResponse::new(200, body.to_string()));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Result<RawResponse, ApiError>) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError> {
        self.sent.lock().unwrap().push(SentRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let mut replies = self.replies.lock().unwrap();
        let Some(queue) = replies.get_mut(&(method, path.to_string())) else {
            return Ok(RawResponse::new(404, format!("no fake reply for {} {}", method, path)));
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }

    fn base_url(&self) -> &str {
        "http://fake.local"
    }
}

/// Builder for call fixtures
pub struct CallBuilder {
    call: Call,
}

impl CallBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            call: Call {
                id,
                timestamp: Utc::now(),
                patient_name: format!("Patient {}", id),
                phone_number: format!("+6140000{:04}", id),
                is_verified: true,
                reason: "General enquiry".to_string(),
                outcome: Outcome::NoAction,
                needs_attention: false,
                attention_reason: None,
                status: CallStatus::Pending,
                appointment_type: None,
                appointment_date_time: None,
                doctor: None,
                dob: None,
                transcript: vec![],
                ai_decisions: vec![],
            },
        }
    }

    pub fn patient(mut self, name: &str) -> Self {
        self.call.patient_name = name.to_string();
        self
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.call.phone_number = phone.to_string();
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.call.reason = reason.to_string();
        self
    }

    pub fn status(mut self, status: CallStatus) -> Self {
        self.call.status = status;
        self
    }

    pub fn needs_attention(mut self, reason: &str) -> Self {
        self.call.needs_attention = true;
        self.call.attention_reason = Some(reason.to_string());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.call.timestamp = timestamp;
        self
    }

    pub fn build(self) -> Call {
        self.call
    }
}

pub fn calls_json(calls: &[Call]) -> Value {
    serde_json::to_value(calls).unwrap()
}
