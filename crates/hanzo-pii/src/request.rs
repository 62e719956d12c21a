//! Gateway request and response envelopes
//!
//! The gateway posts chat-completion traffic to the guardrail as JSON. Input
//! requests carry the completion request, output requests additionally carry
//! the completion response. Everything except the fields rewritten by the
//! guardrail is kept verbatim.

use crate::config::GuardrailConfig;
use crate::error::{PiiError, Result};
use crate::types::{ChatMessage, GuardContext};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of subject a request is made on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    User,
    Team,
    Serviceaccount,
}

/// Caller identity attached to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub subject_id: String,
    pub subject_type: SubjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_display_name: Option<String>,
}

/// Request context forwarded by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestContext {
    /// Audit context for this request
    pub fn guard_context(&self) -> GuardContext {
        let mut context = GuardContext::new();
        if let Some(user) = &self.user {
            context = context.with_user_id(user.subject_id.clone());
        }
        if let Some(metadata) = &self.metadata {
            context = context.with_metadata(metadata.clone());
        }
        context
    }
}

/// Input guardrail request: a chat-completion request on its way to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputGuardrailRequest {
    pub request_body: Value,
    #[serde(default)]
    pub config: GuardrailConfig,
    #[serde(default)]
    pub context: RequestContext,
}

impl InputGuardrailRequest {
    /// Build a request around a chat-completion body
    pub fn new(request_body: Value, config: GuardrailConfig) -> Self {
        Self {
            request_body,
            config,
            context: RequestContext::default(),
        }
    }

    /// Messages of the request body
    pub fn messages(&self) -> Result<Vec<ChatMessage>> {
        read_messages(&self.request_body)
    }
}

/// Output guardrail request: a chat completion on its way to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputGuardrailRequest {
    #[serde(default)]
    pub request_body: Value,
    pub response_body: Value,
    #[serde(default)]
    pub config: GuardrailConfig,
    #[serde(default)]
    pub context: RequestContext,
}

impl OutputGuardrailRequest {
    /// Build a request around a chat-completion response
    pub fn new(response_body: Value, config: GuardrailConfig) -> Self {
        Self {
            request_body: Value::Null,
            response_body,
            config,
            context: RequestContext::default(),
        }
    }

    /// The message of every choice, in choice order
    pub fn choice_messages(&self) -> Result<Vec<ChatMessage>> {
        let Some(choices) = self.response_body.get("choices").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        choices
            .iter()
            .filter_map(|choice| choice.get("message"))
            .map(|message| serde_json::from_value(message.clone()).map_err(PiiError::from))
            .collect()
    }
}

/// Read `messages` out of a chat-completion request body
pub fn read_messages(body: &Value) -> Result<Vec<ChatMessage>> {
    match body.get("messages") {
        Some(messages) => Ok(serde_json::from_value(messages.clone())?),
        None => Ok(Vec::new()),
    }
}

/// Copy of `body` with `messages` replaced
pub fn with_messages(body: &Value, messages: &[ChatMessage]) -> Result<Value> {
    let mut body = body.clone();
    if let Value::Object(map) = &mut body {
        map.insert("messages".to_string(), serde_json::to_value(messages)?);
    }
    Ok(body)
}

/// Copy of `response` with each choice's message content replaced, in order
pub fn with_choice_messages(response: &Value, messages: &[ChatMessage]) -> Result<Value> {
    let mut response = response.clone();
    let mut rewritten = messages.iter();
    if let Some(choices) = response.get_mut("choices").and_then(Value::as_array_mut) {
        for choice in choices {
            let Some(message) = choice.get_mut("message") else {
                continue;
            };
            let Some(replacement) = rewritten.next() else {
                break;
            };
            if let (Some(target), Some(content)) = (message.as_object_mut(), &replacement.content) {
                target.insert("content".to_string(), serde_json::to_value(content)?);
            }
        }
    }
    Ok(response)
}

/// Response envelope returned to the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailResponse {
    /// Rewritten body, absent when nothing changed
    #[serde(default)]
    pub result: Option<Value>,
    /// Whether `result` replaces the original body
    #[serde(default)]
    pub transformed: bool,
    /// Human-readable status
    pub message: String,
}

impl GuardrailResponse {
    /// Nothing changed
    pub fn pass_through() -> Self {
        Self {
            result: None,
            transformed: false,
            message: "Success".to_string(),
        }
    }

    /// Body was rewritten
    pub fn transformed(result: Value) -> Self {
        Self {
            result: Some(result),
            transformed: true,
            message: "Success".to_string(),
        }
    }

    /// Wrap the outcome of a guard call
    pub fn from_outcome(outcome: Option<Value>) -> Self {
        match outcome {
            Some(body) => Self::transformed(body),
            None => Self::pass_through(),
        }
    }
}
