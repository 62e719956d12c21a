//! Core types for Hanzo PII

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A detected entity span within one source text.
///
/// Offsets are byte offsets into the UTF-8 text the match was produced
/// against and always fall on char boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    /// Entity type, e.g. `US_SSN` or `EMAIL_ADDRESS`
    pub entity_type: String,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// The matched substring
    pub matched_text: String,
    /// Identifier of the recognizer that produced the match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<String>,
}

impl EntityMatch {
    /// Build a match from a span of `text`
    pub fn new(
        entity_type: impl Into<String>,
        text: &str,
        start: usize,
        end: usize,
        confidence: f32,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            confidence,
            matched_text: text.get(start..end).unwrap_or_default().to_string(),
            recognizer: None,
        }
    }

    /// Tag the match with the recognizer that produced it
    pub fn with_recognizer(mut self, recognizer: impl Into<String>) -> Self {
        self.recognizer = Some(recognizer.into());
        self
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is zero-width
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: &EntityMatch) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &EntityMatch) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Output of the redaction engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Text with every surviving match replaced by its marker
    pub redacted_text: String,
    /// Whether `redacted_text` differs from the original text
    pub changed: bool,
}

/// One part of a multi-part message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Part type, e.g. `text` or `image_url`
    #[serde(rename = "type")]
    pub kind: String,
    /// Text of a `text` part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Any other part fields, carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Message content: a plain string or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Every text segment, in order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            MessageContent::Text(text) => vec![text.as_str()],
            MessageContent::Parts(parts) => parts.iter().filter_map(|p| p.text.as_deref()).collect(),
        }
    }

    /// Mutable access to every text segment, in the order of [`texts`](Self::texts)
    pub fn texts_mut(&mut self) -> Vec<&mut String> {
        match self {
            MessageContent::Text(text) => vec![text],
            MessageContent::Parts(parts) => parts.iter_mut().filter_map(|p| p.text.as_mut()).collect(),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// One chat message of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (system, user, assistant, tool)
    pub role: String,
    /// Content; `None` for messages such as assistant tool calls
    #[serde(default)]
    pub content: Option<MessageContent>,
    /// Any other message fields, carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChatMessage {
    /// Create a message with content
    pub fn new(role: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            extra: serde_json::Map::new(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new("assistant", content)
    }

    /// String content if present and non-empty
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Every text segment of the content, string or multi-part
    pub fn texts(&self) -> Vec<&str> {
        self.content.as_ref().map(MessageContent::texts).unwrap_or_default()
    }

    /// Whether the content carries any non-empty text
    pub fn has_text(&self) -> bool {
        self.texts().iter().any(|t| !t.is_empty())
    }
}

/// Terminal output of the guardrail pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "messages", rename_all = "snake_case")]
pub enum GuardrailDecision {
    /// Nothing changed; the caller keeps the original conversation verbatim
    PassThrough,
    /// At least one message changed; replace the conversation with this one
    Transformed(Vec<ChatMessage>),
}

impl GuardrailDecision {
    /// Check if the conversation was rewritten
    pub fn is_transformed(&self) -> bool {
        matches!(self, GuardrailDecision::Transformed(_))
    }

    /// The rebuilt conversation, if any
    pub fn messages(&self) -> Option<&[ChatMessage]> {
        match self {
            GuardrailDecision::PassThrough => None,
            GuardrailDecision::Transformed(messages) => Some(messages),
        }
    }

    /// Consume the decision, returning the rebuilt conversation if any
    pub fn into_messages(self) -> Option<Vec<ChatMessage>> {
        match self {
            GuardrailDecision::PassThrough => None,
            GuardrailDecision::Transformed(messages) => Some(messages),
        }
    }
}

/// Direction of content flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Request on its way to the model
    Input,
    /// Completion on its way to the client
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// Request context for guard operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardContext {
    /// Unique request ID
    pub request_id: Uuid,
    /// User identifier (optional)
    pub user_id: Option<String>,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Additional metadata
    pub metadata: serde_json::Value,
}

impl Default for GuardContext {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: None,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }
}

impl GuardContext {
    /// Create a new context with a fresh request ID
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user ID
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Request context
    pub context: GuardContext,
    /// Direction (input/output)
    pub direction: Direction,
    /// Original content hash
    pub content_hash: String,
    /// Result of processing
    pub result: AuditResult,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result for audit logging (simplified)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditResult {
    /// Guardrail disabled for this request
    Skipped,
    /// Analysis ran, nothing changed
    Passed,
    /// Conversation was rewritten
    Redacted { messages: usize },
    /// Processing failed
    Failed { error: String },
}
