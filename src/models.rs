use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::steps::{ChatIntent, ConversationStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of the conversation as held by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_result: Option<ChatQueryResult>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            query_result: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>, query_result: Option<ChatQueryResult>) -> Self {
        Self { query_result, ..Self::new(MessageRole::Assistant, content) }
    }
}

/// Structured answer to a lookup intent. The records themselves belong to
/// the item, report, claim and pickup services and are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatQueryResult {
    SearchItems { items: Vec<Value>, total: u64, message: String },
    MyReports { reports: Vec<Value>, total: u64, message: String },
    CheckMatches { matches: Vec<Value>, total: u64, message: String },
    MyPickups { pickups: Vec<Value>, total: u64, message: String },
}

impl ChatQueryResult {
    pub fn kind(&self) -> ChatIntent {
        match self {
            ChatQueryResult::SearchItems { .. } => ChatIntent::SearchItems,
            ChatQueryResult::MyReports { .. } => ChatIntent::MyReports,
            ChatQueryResult::CheckMatches { .. } => ChatIntent::CheckMatches,
            ChatQueryResult::MyPickups { .. } => ChatIntent::MyPickups,
        }
    }

    pub fn records(&self) -> &[Value] {
        match self {
            ChatQueryResult::SearchItems { items, .. } => items,
            ChatQueryResult::MyReports { reports, .. } => reports,
            ChatQueryResult::CheckMatches { matches, .. } => matches,
            ChatQueryResult::MyPickups { pickups, .. } => pickups,
        }
    }

    pub fn total(&self) -> u64 {
        match self {
            ChatQueryResult::SearchItems { total, .. }
            | ChatQueryResult::MyReports { total, .. }
            | ChatQueryResult::CheckMatches { total, .. }
            | ChatQueryResult::MyPickups { total, .. } => *total,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            ChatQueryResult::SearchItems { message, .. }
            | ChatQueryResult::MyReports { message, .. }
            | ChatQueryResult::CheckMatches { message, .. }
            | ChatQueryResult::MyPickups { message, .. } => message,
        }
    }
}

// ── Chat service contract ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub reply: String,
    pub step: ConversationStep,
    #[serde(default)]
    pub intent: Option<ChatIntent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest<'a> {
    pub session_id: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub reply: String,
    pub step: ConversationStep,
    #[serde(default)]
    pub intent: Option<ChatIntent>,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub query_result: Option<ChatQueryResult>,
}

/// Error body the chat service attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
