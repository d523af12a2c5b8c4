//! Data models for session transcripts.
//!
//! Raw shapes mirror one line of a transcript file. Normalized shapes are what
//! the renderers consume.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminator of a raw transcript line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Prompt typed by the user.
    User,
    /// Legacy spelling of `user`.
    Human,
    /// Model response.
    Assistant,
}

/// One line of a transcript file, before interpretation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Record discriminator.
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Nested `message` object carrying role and content.
    #[serde(default, rename = "message")]
    pub wrapped: Option<WrappedContent>,
    /// Top-level content, used by records that are not wrapped.
    #[serde(default, rename = "content")]
    pub direct: Option<MessageContent>,
    /// ISO-8601 timestamp as written by the producer.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// The nested `message` object of a record.
#[derive(Debug, Clone, Deserialize)]
pub struct WrappedContent {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Message content: either plain text or a sequence of blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// One unit of structured message content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: serde_json::Value,
    },
    /// Block kinds with no display value (thinking, images, ...).
    #[serde(other)]
    Other,
}

/// Logical author of a normalized message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl From<RecordKind> for Role {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Assistant => Role::Assistant,
            RecordKind::User | RecordKind::Human => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A tool invocation extracted from message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolUse {
    pub name: String,
    pub input: serde_json::Value,
}

/// The output of a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub content: serde_json::Value,
}

/// Role/content/tool view of a record, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMessage {
    pub role: Role,
    /// Text blocks joined by newlines.
    pub content: String,
    pub tool_uses: Vec<ToolUse>,
    pub tool_results: Vec<ToolResult>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NormalizedMessage {
    /// Whether the message has anything worth showing.
    ///
    /// Messages that only carry tool results are not displayable.
    pub fn is_displayable(&self) -> bool {
        !self.content.trim().is_empty() || !self.tool_uses.is_empty()
    }
}

/// Lightweight summary of one transcript file, produced by discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Identifier derived from the file name.
    pub id: String,
    /// Directory holding the transcript.
    pub project_path: PathBuf,
    /// Name of the project directory.
    pub project_name: String,
    pub file_path: PathBuf,
    pub last_modified: DateTime<Utc>,
    /// Non-blank lines in the file, not the number of parsed messages.
    pub message_count: usize,
    pub size_bytes: u64,
}

impl SessionMetadata {
    /// Best-effort readable form of the encoded project directory name.
    ///
    /// Project directories encode the workspace path with `/` replaced by `-`,
    /// so `-home-me-app` reads back as `/home/me/app`. Dashes that were part
    /// of the original path cannot be told apart.
    pub fn decoded_project_path(&self) -> String {
        if self.project_name.starts_with('-') {
            self.project_name.replace('-', "/")
        } else {
            self.project_name.clone()
        }
    }
}

/// One complete transcript plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub metadata: SessionMetadata,
    pub messages: Vec<NormalizedMessage>,
}

impl Session {
    /// Drop messages timestamped at or before `cutoff`.
    ///
    /// Messages without a timestamp are always kept.
    pub fn retain_since(&mut self, cutoff: DateTime<Utc>) {
        self.messages
            .retain(|m| m.timestamp.map_or(true, |ts| ts > cutoff));
    }

    /// Count messages by role.
    pub fn messages_by_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// Total tool invocations across all messages.
    pub fn tool_use_count(&self) -> usize {
        self.messages.iter().map(|m| m.tool_uses.len()).sum()
    }
}
