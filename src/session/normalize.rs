//! Collapse raw records into normalized messages.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::models::{
    ContentBlock, MessageContent, NormalizedMessage, RawRecord, Role, ToolResult, ToolUse,
};

/// Map a raw record to a normalized message.
///
/// Returns `None` when the record carries no content. Never fails.
pub fn normalize(record: RawRecord) -> Option<NormalizedMessage> {
    let content = record
        .wrapped
        .and_then(|w| w.content)
        .or(record.direct)?;

    let (text, blocks) = match content {
        MessageContent::Text(text) => (text, Vec::new()),
        MessageContent::Blocks(blocks) => (flatten_text(&blocks), blocks),
    };

    let mut tool_uses = Vec::new();
    let mut tool_results = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::ToolUse { name, input, .. } => tool_uses.push(ToolUse { name, input }),
            ContentBlock::ToolResult { content, .. } => tool_results.push(ToolResult { content }),
            ContentBlock::Text { .. } | ContentBlock::Other => {}
        }
    }

    Some(NormalizedMessage {
        role: Role::from(record.kind),
        content: text,
        tool_uses,
        tool_results,
        timestamp: record.timestamp.as_deref().and_then(parse_timestamp),
    })
}

fn flatten_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse an ISO-8601 timestamp, treating zone-less values as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
