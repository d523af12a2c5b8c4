//! Rendering sessions as markdown, JSON, or plain text.
//!
//! Renderers skip messages that have no text and no tool uses, which in
//! practice are user records carrying only tool results.

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::{NormalizedMessage, Role, Session};

/// Tool results longer than this are cut in markdown output.
const MAX_RESULT_CHARS: usize = 2000;

/// Output format for a rendered session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown document.
    #[default]
    Markdown,
    /// Pretty-printed JSON with metadata and messages.
    Json,
    /// One line per message.
    Text,
}

/// Render a session in the given format.
pub fn render(session: &Session, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => render_markdown(session),
        OutputFormat::Json => render_json(session),
        OutputFormat::Text => render_text(session),
    }
}

fn displayable(session: &Session) -> impl Iterator<Item = &NormalizedMessage> {
    session.messages.iter().filter(|m| m.is_displayable())
}

/// Render a session as a markdown document.
pub fn render_markdown(session: &Session) -> Result<String> {
    let meta = &session.metadata;
    let mut out = String::new();

    writeln!(out, "# Session {}\n", meta.id)?;
    writeln!(out, "- **Project:** {}", meta.decoded_project_path())?;
    writeln!(
        out,
        "- **Last modified:** {}",
        meta.last_modified.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out, "- **Messages:** {}", session.messages.len())?;
    writeln!(out, "- **Tool uses:** {}", session.tool_use_count())?;

    for message in displayable(session) {
        let heading = match message.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        writeln!(out, "\n## {heading}\n")?;
        if let Some(ts) = message.timestamp {
            writeln!(out, "_{}_\n", ts.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        if !message.content.trim().is_empty() {
            writeln!(out, "{}\n", message.content.trim_end())?;
        }
        for tool in &message.tool_uses {
            let input = serde_json::to_string_pretty(&tool.input)
                .context("Failed to serialize tool input")?;
            writeln!(out, "**Tool: {}**\n\n```json\n{input}\n```\n", tool.name)?;
        }
        for result in &message.tool_results {
            writeln!(out, "```\n{}\n```\n", truncate(&result_text(&result.content)))?;
        }
    }

    Ok(out)
}

/// Render a session as pretty-printed JSON.
pub fn render_json(session: &Session) -> Result<String> {
    serde_json::to_string_pretty(session).context("Failed to serialize session")
}

/// Render a session as plain text, one line per message.
pub fn render_text(session: &Session) -> Result<String> {
    let mut out = String::new();
    for message in displayable(session) {
        let text = message.content.trim();
        if !text.is_empty() {
            writeln!(out, "[{}] {}", message.role, text)?;
        }
        for tool in &message.tool_uses {
            writeln!(out, "  -> tool({})", tool.name)?;
        }
    }
    Ok(out)
}

/// Flatten a tool result value to text.
fn result_text(content: &serde_json::Value) -> String {
    match content {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item.get("text").and_then(|t| t.as_str()) {
                Some(text) => text.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_RESULT_CHARS) {
        Some((idx, _)) => format!("{}\n... (truncated)", &text[..idx]),
        None => text.to_string(),
    }
}
