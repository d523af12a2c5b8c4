//! Full parsing of transcript files and session selection.

use std::fs;

use tracing::debug;

use super::discovery::{discover, StoreConfig};
use super::error::{Result, SessionError};
use super::models::{NormalizedMessage, Session, SessionMetadata};
use super::normalize::normalize;
use super::record::parse_record;

/// Normalize every line of a transcript, dropping blank, malformed, and
/// content-free lines. Returns the messages and the number of dropped
/// non-blank lines.
pub fn parse_transcript(content: &str) -> (Vec<NormalizedMessage>, usize) {
    let mut dropped = 0;
    let messages = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let message = parse_record(line).ok().and_then(normalize);
            if message.is_none() {
                dropped += 1;
            }
            message
        })
        .collect();
    (messages, dropped)
}

/// Read and normalize the transcript described by `metadata`.
pub fn load(metadata: &SessionMetadata) -> Result<Session> {
    let content = fs::read_to_string(&metadata.file_path)
        .map_err(|e| SessionError::io(&metadata.file_path, e))?;
    let (messages, dropped) = parse_transcript(&content);
    debug!(
        session = %metadata.id,
        messages = messages.len(),
        dropped,
        "loaded session"
    );
    Ok(Session {
        metadata: metadata.clone(),
        messages,
    })
}

/// Discovery and loading over one configured projects root.
#[derive(Debug, Clone)]
pub struct SessionStore {
    config: StoreConfig,
}

impl SessionStore {
    /// Create a store over the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// List sessions, most recently modified first.
    pub fn discover(&self, project_filter: Option<&str>) -> Result<Vec<SessionMetadata>> {
        discover(&self.config, project_filter)
    }

    /// Load one discovered session.
    pub fn load(&self, metadata: &SessionMetadata) -> Result<Session> {
        load(metadata)
    }

    /// Load the most recently modified session.
    pub fn load_most_recent(&self) -> Result<Session> {
        let sessions = self.discover(None)?;
        let latest = sessions.first().ok_or_else(|| {
            SessionError::NotFound(format!(
                "no sessions found under {}",
                self.config.projects_dir.display()
            ))
        })?;
        self.load(latest)
    }

    /// Load the most recent session whose project name contains `name`,
    /// ignoring case.
    pub fn load_by_project(&self, name: &str) -> Result<Session> {
        let sessions = self.discover(Some(name))?;
        let latest = sessions.first().ok_or_else(|| {
            SessionError::NotFound(format!("no sessions found for project matching '{name}'"))
        })?;
        self.load(latest)
    }

    /// Load a session by exact id or unambiguous id prefix.
    pub fn load_by_id(&self, id: &str, project_filter: Option<&str>) -> Result<Session> {
        let sessions = self.discover(project_filter)?;
        if let Some(exact) = sessions.iter().find(|s| s.id == id) {
            return self.load(exact);
        }

        let matches: Vec<&SessionMetadata> =
            sessions.iter().filter(|s| s.id.starts_with(id)).collect();
        match matches.as_slice() {
            [only] => self.load(only),
            [] => Err(SessionError::NotFound(format!("no session with id '{id}'"))),
            many => Err(SessionError::NotFound(format!(
                "session id prefix '{id}' is ambiguous ({} matches)",
                many.len()
            ))),
        }
    }
}
