//! sessionscribe library - Claude Code session transcripts.
//!
//! This crate discovers transcript files under a projects directory, parses
//! their line-delimited JSON records, normalizes them into a single message
//! model, and renders sessions as markdown, JSON, or text.

pub mod cli;
pub mod config;
pub mod format;
pub mod session;
