//! Command-line argument definitions.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::format::OutputFormat;

/// Discover, normalize, and render Claude Code session transcripts.
#[derive(Parser, Debug)]
#[command(name = "sessionscribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding one subdirectory per project (default: ~/.claude/projects).
    #[arg(long, global = true, value_name = "DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List discovered sessions, most recent first.
    List(ListArgs),

    /// Render one session.
    Show(ShowArgs),

    /// Print the resolved configuration.
    Config,
}

/// Arguments for the list command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only include projects whose name contains this text (case-insensitive).
    #[arg(long, short)]
    pub project: Option<String>,

    /// Show at most this many sessions.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print metadata as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the show command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Session id or unambiguous id prefix. Defaults to the most recent session.
    pub id: Option<String>,

    /// Pick the most recent session of a matching project.
    #[arg(long, short)]
    pub project: Option<String>,

    /// Output format.
    #[arg(long, short, value_enum)]
    pub format: Option<OutputFormat>,

    /// Only keep messages after this time (RFC 3339, YYYY-MM-DD, or 30m/2h/7d).
    #[arg(long)]
    pub since: Option<String>,

    /// Write to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
