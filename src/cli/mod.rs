//! CLI module for sessionscribe.
//!
//! Defines command-line argument parsing and the command handlers.

pub mod args;
pub mod run;

pub use args::{Cli, Command};
pub use run::run;
