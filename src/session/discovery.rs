//! Session discovery.
//!
//! The projects root holds one directory per project, each containing zero or
//! more transcript files plus auxiliary files that are ignored:
//!
//! ```text
//! <root>/
//!   -home-me-app/
//!     3f2a....jsonl        <- session "3f2a..."
//!     agent-7c1d.jsonl     <- agent transcript, skipped
//! ```
//!
//! Discovery only reads enough of each file to fill in [`SessionMetadata`].
//! Failures on individual entries skip that entry; only failing to list the
//! root itself is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use super::error::{Result, SessionError};
use super::models::SessionMetadata;

/// File naming convention for transcript files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNaming {
    pub prefix: String,
    pub suffix: String,
    /// Names starting with any of these are auxiliary files.
    pub excluded_prefixes: Vec<String>,
}

impl Default for SessionNaming {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: ".jsonl".to_string(),
            excluded_prefixes: vec!["agent-".to_string()],
        }
    }
}

impl SessionNaming {
    /// Session id for a candidate file name, or `None` if the name does not
    /// follow the convention.
    pub fn session_id<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if self
            .excluded_prefixes
            .iter()
            .any(|p| file_name.starts_with(p.as_str()))
        {
            return None;
        }
        let id = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

/// Where and how to look for transcripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory with one subdirectory per project.
    pub projects_dir: PathBuf,
    pub naming: SessionNaming,
}

impl StoreConfig {
    /// Config for `projects_dir` with the default naming convention.
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            naming: SessionNaming::default(),
        }
    }
}

/// Find transcripts under the configured root, most recently modified first.
///
/// `project_filter` is a case-insensitive substring matched against project
/// directory names. A missing root yields an empty list.
pub fn discover(config: &StoreConfig, project_filter: Option<&str>) -> Result<Vec<SessionMetadata>> {
    let root = &config.projects_dir;
    if !root.exists() {
        debug!(root = %root.display(), "projects directory does not exist");
        return Ok(Vec::new());
    }

    let filter = project_filter.map(str::to_lowercase);
    let stat = fs::metadata(root).map_err(|e| SessionError::io(root, e))?;
    if !stat.is_dir() {
        return Err(SessionError::io(
            root,
            io::Error::new(io::ErrorKind::Other, "projects path is not a directory"),
        ));
    }

    let mut sessions = Vec::new();
    let entries = WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(SessionError::io(root, e.into())),
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry in projects directory");
                continue;
            }
        };
        let project_path = entry.path();
        if !project_path.is_dir() {
            continue;
        }
        let project_name = entry.file_name().to_string_lossy().into_owned();
        if let Some(filter) = &filter {
            if !project_name.to_lowercase().contains(filter.as_str()) {
                continue;
            }
        }
        scan_project(&config.naming, project_path, &project_name, &mut sessions);
    }

    sessions.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    debug!(count = sessions.len(), "discovered sessions");
    Ok(sessions)
}

fn scan_project(
    naming: &SessionNaming,
    project_path: &Path,
    project_name: &str,
    out: &mut Vec<SessionMetadata>,
) {
    let files = WalkDir::new(project_path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(project = project_name, error = %e, "skipping unreadable entry");
                None
            }
        });

    for file in files {
        let file_name = file.file_name().to_string_lossy();
        let Some(id) = naming.session_id(&file_name) else {
            continue;
        };
        if let Some(meta) = read_metadata(id, file.path(), project_path, project_name) {
            out.push(meta);
        }
    }
}

fn read_metadata(
    id: &str,
    file_path: &Path,
    project_path: &Path,
    project_name: &str,
) -> Option<SessionMetadata> {
    let stat = match fs::metadata(file_path) {
        Ok(stat) if stat.is_file() => stat,
        Ok(_) => return None,
        Err(e) => {
            debug!(path = %file_path.display(), error = %e, "skipping session: stat failed");
            return None;
        }
    };
    let Ok(modified) = stat.modified() else {
        debug!(path = %file_path.display(), "skipping session: no modification time");
        return None;
    };
    let content = match fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %file_path.display(), error = %e, "skipping session: read failed");
            return None;
        }
    };

    Some(SessionMetadata {
        id: id.to_string(),
        project_path: project_path.to_path_buf(),
        project_name: project_name.to_string(),
        file_path: file_path.to_path_buf(),
        last_modified: DateTime::<Utc>::from(modified),
        message_count: count_non_blank_lines(&content),
        size_bytes: stat.len(),
    })
}

fn count_non_blank_lines(content: &str) -> usize {
    content.lines().filter(|line| !line.trim().is_empty()).count()
}
