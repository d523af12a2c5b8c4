//! Configuration file and projects-root resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::format::OutputFormat;
use crate::session::{SessionNaming, StoreConfig};

/// Environment variable overriding the projects root.
pub const PROJECTS_DIR_ENV: &str = "SESSIONSCRIBE_PROJECTS_DIR";

const CONFIG_FILE: &str = "config.yaml";

/// User configuration, read from `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory holding one subdirectory per project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,
    /// Format used by `show` when `--format` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_suffix: Option<String>,
}

impl Config {
    /// Default location of the config file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sessionscribe").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the config file at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load the config file from its default location.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the projects root: flag, then environment, then config file,
    /// then `~/.claude/projects`.
    pub fn resolve_projects_dir(
        &self,
        flag: Option<&Path>,
        env: Option<PathBuf>,
    ) -> Result<PathBuf> {
        if let Some(dir) = flag {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = env.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(dir) = &self.projects_dir {
            return Ok(dir.clone());
        }
        default_projects_dir()
    }

    /// Build the store configuration injected into discovery and loading.
    pub fn store_config(&self, flag: Option<&Path>, env: Option<PathBuf>) -> Result<StoreConfig> {
        let mut naming = SessionNaming::default();
        if let Some(prefix) = &self.session_prefix {
            naming.prefix = prefix.clone();
        }
        if let Some(suffix) = &self.session_suffix {
            naming.suffix = suffix.clone();
        }
        Ok(StoreConfig {
            projects_dir: self.resolve_projects_dir(flag, env)?,
            naming,
        })
    }
}

/// `~/.claude/projects` for the current user.
pub fn default_projects_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("Could not determine home directory")?;
    Ok(base.home_dir().join(".claude").join("projects"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "projects_dir: /data/projects\ndefault_format: json\nsession_prefix: \"session-\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.projects_dir, Some(PathBuf::from("/data/projects")));
        assert_eq!(config.default_format, Some(OutputFormat::Json));
        assert_eq!(config.session_prefix.as_deref(), Some("session-"));
        assert!(config.session_suffix.is_none());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "projects_dir: [unclosed\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_unknown_key_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "projets_dir: /typo\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_resolution_order() {
        let config = Config {
            projects_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };

        let dir = config
            .resolve_projects_dir(Some(Path::new("/from/flag")), Some(PathBuf::from("/from/env")))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/from/flag"));

        let dir = config
            .resolve_projects_dir(None, Some(PathBuf::from("/from/env")))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/from/env"));

        let dir = config.resolve_projects_dir(None, Some(PathBuf::new())).unwrap();
        assert_eq!(dir, PathBuf::from("/from/config"));
    }

    #[test]
    fn test_store_config_naming() {
        let config = Config {
            session_suffix: Some(".log".to_string()),
            ..Config::default()
        };
        let store = config.store_config(Some(Path::new("/root")), None).unwrap();
        assert_eq!(store.projects_dir, PathBuf::from("/root"));
        assert_eq!(store.naming.suffix, ".log");
        assert_eq!(store.naming.prefix, "");
        assert_eq!(store.naming.excluded_prefixes, vec!["agent-".to_string()]);
    }
}
