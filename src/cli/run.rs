//! Command handlers.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::info;

use super::args::{Cli, Command, ListArgs, ShowArgs};
use crate::config::{Config, PROJECTS_DIR_ENV};
use crate::format::{render, OutputFormat};
use crate::session::{Session, SessionMetadata, SessionStore};

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_default()?;
    let env_dir = std::env::var_os(PROJECTS_DIR_ENV).map(PathBuf::from);
    let store_config = config.store_config(cli.projects_dir.as_deref(), env_dir)?;
    info!(root = %store_config.projects_dir.display(), "using projects directory");
    let store = SessionStore::new(store_config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::List(args) => run_list(&store, &args, &mut out),
        Command::Show(args) => run_show(&store, &config, &args, Utc::now(), &mut out),
        Command::Config => run_config(&store, &config, &mut out),
    }
}

fn run_list(store: &SessionStore, args: &ListArgs, out: &mut impl Write) -> Result<()> {
    let mut sessions = store.discover(args.project.as_deref())?;
    if let Some(limit) = args.limit {
        sessions.truncate(limit);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&sessions).context("Failed to serialize sessions")?;
        writeln!(out, "{json}")?;
        return Ok(());
    }

    if sessions.is_empty() {
        writeln!(out, "No sessions found in {}", store.config().projects_dir.display())?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<38} {:<30} {:<17} {:>6} {:>9}",
        "ID", "PROJECT", "MODIFIED", "LINES", "SIZE"
    )?;
    for meta in &sessions {
        writeln!(out, "{}", list_row(meta))?;
    }
    Ok(())
}

fn list_row(meta: &SessionMetadata) -> String {
    format!(
        "{:<38} {:<30} {:<17} {:>6} {:>9}",
        meta.id,
        meta.project_name,
        meta.last_modified.format("%Y-%m-%d %H:%M"),
        meta.message_count,
        human_size(meta.size_bytes)
    )
}

fn run_show(
    store: &SessionStore,
    config: &Config,
    args: &ShowArgs,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let cutoff = args
        .since
        .as_deref()
        .map(|s| parse_since(s, now))
        .transpose()?;

    let mut session = select_session(store, args)?;
    if let Some(cutoff) = cutoff {
        session.retain_since(cutoff);
    }

    let format = args
        .format
        .or(config.default_format)
        .unwrap_or(OutputFormat::Markdown);
    let rendered = render(&session, format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote session {}", session.metadata.id);
        }
        None => out.write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn select_session(store: &SessionStore, args: &ShowArgs) -> Result<Session> {
    let session = match (&args.id, &args.project) {
        (Some(id), project) => store.load_by_id(id, project.as_deref())?,
        (None, Some(project)) => store.load_by_project(project)?,
        (None, None) => store.load_most_recent()?,
    };
    Ok(session)
}

fn run_config(store: &SessionStore, config: &Config, out: &mut impl Write) -> Result<()> {
    let resolved = Config {
        projects_dir: Some(store.config().projects_dir.clone()),
        default_format: Some(config.default_format.unwrap_or_default()),
        session_prefix: Some(store.config().naming.prefix.clone()),
        session_suffix: Some(store.config().naming.suffix.clone()),
    };
    if let Some(path) = Config::default_path() {
        writeln!(out, "# {}", path.display())?;
    }
    let yaml = serde_yaml::to_string(&resolved).context("Failed to serialize config")?;
    write!(out, "{yaml}")?;
    Ok(())
}

/// Parse a `--since` value relative to `now`.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` dates (midnight UTC), and
/// relative durations such as `30m`, `2h`, or `7d`.
pub fn parse_since(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    let Some(unit) = value.chars().last() else {
        bail!("empty --since value");
    };
    let amount: i64 = value[..value.len() - unit.len_utf8()]
        .parse()
        .with_context(|| format!("Invalid --since value: '{value}'"))?;
    if amount <= 0 {
        bail!("Invalid --since value: '{value}' (duration must be positive)");
    }
    let duration = match unit {
        'm' => TimeDelta::try_minutes(amount),
        'h' => TimeDelta::try_hours(amount),
        'd' => TimeDelta::try_days(amount),
        _ => bail!("Invalid --since value: '{value}' (expected RFC 3339, YYYY-MM-DD, or <n>m/h/d)"),
    };
    match duration.and_then(|d| now.checked_sub_signed(d)) {
        Some(cutoff) => Ok(cutoff),
        None => bail!("Invalid --since value: '{value}' (duration out of range)"),
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StoreConfig;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn show_args() -> ShowArgs {
        ShowArgs {
            id: None,
            project: None,
            format: None,
            since: None,
            output: None,
        }
    }

    fn store_with_session(temp: &TempDir, body: &str) -> SessionStore {
        let dir = temp.path().join("demo");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("s1.jsonl"), body).unwrap();
        SessionStore::new(StoreConfig::new(temp.path()))
    }

    #[test]
    fn test_parse_since_rfc3339() {
        let ts = parse_since("2025-03-01T08:00:00+02:00", now()).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_since_date() {
        let ts = parse_since("2025-03-01", now()).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_since_relative() {
        assert_eq!(parse_since("30m", now()).unwrap(), now() - TimeDelta::minutes(30));
        assert_eq!(parse_since("2h", now()).unwrap(), now() - TimeDelta::hours(2));
        assert_eq!(parse_since("7d", now()).unwrap(), now() - TimeDelta::days(7));
    }

    #[test]
    fn test_parse_since_invalid() {
        assert!(parse_since("", now()).is_err());
        assert!(parse_since("yesterday", now()).is_err());
        assert!(parse_since("5w", now()).is_err());
    }

    #[test]
    fn test_parse_since_out_of_range() {
        for value in ["1000000000d", "9223372036854775807m", "-5d", "0h"] {
            let err = parse_since(value, now()).unwrap_err();
            assert!(
                err.to_string().contains("Invalid --since value"),
                "unexpected error for {value}: {err}"
            );
        }
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_show_applies_since() {
        let temp = TempDir::new().unwrap();
        let store = store_with_session(
            &temp,
            concat!(
                "{\"type\":\"user\",\"content\":\"early\",\"timestamp\":\"2025-03-01T00:00:00Z\"}\n",
                "{\"type\":\"assistant\",\"content\":\"late\",\"timestamp\":\"2025-03-09T00:00:00Z\"}\n",
                "{\"type\":\"assistant\",\"content\":\"untimed\"}\n",
            ),
        );
        let args = ShowArgs {
            format: Some(OutputFormat::Text),
            since: Some("2025-03-05".to_string()),
            ..show_args()
        };

        let mut out = Vec::new();
        run_show(&store, &Config::default(), &args, now(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "[assistant] late\n[assistant] untimed\n");
    }

    #[test]
    fn test_show_uses_config_default_format() {
        let temp = TempDir::new().unwrap();
        let store = store_with_session(&temp, "{\"type\":\"user\",\"content\":\"hi\"}\n");
        let config = Config {
            default_format: Some(OutputFormat::Json),
            ..Config::default()
        };

        let mut out = Vec::new();
        run_show(&store, &config, &show_args(), now(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_show_writes_output_file() {
        let temp = TempDir::new().unwrap();
        let store = store_with_session(&temp, "{\"type\":\"user\",\"content\":\"hi\"}\n");
        let target = temp.path().join("out.md");
        let args = ShowArgs {
            output: Some(target.clone()),
            ..show_args()
        };

        let mut out = Vec::new();
        run_show(&store, &Config::default(), &args, now(), &mut out).unwrap();
        assert!(out.is_empty());
        let written = std::fs::read_to_string(target).unwrap();
        assert!(written.starts_with("# Session s1"));
    }

    #[test]
    fn test_list_empty() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(StoreConfig::new(temp.path().join("missing")));
        let args = ListArgs {
            project: None,
            limit: None,
            json: false,
        };

        let mut out = Vec::new();
        run_list(&store, &args, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("No sessions found"));
    }

    #[test]
    fn test_list_json_limit() {
        let temp = TempDir::new().unwrap();
        let store = store_with_session(&temp, "{\"type\":\"user\",\"content\":\"hi\"}\n");
        std::fs::write(temp.path().join("demo").join("s2.jsonl"), "x\n").unwrap();
        let args = ListArgs {
            project: None,
            limit: Some(1),
            json: true,
        };

        let mut out = Vec::new();
        run_list(&store, &args, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["projectName"], "demo");
    }
}
