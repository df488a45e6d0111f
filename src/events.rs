//! Activity event log: one JSON line per pipeline event.
//!
//! Records logins, session checks, fetches, and renders so a failed
//! dashboard load can be diagnosed after the fact. Writing is best-effort:
//! failures are silently ignored and never interrupt the pipeline.
//!
//! Log file: `~/.xpdash/events.jsonl` (see `[logging]` in the config).

use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::expand_home;
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a level name, defaulting to `Info` for anything unknown.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// A single line in the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub timestamp: String,
    pub level: Level,
    /// Pipeline stage: `login`, `logout`, `session_check`, `fetch`,
    /// `normalize`, `render`, `serve`.
    pub event: String,
    /// Short outcome tag, e.g. `ok`, `rejected`, `expired`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Handle to the event log, resolved once from config and passed down the
/// pipeline.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
    min_level: Level,
}

impl EventLog {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            path: config.enabled.then(|| expand_home(&config.path)),
            min_level: Level::parse(&config.level),
        }
    }

    /// A log that drops everything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            min_level: Level::Error,
        }
    }

    /// A log writing to an explicit file.
    pub fn at(path: impl Into<PathBuf>, min_level: Level) -> Self {
        Self {
            path: Some(path.into()),
            min_level,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn record(&self, level: Level, event: &str, outcome: &str, detail: Option<&str>) {
        if level < self.min_level {
            return;
        }
        let entry = EventEntry {
            timestamp: Utc::now().to_rfc3339(),
            level,
            event: event.to_string(),
            outcome: outcome.to_string(),
            detail: detail.map(str::to_string),
        };
        let _ = self.append(&entry);
    }

    pub fn debug(&self, event: &str, outcome: &str, detail: Option<&str>) {
        self.record(Level::Debug, event, outcome, detail);
    }

    pub fn info(&self, event: &str, outcome: &str, detail: Option<&str>) {
        self.record(Level::Info, event, outcome, detail);
    }

    pub fn warn(&self, event: &str, outcome: &str, detail: Option<&str>) {
        self.record(Level::Warn, event, outcome, detail);
    }

    pub fn error(&self, event: &str, outcome: &str, detail: Option<&str>) {
        self.record(Level::Error, event, outcome, detail);
    }

    /// Read every entry, skipping malformed lines.
    pub fn read_all(&self) -> Vec<EventEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<EventEntry>(&line).ok())
            .collect()
    }

    fn append(&self, entry: &EventEntry) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

/// First 20 characters of a token, for log lines.
pub fn token_preview(token: &str) -> String {
    let preview: String = token.chars().take(20).collect();
    format!("{preview}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
