//! Session Gate: decides whether a usable credential exists.
//!
//! The token lives in a single session file. [`Session::open`] reads it,
//! classifies it as absent / valid / expired / malformed, and removes any
//! invalid token it finds so the next run starts from a clean login. The
//! resulting [`Session`] is the only way the fetcher gets at a bearer token.

pub mod token;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config::expand_home;
use crate::config::schema::SessionConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::events::EventLog;

pub use token::{Token, TokenError};

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Where a stored credential stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No token stored.
    Absent,
    /// Well-formed and not past its `exp`.
    Valid(Token),
    /// Well-formed but past its `exp`.
    Expired,
    /// Stored value is not a three-segment token with a JSON payload.
    Malformed,
}

impl SessionState {
    /// Classify a stored value at the given instant.
    pub fn evaluate(raw: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::Absent;
        };
        match Token::parse(raw) {
            Ok(token) if token.is_expired_at(now) => Self::Expired,
            Ok(token) => Self::Valid(token),
            Err(_) => Self::Malformed,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Valid(_) => write!(f, "valid"),
            Self::Expired => write!(f, "expired"),
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Token storage
// ---------------------------------------------------------------------------

/// File-backed storage for the single session token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::at(expand_home(&config.path))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw stored value, or `None` if the file is missing or unreadable.
    pub fn read_raw(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    /// Persist a token, replacing any previous one.
    pub fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create session directory")?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        file.write_all(token.as_str().as_bytes())
            .context("failed to write session token")?;
        Ok(())
    }

    /// Remove the stored token. A missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

/// The session for one pipeline run.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Check the stored token at `now`.
    ///
    /// A quote-wrapped token is rewritten unquoted; an expired or malformed
    /// one is deleted.
    pub fn open(store: &SessionStore, now: DateTime<Utc>, log: &EventLog) -> Self {
        let raw = store.read_raw();
        let state = SessionState::evaluate(raw.as_deref(), now);

        match &state {
            SessionState::Valid(token) => {
                if raw.as_deref().map(str::trim) != Some(token.as_str()) {
                    log_store_outcome(log, store.save(token), "unquoted");
                }
                log.debug("session_check", "valid", None);
            }
            SessionState::Absent => log.debug("session_check", "absent", None),
            SessionState::Expired | SessionState::Malformed => {
                log.info("session_check", &state.to_string(), None);
                log_store_outcome(log, store.clear(), "removed");
            }
        }

        Self { state }
    }

    /// A session wrapping an already-known state.
    pub fn from_state(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The bearer token, or `SessionInvalid` when the gate is closed.
    pub fn token(&self) -> DashboardResult<&Token> {
        match &self.state {
            SessionState::Valid(token) => Ok(token),
            other => Err(DashboardError::SessionInvalid(other.clone())),
        }
    }
}

/// Log a token rewrite or removal made during a session check.
fn log_store_outcome(log: &EventLog, result: Result<()>, done: &str) {
    match result {
        Ok(()) => log.debug("session_check", done, None),
        Err(e) => log.warn("session_check", "store_failed", Some(&format!("{e:#}"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
