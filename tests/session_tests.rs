/// Session gate tests.
///
/// Token validity is checked against a fixed instant; the store is backed by
/// a temporary directory.
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use xpdash::events::{EventLog, Level};
use xpdash::session::{Session, SessionState, SessionStore, Token};
use xpdash::DashboardError;

fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_750_000_000, 0).unwrap()
}

fn token_with(payload: &str) -> String {
    format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
}

// ---------------------------------------------------------------------------
// Token validity
// ---------------------------------------------------------------------------

#[test]
fn two_segments_is_malformed() {
    assert_eq!(SessionState::evaluate(Some("a.b"), now()), SessionState::Malformed);
}

#[test]
fn past_exp_is_expired() {
    let raw = token_with(r#"{"exp": 1000}"#);
    assert_eq!(SessionState::evaluate(Some(&raw), now()), SessionState::Expired);
}

#[test]
fn no_exp_is_valid() {
    let raw = token_with(r#"{"sub": "42"}"#);
    let state = SessionState::evaluate(Some(&raw), now());
    assert!(state.is_valid());
}

#[test]
fn future_exp_is_valid() {
    let raw = token_with(r#"{"exp": 1900000000}"#);
    let token = Token::parse(&raw).unwrap();
    assert!(!token.is_expired_at(now()));
    assert_eq!(token.bearer_header(), format!("Bearer {raw}"));
}

#[test]
fn undecodable_payload_is_malformed() {
    assert_eq!(
        SessionState::evaluate(Some("a.!!!.c"), now()),
        SessionState::Malformed
    );
    assert_eq!(SessionState::evaluate(None, now()), SessionState::Absent);
    assert_eq!(SessionState::evaluate(Some("  "), now()), SessionState::Absent);
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[test]
fn quoted_token_is_rewritten() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::at(dir.path().join("session.token"));
    let raw = token_with(r#"{"exp": 1900000000}"#);
    std::fs::write(store.path(), format!("\"{raw}\"")).unwrap();

    let session = Session::open(&store, now(), &EventLog::disabled());
    assert!(session.state().is_valid());
    assert_eq!(store.read_raw().as_deref(), Some(raw.as_str()));
}

#[test]
fn expired_token_is_removed() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::at(dir.path().join("session.token"));
    std::fs::write(store.path(), token_with(r#"{"exp": 10}"#)).unwrap();

    let session = Session::open(&store, now(), &EventLog::disabled());
    assert_eq!(session.state(), &SessionState::Expired);
    assert!(!store.path().exists());
    assert!(matches!(
        session.token(),
        Err(DashboardError::SessionInvalid(SessionState::Expired))
    ));
}

#[test]
fn save_then_open_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::at(dir.path().join("nested/session.token"));
    let token = Token::parse(&token_with(r#"{"exp": 1900000000}"#)).unwrap();

    store.save(&token).unwrap();
    let session = Session::open(&store, now(), &EventLog::disabled());
    assert_eq!(session.token().unwrap().as_str(), token.as_str());

    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(
        Session::open(&store, now(), &EventLog::disabled()).state(),
        &SessionState::Absent
    );
}

#[test]
fn session_checks_are_logged() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::at(dir.path().join("events.jsonl"), Level::Debug);
    let store = SessionStore::at(dir.path().join("session.token"));
    std::fs::write(store.path(), "not-a-token").unwrap();

    Session::open(&store, now(), &log);
    let entries = log.read_all();
    assert!(
        entries
            .iter()
            .any(|e| e.event == "session_check" && e.outcome == "malformed")
    );
}
