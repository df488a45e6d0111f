//! The dashboard pipeline: authenticate → query → transform → render.
//!
//! Each function here is one step the CLI and the web surface share. All
//! state lives in the values passed between steps; nothing is cached across
//! runs except the session token on disk.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::api::PlatformClient;
use crate::config::schema::DashboardConfig;
use crate::error::DashboardResult;
use crate::events::EventLog;
use crate::records::{Subject, normalize::normalize};
use crate::render::{RenderOptions, render_dashboard};
use crate::session::{Session, SessionStore, Token};
use crate::stats::{DashboardStats, StatsSettings, XpFilter};

/// A normalized subject with its statistics.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub subject: Subject,
    pub stats: DashboardStats,
}

/// Machine-readable dashboard for `--format json` and `/api/stats`.
#[derive(Debug, Serialize)]
pub struct DashboardReport<'a> {
    pub login: &'a str,
    pub full_name: String,
    pub level: i64,
    pub campus: String,
    pub stats: &'a DashboardStats,
}

impl Dashboard {
    pub fn report(&self) -> DashboardReport<'_> {
        DashboardReport {
            login: &self.subject.login,
            full_name: self.subject.full_name(),
            level: self.subject.official_level,
            campus: self.subject.campus_label(),
            stats: &self.stats,
        }
    }

    pub fn to_html(&self, config: &DashboardConfig) -> String {
        render_dashboard(&self.subject, &self.stats, &RenderOptions::from_config(config))
    }
}

/// Check the stored token now.
pub fn open_session(config: &DashboardConfig, log: &EventLog) -> Session {
    Session::open(&SessionStore::from_config(&config.session), Utc::now(), log)
}

/// Sign in and store the returned token.
pub fn login(config: &DashboardConfig, username: &str, password: &str, log: &EventLog) -> Result<Token> {
    let client = PlatformClient::from_config(&config.api);
    let token = client.sign_in(username, password, log)?;
    let store = SessionStore::from_config(&config.session);
    store
        .save(&token)
        .with_context(|| format!("failed to store session at {}", store.path().display()))?;
    Ok(token)
}

/// Remove the stored token.
pub fn logout(config: &DashboardConfig, log: &EventLog) -> Result<()> {
    SessionStore::from_config(&config.session).clear()?;
    log.info("logout", "ok", None);
    Ok(())
}

/// Fetch, normalize and compute. Fails with `SessionInvalid` before any
/// network call when the session is not valid.
pub fn load_dashboard(config: &DashboardConfig, session: &Session, log: &EventLog) -> DashboardResult<Dashboard> {
    let client = PlatformClient::from_config(&config.api);
    let data = client.fetch_records(session, &config.campus.event_path, log)?;
    build_dashboard(data, config, log)
}

/// The transform half of the pipeline, from a decoded query result.
pub fn build_dashboard(
    data: crate::records::QueryData,
    config: &DashboardConfig,
    log: &EventLog,
) -> DashboardResult<Dashboard> {
    let subject = normalize(data, &config.campus.event_path, log)?;
    let stats = DashboardStats::compute(
        &subject,
        &XpFilter::from_config(&config.campus),
        &StatsSettings::from_config(&config.dashboard, &config.chart),
    );
    Ok(Dashboard { subject, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::graphql::parse_response;
    use crate::error::DashboardError;
    use crate::session::SessionState;

    const RESPONSE: &str = r#"{"data": {
        "user": [{
            "id": 7, "login": "jdoe", "createdAt": "2023-09-01T08:00:00Z",
            "attrs": "{\"country\": \"France\"}",
            "auditRatio": 0.8, "totalUp": 800, "totalDown": 1000,
            "campus": "rouen",
            "transactions": [
                {"id": 1, "type": "xp", "amount": 100, "objectId": 10, "createdAt": "2024-01-01T00:00:00Z", "path": "/rouen/div-01/piscine-js"},
                {"id": 2, "type": "xp", "amount": 50, "objectId": 20, "createdAt": "2024-01-02T00:00:00Z", "path": "/rouen/div-01/other"},
                {"id": 3, "type": "xp", "amount": 30, "objectId": 30, "createdAt": "2024-01-03T00:00:00Z", "path": "/rouen/div-01/piscine-go/x"}
            ],
            "progresses": [], "audits": []
        }],
        "event_user": [{"level": 9, "userLogin": "jdoe", "event": {"path": "/rouen/div-01"}}]
    }}"#;

    #[test]
    fn response_to_dashboard() {
        let data = parse_response(RESPONSE).unwrap();
        let dashboard = build_dashboard(data, &DashboardConfig::default(), &EventLog::disabled()).unwrap();

        assert_eq!(dashboard.stats.xp.total, 150);
        assert_eq!(dashboard.subject.official_level, 9);
        assert_eq!(dashboard.subject.location(), "France");

        let report = serde_json::to_value(dashboard.report()).unwrap();
        assert_eq!(report["login"], "jdoe");
        assert_eq!(report["stats"]["audits"]["category"], "good");
    }

    #[test]
    fn invalid_session_stops_before_fetch() {
        let session = Session::from_state(SessionState::Expired);
        let err = load_dashboard(&DashboardConfig::default(), &session, &EventLog::disabled()).unwrap_err();
        assert!(matches!(err, DashboardError::SessionInvalid(SessionState::Expired)));
    }
}
