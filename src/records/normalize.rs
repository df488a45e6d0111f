//! Record Normalizer: picks the subject and resolves derived profile data.

use crate::error::{DashboardError, DashboardResult};
use crate::events::EventLog;

use super::{Attributes, EventMembership, QueryData, Subject};

/// Build the [`Subject`] from a query result.
///
/// Takes the first `user` row; an empty list means the query saw no user
/// and is reported as a fetch failure. The official level comes from the
/// membership whose login matches and whose event path equals
/// `event_path`, defaulting to 0. An unparsable attribute blob is replaced
/// by an empty attribute set.
pub fn normalize(data: QueryData, event_path: &str, log: &EventLog) -> DashboardResult<Subject> {
    let QueryData { user, event_user } = data;

    let Some(raw) = user.into_iter().next() else {
        log.error("normalize", "no_user", None);
        return Err(DashboardError::FetchFailure(
            "the query returned no user record".to_string(),
        ));
    };

    let attributes = match Attributes::from_value(&raw.attrs) {
        Ok(attrs) => attrs,
        Err(reason) => {
            log.warn("normalize", "attrs_unparsable", Some(&reason));
            Attributes::default()
        }
    };

    let official_level = official_level(&event_user, &raw.login, event_path);

    log.debug(
        "normalize",
        "ok",
        Some(&format!(
            "login={} transactions={} progresses={} audits={} level={}",
            raw.login,
            raw.transactions.len(),
            raw.progresses.len(),
            raw.audits.len(),
            official_level
        )),
    );

    Ok(Subject {
        id: raw.id,
        login: raw.login,
        attributes,
        public: raw.public.unwrap_or_default(),
        avatar_url: raw.avatar_url.filter(|url| !url.trim().is_empty()),
        campus: raw.campus,
        created_at: raw.created_at,
        audit_ratio: raw.audit_ratio.filter(|r| r.is_finite()).unwrap_or(0.0),
        total_up: raw.total_up,
        total_down: raw.total_down,
        transactions: raw.transactions,
        progresses: raw.progresses,
        audits: raw.audits,
        official_level,
    })
}

/// Level recorded for `login` in the event at `event_path`, or 0.
pub fn official_level(memberships: &[EventMembership], login: &str, event_path: &str) -> i64 {
    memberships
        .iter()
        .find(|m| {
            m.user_login == login
                && m.event.as_ref().is_some_and(|event| event.path == event_path)
        })
        .map(|m| m.level)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
