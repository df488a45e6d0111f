//! Error taxonomy for the dashboard pipeline.
//!
//! Each stage of authenticate → query → transform → render fails with one of
//! these variants. The CLI wraps them in `anyhow` at the boundary; the web
//! surface maps them to redirects or error pages.

use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Sign-in rejected, transport failure during sign-in, or a malformed
    /// token came back from the auth endpoint.
    #[error("login failed: {0}")]
    AuthFailure(String),
    /// The stored session token is missing, expired, or malformed.
    #[error("session is not valid ({0})")]
    SessionInvalid(SessionState),
    /// Network error, non-JSON body, GraphQL errors, or no user record.
    #[error("failed to load student data: {0}")]
    FetchFailure(String),
    /// The response does not match the expected record shapes.
    #[error("unexpected data shape: {0}")]
    DataShapeFailure(String),
}

impl DashboardError {
    /// Whether the error should send the user back to the login step
    /// rather than being displayed in place.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionInvalid(_))
    }
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_session_errors_require_login() {
        assert!(DashboardError::SessionInvalid(SessionState::Absent).requires_login());
        assert!(DashboardError::SessionInvalid(SessionState::Expired).requires_login());
        assert!(!DashboardError::AuthFailure("nope".into()).requires_login());
        assert!(!DashboardError::FetchFailure("down".into()).requires_login());
    }

    #[test]
    fn messages_carry_detail() {
        let err = DashboardError::AuthFailure("User does not exist".into());
        assert_eq!(err.to_string(), "login failed: User does not exist");

        let err = DashboardError::SessionInvalid(SessionState::Malformed);
        assert_eq!(err.to_string(), "session is not valid (malformed)");
    }
}
