//! Sign-in call.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::{DashboardError, DashboardResult};
use crate::events::{EventLog, token_preview};
use crate::session::Token;
use crate::session::token::unquote;

use super::{PlatformClient, body_text};

impl PlatformClient {
    /// Exchange credentials for a bearer token.
    ///
    /// A non-2xx response body is surfaced verbatim as the failure message.
    pub fn sign_in(&self, username: &str, password: &str, log: &EventLog) -> DashboardResult<Token> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DashboardError::AuthFailure(
                "please enter both username/email and password".to_string(),
            ));
        }

        let result = ureq::post(&self.auth_url)
            .timeout(self.timeout)
            .set("Authorization", &basic_header(username, password))
            .call();

        match result {
            Ok(response) => {
                let body = response.into_string().map_err(|e| {
                    DashboardError::AuthFailure(format!("failed to read sign-in response: {e}"))
                })?;
                let token = parse_token_response(&body);
                match &token {
                    Ok(t) => log.info("login", "ok", Some(&format!("user={username} token={}", token_preview(t.as_str())))),
                    Err(_) => log.error("login", "bad_token", Some(&token_preview(&body))),
                }
                token
            }
            Err(ureq::Error::Status(code, response)) => {
                let message = rejection_message(&body_text(response));
                log.warn("login", "rejected", Some(&format!("status={code} user={username}")));
                Err(DashboardError::AuthFailure(message))
            }
            Err(ureq::Error::Transport(transport)) => {
                log.error("login", "network", Some(&transport.to_string()));
                Err(DashboardError::AuthFailure(format!(
                    "network error, please try again ({transport})"
                )))
            }
        }
    }
}

/// `Basic base64(username:password)`.
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", B64.encode(format!("{username}:{password}")))
}

/// The sign-in body is the raw token, possibly wrapped in quotes.
pub fn parse_token_response(body: &str) -> DashboardResult<Token> {
    Token::parse(unquote(body.trim()))
        .map_err(|e| DashboardError::AuthFailure(format!("invalid authentication token received: {e}")))
}

/// Failure text for a rejected sign-in.
pub fn rejection_message(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        "Invalid credentials".to_string()
    } else {
        body.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
