//! Record Fetcher: the one GraphQL round trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DashboardError, DashboardResult};
use crate::events::EventLog;
use crate::records::QueryData;
use crate::session::Session;

use super::query::{STUDENT_RECORD_QUERY, variables};
use super::{PlatformClient, body_text};

/// Request body for the GraphQL endpoint.
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// One entry of the `errors` array.
#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

impl PlatformClient {
    /// Fetch the signed-in student's records.
    ///
    /// Requires a valid session. Any entry in the response's `errors` array
    /// fails the whole fetch; partial data is never used.
    pub fn fetch_records(
        &self,
        session: &Session,
        event_path: &str,
        log: &EventLog,
    ) -> DashboardResult<QueryData> {
        let token = session.token()?;

        let body = GraphQlRequest {
            query: STUDENT_RECORD_QUERY,
            variables: variables(event_path),
        };

        let result = ureq::post(&self.graphql_url)
            .timeout(self.timeout)
            .set("Content-Type", "application/json")
            .set("Authorization", &token.bearer_header())
            .send_json(&body);

        let text = match result {
            Ok(response) => response.into_string().map_err(|e| {
                log.error("fetch", "read_body", Some(&e.to_string()));
                DashboardError::FetchFailure(format!("failed to read response: {e}"))
            })?,
            // Error envelopes may arrive with a non-2xx status; parse them
            // the same way so the GraphQL message is surfaced.
            Err(ureq::Error::Status(code, response)) => {
                let text = body_text(response);
                if serde_json::from_str::<Value>(&text).is_err() {
                    log.error("fetch", "http_status", Some(&format!("status={code}")));
                    return Err(DashboardError::FetchFailure(format!(
                        "GraphQL endpoint answered HTTP {code}"
                    )));
                }
                text
            }
            Err(ureq::Error::Transport(transport)) => {
                log.error("fetch", "network", Some(&transport.to_string()));
                return Err(DashboardError::FetchFailure(format!(
                    "network error: {transport}"
                )));
            }
        };

        match parse_response(&text) {
            Ok(data) => {
                log.info("fetch", "ok", Some(&format!("users={}", data.user.len())));
                Ok(data)
            }
            Err(e) => {
                log.error("fetch", "rejected", Some(&e.to_string()));
                Err(e)
            }
        }
    }
}

/// Validate a GraphQL response envelope and decode its `data`.
///
/// Non-JSON bodies and `errors` entries are fetch failures; a `data` object
/// that does not match the typed records is a data-shape failure.
pub fn parse_response(text: &str) -> DashboardResult<QueryData> {
    let envelope: Value = serde_json::from_str(text)
        .map_err(|e| DashboardError::FetchFailure(format!("response is not JSON: {e}")))?;

    if let Some(errors) = envelope.get("errors").filter(|e| !e.is_null()) {
        let errors: Vec<GraphQlError> = serde_json::from_value(errors.clone()).unwrap_or_default();
        let message = errors
            .first()
            .map(describe_error)
            .unwrap_or_else(|| "GraphQL returned errors".to_string());
        return Err(DashboardError::FetchFailure(message));
    }

    let data = match envelope.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => {
            return Err(DashboardError::FetchFailure(
                "response has no data".to_string(),
            ));
        }
    };

    serde_json::from_value(data).map_err(|e| DashboardError::DataShapeFailure(e.to_string()))
}

fn describe_error(error: &GraphQlError) -> String {
    let code = error
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .and_then(Value::as_str);
    match code {
        Some(code) if !error.message.is_empty() => format!("{} ({code})", error.message),
        Some(code) => code.to_string(),
        None if !error.message.is_empty() => error.message.clone(),
        None => "GraphQL returned errors".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
