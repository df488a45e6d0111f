//! JSON API handlers for the web surface.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::config::schema::DashboardConfig;
use crate::events::EventLog;
use crate::pipeline;

use super::content_type_json;

/// Build a JSON response with the given status.
fn json_response<T: Serialize>(data: &T, status: u16) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

/// `GET /api/stats`: the computed statistics for the signed-in student.
///
/// 401 when the session is not valid, 502 when the platform call fails.
pub fn get_stats(config: &DashboardConfig, log: &EventLog) -> Result<Response<Cursor<Vec<u8>>>> {
    let session = pipeline::open_session(config, log);
    match pipeline::load_dashboard(config, &session, log) {
        Ok(dashboard) => json_response(&dashboard.report(), 200),
        Err(e) => {
            let status = if e.requires_login() { 401 } else { 502 };
            json_response(&serde_json::json!({ "error": e.to_string() }), status)
        }
    }
}
