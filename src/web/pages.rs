//! HTML page handlers: dashboard, login, logout.

use std::io::Cursor;

use anyhow::Result;
use tiny_http::Response;

use crate::config::schema::DashboardConfig;
use crate::error::DashboardError;
use crate::events::EventLog;
use crate::pipeline;
use crate::render::{render_error, render_login};

use super::{html_response, parse_form, redirect};

/// `GET /`: the dashboard, or a redirect to the login page.
pub fn get_dashboard(config: &DashboardConfig, log: &EventLog) -> Result<Response<Cursor<Vec<u8>>>> {
    let session = pipeline::open_session(config, log);
    if !session.state().is_valid() {
        return Ok(redirect("/login"));
    }

    match pipeline::load_dashboard(config, &session, log) {
        Ok(dashboard) => {
            log.info("render", "ok", Some("web"));
            Ok(html_response(dashboard.to_html(config), 200))
        }
        Err(e) if e.requires_login() => Ok(redirect("/login")),
        Err(e) => Ok(html_response(render_error(&e.to_string()), 502)),
    }
}

/// `GET /login`: the form, or straight to the dashboard when signed in.
pub fn get_login(config: &DashboardConfig, log: &EventLog) -> Response<Cursor<Vec<u8>>> {
    if pipeline::open_session(config, log).state().is_valid() {
        return redirect("/");
    }
    html_response(render_login(None, ""), 200)
}

/// `POST /login`: sign in with the submitted form.
pub fn post_login(config: &DashboardConfig, log: &EventLog, body: &str) -> Response<Cursor<Vec<u8>>> {
    let form = parse_form(body);
    let username = form.get("username").map(String::as_str).unwrap_or("");
    let password = form.get("password").map(String::as_str).unwrap_or("");

    match pipeline::login(config, username, password, log) {
        Ok(_) => redirect("/"),
        Err(e) => {
            let message = match e.downcast_ref::<DashboardError>() {
                Some(DashboardError::AuthFailure(reason)) => reason.clone(),
                _ => e.to_string(),
            };
            html_response(render_login(Some(&message), username), 401)
        }
    }
}

/// `GET|POST /logout`
pub fn logout(config: &DashboardConfig, log: &EventLog) -> Result<Response<Cursor<Vec<u8>>>> {
    pipeline::logout(config, log)?;
    Ok(redirect("/login"))
}
