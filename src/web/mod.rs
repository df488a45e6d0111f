//! Local web surface for the dashboard.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The login page and the sign-in form handler
//! - The dashboard page, rendered server-side on every request
//! - A JSON endpoint with the computed statistics
//!
//! Launched via `xpdash serve` (default: `http://127.0.0.1:9747`).

mod api;
mod pages;

use std::collections::HashMap;
use std::io::{self, Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::schema::DashboardConfig;
use crate::events::EventLog;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on `config.web.addr`.
///
/// Blocks the current thread. Handles requests sequentially; a failing
/// request gets a 500 and the server keeps going.
pub fn serve(config: &DashboardConfig, log: &EventLog) -> Result<()> {
    let addr = config.web.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("xpdash dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");
    log.info("serve", "started", Some(addr));

    if config.web.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let result = match read_body(&method, request.as_reader()) {
            Ok(body) => dispatch(config, log, &method, &url, body.as_deref()),
            Err(e) => {
                log.warn("serve", "bad_request", Some(&e.to_string()));
                Ok(bad_request())
            }
        };

        let status = match result {
            Ok(resp) => {
                let status = resp.status_code().0;
                let _ = request.respond(resp);
                status
            }
            Err(e) => {
                log.error("serve", "handler_failed", Some(&e.to_string()));
                let _ = request.respond(html_response(
                    crate::render::render_error(&e.to_string()),
                    500,
                ));
                500
            }
        };

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url.split('?').next().unwrap_or(&url),
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    config: &DashboardConfig,
    log: &EventLog,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);

    // `?clear=true` on any page drops the session first.
    if query_param(url, "clear").as_deref() == Some("true") {
        crate::pipeline::logout(config, log)?;
        return Ok(redirect("/login"));
    }

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => pages::get_dashboard(config, log),

        (&Method::Get, "/login") | (&Method::Get, "/login.html") => Ok(pages::get_login(config, log)),
        (&Method::Post, "/login") => Ok(pages::post_login(config, log, body.unwrap_or(""))),
        (&Method::Get, "/logout") | (&Method::Post, "/logout") => pages::logout(config, log),

        (&Method::Get, "/api/stats") => api::get_stats(config, log),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// The request body for POST requests, `None` for every other method.
fn read_body(method: &Method, reader: &mut dyn Read) -> io::Result<Option<String>> {
    if !matches!(method, Method::Post) {
        return Ok(None);
    }
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(Some(buf))
}

/// A query-string parameter, percent-decoded.
fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    parse_form(query).remove(key)
}

/// Parse an `application/x-www-form-urlencoded` body.
fn parse_form(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k), percent_decode(v))
        })
        .collect()
}

fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn html_response(html: String, status: u16) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(html.into_bytes())
        .with_header(content_type_html())
        .with_status_code(StatusCode(status))
}

/// 303 See Other to `location`.
fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(Vec::new())
        .with_header(Header::from_bytes("Location", location).unwrap())
        .with_status_code(StatusCode(303))
}

/// 400 response for a request body that could not be read.
fn bad_request() -> Response<Cursor<Vec<u8>>> {
    html_response(
        crate::render::render_error("The request body could not be read."),
        400,
    )
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_decoding() {
        let form = parse_form("username=jane.doe%40mail.com&password=p%26ss+word");
        assert_eq!(form["username"], "jane.doe@mail.com");
        assert_eq!(form["password"], "p&ss word");
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%4"), "%4");
    }

    #[test]
    fn query_param_extracts_value() {
        assert_eq!(query_param("/?clear=true", "clear").as_deref(), Some("true"));
        assert_eq!(query_param("/login?x=1&clear=false", "clear").as_deref(), Some("false"));
        assert_eq!(query_param("/", "clear"), None);
    }

    #[test]
    fn unknown_route_is_404() {
        let config = DashboardConfig::default();
        let resp = dispatch(&config, &EventLog::disabled(), &Method::Get, "/nope", None).unwrap();
        assert_eq!(resp.status_code().0, 404);
    }

    struct BrokenBody;

    impl Read for BrokenBody {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"))
        }
    }

    #[test]
    fn post_body_is_read() {
        let mut body: &[u8] = b"username=jdoe&password=pw";
        let read = read_body(&Method::Post, &mut body).unwrap();
        assert_eq!(read.as_deref(), Some("username=jdoe&password=pw"));
    }

    #[test]
    fn get_body_is_ignored() {
        assert_eq!(read_body(&Method::Get, &mut BrokenBody).unwrap(), None);
    }

    #[test]
    fn unreadable_body_is_an_error() {
        assert!(read_body(&Method::Post, &mut BrokenBody).is_err());
        let mut not_utf8: &[u8] = &[0xff, 0xfe, 0x3d];
        assert!(read_body(&Method::Post, &mut not_utf8).is_err());
        assert_eq!(bad_request().status_code().0, 400);
    }

    #[test]
    fn redirect_sets_location() {
        let resp = redirect("/login");
        assert_eq!(resp.status_code().0, 303);
        assert!(
            resp.headers()
                .iter()
                .any(|h| h.field.equiv("Location") && h.value.as_str() == "/login")
        );
    }
}
