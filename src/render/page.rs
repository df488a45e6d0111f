//! Whole-page assembly.

use crate::records::Subject;
use crate::stats::DashboardStats;

use super::{RenderOptions, escape_html, render_fragments};

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title),
        super::style::DASHBOARD_CSS
    )
}

/// The full dashboard for one subject.
pub fn render_dashboard(subject: &Subject, stats: &DashboardStats, options: &RenderOptions) -> String {
    let f = render_fragments(subject, stats, options);
    let body = format!(
        "<div class=\"app\">\n\
         <aside class=\"sidebar\">\n{}</aside>\n\
         <main>\n<div class=\"boxes\">\n\
         <section class=\"data-box\">\n{}</section>\n\
         <section class=\"data-box\">\n{}</section>\n\
         <section class=\"data-box\">\n{}</section>\n\
         </div>\n\
         <section class=\"graph-box\">\n{}</section>\n\
         </main>\n</div>\n",
        f.sidebar, f.xp_panel, f.projects_panel, f.audits_panel, f.chart_panel
    );
    document(&format!("{} - Dashboard", subject.login), &body)
}

/// Sign-in form. `error` is shown above the fields; `username` refills them.
pub fn render_login(error: Option<&str>, username: &str) -> String {
    let error = error
        .map(|e| format!("<div class=\"error-message\">{}</div>\n", escape_html(e)))
        .unwrap_or_default();
    let body = format!(
        "<form class=\"login\" method=\"post\" action=\"/login\">\n\
         <h2>Sign in</h2>\n{error}\
         <label for=\"username\">Username or email</label>\n\
         <input id=\"username\" name=\"username\" type=\"text\" value=\"{}\" autocomplete=\"username\" required>\n\
         <label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"current-password\" required>\n\
         <button type=\"submit\">Login</button>\n\
         </form>\n",
        escape_html(username)
    );
    document("Login", &body)
}

/// Failure page for fetch and data errors.
pub fn render_error(message: &str) -> String {
    let body = format!(
        "<div class=\"login\">\n<h2>Failed to load data</h2>\n\
         <div class=\"error-message\">{}</div>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Back to login</button></form>\n\
         </div>\n",
        escape_html(message)
    );
    document("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summary::tests::subject;
    use crate::stats::{StatsSettings, XpFilter};

    #[test]
    fn dashboard_contains_every_region() {
        let s = subject(Vec::new());
        let stats = DashboardStats::compute(&s, &XpFilter::default(), &StatsSettings::default());
        let html = render_dashboard(&s, &stats, &RenderOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("User Information"));
        assert!(html.contains("XP Statistics"));
        assert!(html.contains("Project Statistics"));
        assert!(html.contains("Audit Activity"));
        assert!(html.contains("XP Progress Over Time"));
        assert!(html.contains("<title>jdoe - Dashboard</title>"));
    }

    #[test]
    fn login_page_shows_escaped_error() {
        let html = render_login(Some("<bad>"), "jdoe");
        assert!(html.contains("&lt;bad&gt;"));
        assert!(html.contains("value=\"jdoe\""));
        assert!(!render_login(None, "").contains("error-message\">"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error("network error: <timeout>");
        assert!(html.contains("network error: &lt;timeout&gt;"));
    }
}
