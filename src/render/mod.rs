//! View Renderer: statistics and chart geometry in, HTML/SVG out.
//!
//! Every fragment is a plain `String` built with `format!`. Values that come
//! from the platform (names, paths, attributes) go through [`escape_html`];
//! numbers and geometry are formatted here and never escaped.

pub mod charts;
pub mod page;
pub mod panels;
pub mod sidebar;
pub mod style;

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use crate::chart::LineChartSettings;
use crate::config::schema::DashboardConfig;
use crate::records::Subject;
use crate::stats::DashboardStats;

pub use page::{render_dashboard, render_error, render_login};

/// Fallback when the configured date format is not a valid strftime string.
const FALLBACK_DATE_FORMAT: &str = "%d/%m/%Y";

/// Display settings shared by every fragment.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub date_format: String,
    pub line_chart: LineChartSettings,
    pub donut_radius: f64,
}

impl RenderOptions {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            date_format: config.dashboard.date_format.clone(),
            line_chart: LineChartSettings::from_config(&config.chart),
            donut_radius: config.chart.donut_radius,
        }
    }

    pub fn date(&self, at: &DateTime<Utc>) -> String {
        format_date(at, &self.date_format)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

/// The dashboard's markup, one field per region of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragments {
    pub sidebar: String,
    pub xp_panel: String,
    pub projects_panel: String,
    pub audits_panel: String,
    pub chart_panel: String,
    pub style: &'static str,
}

pub fn render_fragments(subject: &Subject, stats: &DashboardStats, options: &RenderOptions) -> Fragments {
    Fragments {
        sidebar: sidebar::render_sidebar(subject, stats, options),
        xp_panel: panels::render_xp_panel(&stats.xp, options),
        projects_panel: panels::render_projects_panel(&stats.projects, options),
        audits_panel: panels::render_audits_panel(&stats.audits, options),
        chart_panel: charts::render_line_chart(&stats.plotted, options),
        style: style::DASHBOARD_CSS,
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Format an integer with comma thousands separators.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// A grade with at most two decimals, trailing zeros dropped.
pub fn format_grade(grade: f64) -> String {
    crate::chart::coord(grade)
}

/// A UTC timestamp in the local zone, formatted with `fmt`.
pub fn format_date(at: &DateTime<Utc>, fmt: &str) -> String {
    let local = at.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(fmt)).is_err() {
        out.clear();
        let _ = write!(out, "{}", local.format(FALLBACK_DATE_FORMAT));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
