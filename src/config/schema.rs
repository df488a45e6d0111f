/// Configuration schema and defaults for xpdash.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[api]`, `[campus]`, `[session]`, `[chart]`, `[dashboard]`, `[web]`, and
/// `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level xpdash configuration.
///
/// Maps directly to the `~/.xpdash/config.toml` and `.xpdash.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub campus: CampusConfig,
    pub session: SessionConfig,
    pub chart: ChartConfig,
    pub dashboard: PanelConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Platform endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint receiving the record query.
    pub graphql_url: String,
    /// Sign-in endpoint (Basic auth in, bearer token out).
    pub auth_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graphql_url: "https://zone01normandie.org/api/graphql-engine/v1/graphql".to_string(),
            auth_url: "https://zone01normandie.org/api/auth/signin".to_string(),
            timeout_ms: 15_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [campus]
// ---------------------------------------------------------------------------

/// Campus-specific paths used by the normalizer and the XP filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampusConfig {
    /// Event whose membership record carries the official level.
    pub event_path: String,
    /// The one bootcamp path that is counted despite the exclusion markers.
    pub piscine_exception_path: String,
    /// Substrings that exclude a transaction path from XP totals.
    pub excluded_markers: Vec<String>,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            event_path: "/rouen/div-01".to_string(),
            piscine_exception_path: "/rouen/div-01/piscine-js".to_string(),
            excluded_markers: vec!["piscine-go".to_string(), "piscine-js".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// [session]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Token file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: "~/.xpdash/session.token".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [chart]
// ---------------------------------------------------------------------------

/// Chart geometry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Outer width of the line chart container in pixels.
    pub width: u32,
    /// Outer height of the line chart container in pixels.
    pub height: u32,
    /// Minimum cumulative XP jump for an intermediate point to be plotted.
    pub significant_delta: i64,
    /// Number of equal Y-axis intervals.
    pub y_ticks: u32,
    /// The Y-axis maximum is rounded up to a multiple of this.
    pub xp_rounding: i64,
    /// Donut radius in SVG units.
    pub donut_radius: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            significant_delta: 1000,
            y_ticks: 5,
            xp_rounding: 10_000,
            donut_radius: 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Panel list sizes and display formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Entries in the recent activity / projects / audits lists.
    pub recent_limit: usize,
    /// Months shown in the monthly breakdown.
    pub monthly_limit: usize,
    /// `chrono` format string for dates shown in panels.
    pub date_format: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            recent_limit: 5,
            monthly_limit: 6,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `xpdash serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether events are written at all.
    pub enabled: bool,
    /// Path to the JSONL event log. `~` is expanded to the home directory.
    pub path: String,
    /// Minimum level: `"debug"`, `"info"`, `"warn"`, `"error"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.xpdash/events.jsonl".to_string(),
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl DashboardConfig {
    /// Annotated default config file written by `xpdash config init`.
    pub fn default_toml() -> String {
        r#"# xpdash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (XPDASH_*)
#   2. Project config (.xpdash.toml in current directory)
#   3. User global config (~/.xpdash/config.toml)
#   4. Built-in defaults

[api]
graphql_url = "https://zone01normandie.org/api/graphql-engine/v1/graphql"
auth_url = "https://zone01normandie.org/api/auth/signin"
timeout_ms = 15000

[campus]
event_path = "/rouen/div-01"                        # Event carrying the official level
piscine_exception_path = "/rouen/div-01/piscine-js" # Counted despite the markers below
excluded_markers = ["piscine-go", "piscine-js"]

[session]
path = "~/.xpdash/session.token"

[chart]
width = 800
height = 500
significant_delta = 1000   # Intermediate points need a larger XP jump to be plotted
y_ticks = 5
xp_rounding = 10000
donut_radius = 60.0

[dashboard]
recent_limit = 5
monthly_limit = 6
date_format = "%d/%m/%Y"

[web]
addr = "127.0.0.1:9747"
open_browser = true

[logging]
enabled = true
path = "~/.xpdash/events.jsonl"
level = "info"                # debug | info | warn | error
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_matches_built_in_defaults() {
        let parsed: DashboardConfig = toml::from_str(&DashboardConfig::default_toml()).unwrap();
        let defaults = DashboardConfig::default();

        assert_eq!(parsed.api.graphql_url, defaults.api.graphql_url);
        assert_eq!(parsed.campus.event_path, defaults.campus.event_path);
        assert_eq!(parsed.campus.excluded_markers, defaults.campus.excluded_markers);
        assert_eq!(parsed.chart.significant_delta, 1000);
        assert_eq!(parsed.chart.xp_rounding, 10_000);
        assert_eq!(parsed.dashboard.recent_limit, 5);
        assert_eq!(parsed.web.addr, defaults.web.addr);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed: DashboardConfig = toml::from_str(
            r#"
[chart]
width = 1200
"#,
        )
        .unwrap();

        assert_eq!(parsed.chart.width, 1200);
        assert_eq!(parsed.chart.height, 500);
        assert_eq!(parsed.campus.piscine_exception_path, "/rouen/div-01/piscine-js");
        assert!(parsed.logging.enabled);
    }
}
