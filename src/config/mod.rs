/// Configuration system for xpdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::DashboardConfig::default()`]
/// 2. **User global config**: `~/.xpdash/config.toml`
/// 3. **Project local config**: `.xpdash.toml` in the current working directory
/// 4. **Environment variables**: `XPDASH_*` overrides (highest precedence)
///
/// File layers are merged key by key: a file that only sets `[chart] width`
/// leaves every other value from the previous layer in place.
///
/// # Usage
///
/// ```rust,ignore
/// use xpdash::config;
///
/// let cfg = config::load();
/// println!("querying {}", cfg.api.graphql_url);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::DashboardConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. A malformed file is skipped on its own; the layers around it still
/// apply.
pub fn load() -> DashboardConfig {
    let mut config = load_layers([global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the file layers over the defaults, in order.
///
/// Each layer is checked against the schema before it is kept, so a layer
/// that parses as TOML but carries a wrong type is dropped alone.
fn load_layers(paths: impl IntoIterator<Item = Option<PathBuf>>) -> DashboardConfig {
    let mut merged = defaults_as_value();

    for path in paths {
        let Some(layer) = load_toml_value(path) else {
            continue;
        };
        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        if candidate.clone().try_into::<DashboardConfig>().is_ok() {
            merged = candidate;
        }
    }

    merged.try_into().unwrap_or_default()
}

fn defaults_as_value() -> toml::Value {
    toml::Value::try_from(DashboardConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()))
}

/// Read a TOML file into an untyped value tree.
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed.
fn load_toml_value(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`. Tables merge per key; any other
/// value in the overlay replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.xpdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".xpdash").join("config.toml"))
}

/// Path to the project local config: `.xpdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".xpdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    Path::new(path).to_path_buf()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `XPDASH_GRAPHQL_URL`: GraphQL endpoint
/// - `XPDASH_AUTH_URL`: sign-in endpoint
/// - `XPDASH_TIMEOUT_MS`: request timeout
/// - `XPDASH_EVENT_PATH`: event path carrying the official level
/// - `XPDASH_SESSION_PATH`: token file
/// - `XPDASH_WEB_ADDR`: listen address for `xpdash serve`
/// - `XPDASH_LOG`: event log on/off (`1`/`true`/`yes`/`on`)
/// - `XPDASH_LOG_LEVEL`: minimum event level
fn apply_env_overrides(config: &mut DashboardConfig) {
    if let Ok(val) = std::env::var("XPDASH_GRAPHQL_URL")
        && !val.is_empty()
    {
        config.api.graphql_url = val;
    }
    if let Ok(val) = std::env::var("XPDASH_AUTH_URL")
        && !val.is_empty()
    {
        config.api.auth_url = val;
    }
    if let Ok(val) = std::env::var("XPDASH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("XPDASH_EVENT_PATH")
        && !val.is_empty()
    {
        config.campus.event_path = val;
    }
    if let Ok(val) = std::env::var("XPDASH_SESSION_PATH")
        && !val.is_empty()
    {
        config.session.path = val;
    }
    if let Ok(val) = std::env::var("XPDASH_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("XPDASH_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("XPDASH_LOG_LEVEL")
        && !val.is_empty()
    {
        config.logging.level = val.to_ascii_lowercase();
    }
}

/// Check if a string value represents a truthy boolean.
pub(crate) fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.xpdash/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.xpdash/ directory")?;
    }

    fs::write(&path, DashboardConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `chart.width`. The new value is parsed
/// according to the type of the value it replaces.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        defaults_as_value()
    };

    set_toml_value(&mut root, key, value)?;

    // Reject edits that no longer deserialize into the schema.
    let _: DashboardConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => toml::Value::Array(
            raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .collect(),
        ),
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn merge_keeps_unset_keys_from_base() {
        let mut base = defaults_as_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[chart]
width = 1024
"#,
        )
        .unwrap();

        merge_values(&mut base, overlay);
        let cfg: DashboardConfig = base.try_into().unwrap();

        assert_eq!(cfg.chart.width, 1024);
        assert_eq!(cfg.chart.height, 500);
        assert_eq!(cfg.campus.event_path, "/rouen/div-01");
    }

    #[test]
    fn later_layer_overrides_earlier_layer() {
        let mut base = defaults_as_value();
        merge_values(
            &mut base,
            toml::from_str("[campus]\nevent_path = \"/paris/div-01\"").unwrap(),
        );
        merge_values(
            &mut base,
            toml::from_str("[campus]\nevent_path = \"/lyon/div-01\"").unwrap(),
        );

        let cfg: DashboardConfig = base.try_into().unwrap();
        assert_eq!(cfg.campus.event_path, "/lyon/div-01");
        assert_eq!(cfg.campus.piscine_exception_path, "/rouen/div-01/piscine-js");
    }

    #[test]
    fn mistyped_layer_is_dropped_alone() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("config.toml");
        let project = dir.path().join(".xpdash.toml");
        fs::write(
            &global,
            "[chart]\nwidth = 1200\n\n[session]\npath = \"/secure/session.token\"\n",
        )
        .unwrap();
        fs::write(&project, "[chart]\nheight = \"tall\"\n").unwrap();

        let cfg = load_layers([Some(global), Some(project)]);

        assert_eq!(cfg.chart.width, 1200);
        assert_eq!(cfg.chart.height, 500);
        assert_eq!(cfg.session.path, "/secure/session.token");
    }

    #[test]
    fn unparsable_and_missing_layers_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let project = dir.path().join(".xpdash.toml");
        fs::write(&broken, "[chart\nwidth = ").unwrap();
        fs::write(&project, "[dashboard]\nrecent_limit = 8\n").unwrap();

        let cfg = load_layers([Some(broken), None, Some(dir.path().join("absent.toml")), Some(project)]);

        assert_eq!(cfg.chart.width, 800);
        assert_eq!(cfg.dashboard.recent_limit, 8);
    }

    #[test]
    fn set_toml_value_preserves_types() {
        let mut root = defaults_as_value();

        set_toml_value(&mut root, "chart.width", "1280").unwrap();
        set_toml_value(&mut root, "web.open_browser", "false").unwrap();
        set_toml_value(&mut root, "chart.donut_radius", "72.5").unwrap();
        set_toml_value(&mut root, "campus.excluded_markers", "piscine-go, piscine-rust").unwrap();
        set_toml_value(&mut root, "api.auth_url", "http://localhost:8080/signin").unwrap();

        let cfg: DashboardConfig = root.try_into().unwrap();
        assert_eq!(cfg.chart.width, 1280);
        assert!(!cfg.web.open_browser);
        assert!((cfg.chart.donut_radius - 72.5).abs() < f64::EPSILON);
        assert_eq!(cfg.campus.excluded_markers, vec!["piscine-go", "piscine-rust"]);
        assert_eq!(cfg.api.auth_url, "http://localhost:8080/signin");
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root = defaults_as_value();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "chart.depth", "3").is_err());
        assert!(set_toml_value(&mut root, "", "3").is_err());
    }

    #[test]
    fn set_toml_value_rejects_bad_integer() {
        let mut root = defaults_as_value();
        assert!(set_toml_value(&mut root, "chart.width", "wide").is_err());
    }

    #[test]
    fn expand_home_handles_tilde() {
        let expanded = expand_home("~/.xpdash/session.token");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join(".xpdash/session.token"));
        }
        assert_eq!(expand_home("/tmp/token"), PathBuf::from("/tmp/token"));
    }
}
