//! CLI command implementations for xpdash.
//!
//! Provides subcommand handlers for:
//! - `xpdash login | logout | status`: session management
//! - `xpdash stats`: statistics as a table or JSON
//! - `xpdash render`: write the dashboard as a standalone HTML file
//! - `xpdash serve`: run the local web dashboard
//! - `xpdash events`: recent entries of the event log
//! - `xpdash config show|init|set|reset`: configuration management

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::config::{self, schema::DashboardConfig};
use crate::error::DashboardError;
use crate::events::{EventEntry, EventLog, Level};
use crate::pipeline::{self, Dashboard};
use crate::render::{format_date, format_grade, format_number};
use crate::session::SessionState;
use crate::stats::ProjectStatus;

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Resolved config and the event log it points at.
fn context() -> (DashboardConfig, EventLog) {
    let config = config::load();
    let log = EventLog::from_config(&config.logging);
    (config, log)
}

/// Run the full pipeline, turning a closed session into a login hint.
fn require_dashboard(config: &DashboardConfig, log: &EventLog) -> Result<Dashboard> {
    let session = pipeline::open_session(config, log);
    match pipeline::load_dashboard(config, &session, log) {
        Ok(dashboard) => Ok(dashboard),
        Err(DashboardError::SessionInvalid(state)) => {
            bail!("not signed in (session {state}). Run `xpdash login` first.")
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// xpdash login | logout | status
// ---------------------------------------------------------------------------

/// Sign in and store the session token.
///
/// Missing values are read from stdin, one per line. On a terminal the
/// password is read without echo.
pub fn run_login(username: Option<String>) -> Result<()> {
    let (config, log) = context();
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut lines = stdin.lock().lines();

    let username = match username {
        Some(u) => u,
        None => prompt(&mut lines, "Username or email: ")?,
    };
    let password = read_password(&mut lines, interactive)?;

    let token = pipeline::login(&config, &username, &password, &log)?;

    println!("{} Signed in as {}", "✓".green().bold(), username.bold());
    if let Some(exp) = token.expires_at() {
        println!(
            "  {}",
            format!("Session valid until {}", exp.format("%Y-%m-%d %H:%M UTC")).dimmed()
        );
    }
    Ok(())
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> Result<String> {
    if io::stdin().is_terminal() {
        eprint!("{label}");
        let _ = io::stderr().flush();
    }
    let line = lines
        .next()
        .transpose()
        .context("failed to read from stdin")?
        .unwrap_or_default();
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_password(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    interactive: bool,
) -> Result<String> {
    if interactive {
        return rpassword::prompt_password("Password: ").context("failed to read password");
    }
    prompt(lines, "Password: ")
}

/// Remove the stored session token.
pub fn run_logout() -> Result<()> {
    let (config, log) = context();
    pipeline::logout(&config, &log)?;
    println!("{} Signed out", "✓".green().bold());
    Ok(())
}

/// Show the session gate's verdict on the stored token.
pub fn run_status() -> Result<()> {
    let (config, log) = context();
    let session = pipeline::open_session(&config, &log);

    println!("{}", "xpdash Session".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}",
        "Token file:".bold(),
        config::expand_home(&config.session.path).display()
    );

    match session.state() {
        SessionState::Valid(token) => {
            println!("  {} {}", "State:     ".bold(), "valid".green());
            let expiry = token
                .expires_at()
                .map(|exp| exp.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "no expiry".to_string());
            println!("  {} {}", "Expires:   ".bold(), expiry);
        }
        SessionState::Absent => {
            println!("  {} {}", "State:     ".bold(), "absent".yellow());
            println!("  {}", "Run `xpdash login` to sign in.".dimmed());
        }
        other @ (SessionState::Expired | SessionState::Malformed) => {
            println!("  {} {}", "State:     ".bold(), other.to_string().red());
            println!("  {}", "The stored token was removed. Run `xpdash login` again.".dimmed());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// xpdash stats
// ---------------------------------------------------------------------------

pub fn run_stats(format: OutputFormat) -> Result<()> {
    let (config, log) = context();
    let dashboard = require_dashboard(&config, &log)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dashboard.report())?);
        }
        OutputFormat::Table => print_stats_table(&dashboard, &config.dashboard.date_format),
    }
    Ok(())
}

fn print_stats_table(dashboard: &Dashboard, date_format: &str) {
    let subject = &dashboard.subject;
    let stats = &dashboard.stats;

    println!("{}", format!("xpdash: {}", subject.login).bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {} {}", "Full name:".bold(), subject.full_name());
    println!("  {} {}", "Level:    ".bold(), subject.official_level);
    println!("  {} {}", "Campus:   ".bold(), subject.campus_label());
    println!("  {} {}", "Joined:   ".bold(), format_date(&subject.created_at, date_format));
    println!();

    // XP
    println!("{}", "XP".bold().cyan());
    println!("  {} {}", "Total XP:".bold(), format_number(stats.xp.total).green());
    if stats.xp.monthly.is_empty() {
        println!("  {}", "No XP yet.".yellow());
    }
    for month in &stats.xp.monthly {
        println!("  {:<20} {:>12}", month.label, format!("{} XP", format_number(month.xp)));
    }
    if !stats.xp.recent.is_empty() {
        println!();
        println!("  {}", "Recent activity".bold());
        for entry in &stats.xp.recent {
            println!(
                "  {:<30} {:>12} {}",
                truncate(&entry.name, 30),
                format!("+{} XP", format_number(entry.amount)).green(),
                format_date(&entry.created_at, date_format).dimmed()
            );
        }
    }
    println!();

    // Projects
    let projects = &stats.projects;
    println!("{}", "Projects".bold().cyan());
    println!(
        "  {} {} ({} passed, {} without XP, {} in progress)",
        "Completed:".bold(),
        projects.classification.graded(),
        projects.classification.passed.to_string().green(),
        projects.classification.failed.to_string().red(),
        projects.classification.in_progress
    );
    println!("  {} {:.1}%", "Pass rate:".bold(), projects.pass_rate);
    println!("  {} {:.1}", "Avg grade:".bold(), projects.average_grade);
    for project in &projects.recent {
        let status = match project.status {
            ProjectStatus::Successful => project.status.to_string().green(),
            ProjectStatus::NoXp => project.status.to_string().red(),
            ProjectStatus::InProgress => project.status.to_string().yellow(),
        };
        let grade = project.grade.map(format_grade).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<30} {:>6} {:<12} {}",
            truncate(&project.name, 30),
            grade,
            status,
            format_date(&project.updated_at, date_format).dimmed()
        );
    }
    println!();

    // Audits
    let audits = &stats.audits;
    let ratio = format!("{:.2}", audits.ratio);
    let ratio = match audits.category {
        crate::stats::AuditRatioCategory::Excellent => ratio.green(),
        crate::stats::AuditRatioCategory::Good => ratio.yellow(),
        crate::stats::AuditRatioCategory::NeedsImprovement => ratio.red(),
    };
    println!("{}", "Audits".bold().cyan());
    println!("  {} {}", "Ratio:      ".bold(), ratio);
    println!("  {}", audits.category.message().dimmed());
    println!("  {} {}", "XP given:   ".bold(), format_number(audits.total_up));
    println!("  {} {}", "XP received:".bold(), format_number(audits.total_down));
    println!(
        "  {} {} (avg grade {:.1})",
        "Audits done:".bold(),
        audits.summary.count,
        audits.summary.average_grade
    );
}

// ---------------------------------------------------------------------------
// xpdash render
// ---------------------------------------------------------------------------

/// Default output file for `xpdash render`.
pub const DEFAULT_RENDER_PATH: &str = "xpdash-dashboard.html";

/// Write the dashboard page to `output`.
pub fn run_render(output: Option<PathBuf>) -> Result<()> {
    let (config, log) = context();
    let dashboard = require_dashboard(&config, &log)?;

    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_RENDER_PATH));
    write_page(&path, &dashboard.to_html(&config))?;
    log.info("render", "ok", Some(&path.display().to_string()));

    println!("{} Dashboard written to {}", "✓".green().bold(), path.display());
    Ok(())
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// xpdash serve
// ---------------------------------------------------------------------------

pub fn run_serve(addr: Option<String>, no_browser: bool) -> Result<()> {
    let (mut config, log) = context();
    if let Some(addr) = addr {
        config.web.addr = addr;
    }
    if no_browser {
        config.web.open_browser = false;
    }
    crate::web::serve(&config, &log)
}

// ---------------------------------------------------------------------------
// xpdash events
// ---------------------------------------------------------------------------

/// Show the most recent event log entries, oldest first.
pub fn run_events(limit: usize, format: OutputFormat) -> Result<()> {
    let (_, log) = context();
    let entries = log.read_all();
    let start = entries.len().saturating_sub(limit);
    let recent = &entries[start..];

    if recent.is_empty() {
        println!("{}", "No events logged yet.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recent)?),
        OutputFormat::Table => {
            for entry in recent {
                println!("{}", format_event(entry));
            }
        }
    }
    Ok(())
}

fn format_event(entry: &EventEntry) -> String {
    let level = match entry.level {
        Level::Debug => "debug".dimmed(),
        Level::Info => "info ".normal(),
        Level::Warn => "warn ".yellow(),
        Level::Error => "error".red(),
    };
    let detail = entry.detail.as_deref().unwrap_or("");
    format!(
        "{} {} {:<14} {:<18} {}",
        entry.timestamp.dimmed(),
        level,
        entry.event,
        entry.outcome,
        detail.dimmed()
    )
}

// ---------------------------------------------------------------------------
// xpdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective xpdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.xpdash/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.xpdash/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".xpdash.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".xpdash.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "XPDASH_* environment variables".dimmed()
    );

    Ok(())
}

/// Write a default config file at `~/.xpdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("table")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("éééééé", 4), "ééé…");
    }

    #[test]
    fn prompt_reads_one_line() {
        let input: Vec<io::Result<String>> = vec![Ok("jdoe\r".to_string()), Ok("pw".to_string())];
        let mut lines = input.into_iter();
        assert_eq!(prompt(&mut lines, "u: ").unwrap(), "jdoe");
        assert_eq!(prompt(&mut lines, "p: ").unwrap(), "pw");
        assert_eq!(prompt(&mut lines, "x: ").unwrap(), "");
    }

    #[test]
    fn piped_password_is_read_from_stdin() {
        let input: Vec<io::Result<String>> = vec![Ok("s3cret pass\n".to_string())];
        let mut lines = input.into_iter();
        assert_eq!(read_password(&mut lines, false).unwrap(), "s3cret pass");
        assert_eq!(read_password(&mut lines, false).unwrap(), "");
    }

    #[test]
    fn write_page_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/dashboard.html");
        write_page(&path, "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
    }

    #[test]
    fn event_line_contains_fields() {
        let entry = EventEntry {
            timestamp: "2024-05-01T10:00:00+02:00".to_string(),
            level: Level::Warn,
            event: "login".to_string(),
            outcome: "rejected".to_string(),
            detail: Some("status=401".to_string()),
        };
        let line = format_event(&entry);
        assert!(line.contains("login"));
        assert!(line.contains("rejected"));
        assert!(line.contains("status=401"));
    }
}
