use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use xpdash::cli;

#[derive(Debug, Parser)]
#[command(name = "xpdash")]
#[command(about = "Personal XP, project and audit dashboard for the school platform")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and store the session token (password read from stdin)
    Login {
        /// Username or email; prompted for when omitted
        username: Option<String>,
    },
    /// Remove the stored session token
    Logout,
    /// Show whether the stored session is valid
    Status,
    /// Fetch records and print the computed statistics
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Write the dashboard as a standalone HTML file
    Render {
        /// Output path (default: ./xpdash-dashboard.html)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Serve the dashboard and login page locally
    Serve {
        /// Listen address, overrides [web].addr
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser on start
        #[arg(long)]
        no_browser: bool,
    },
    /// Show recent entries of the event log
    Events {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write a default config file to ~/.xpdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key in the global config, e.g. `chart.width 960`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Login { username } => cli::run_login(username),
        Commands::Logout => cli::run_logout(),
        Commands::Status => cli::run_status(),
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt)
        }
        Commands::Render { output } => cli::run_render(output),
        Commands::Serve { addr, no_browser } => cli::run_serve(addr, no_browser),
        Commands::Events { limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_events(limit, fmt)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
