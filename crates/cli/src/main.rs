//! Rollcall CLI - attendance check-in from the command line
//!
//! Usage:
//! ```bash
//! rollcall init
//! rollcall roster import class_list.csv
//! rollcall session open "Lecture 3"
//! rollcall checkin --id S1
//! rollcall attendance --session 3 --limit 20
//! rollcall summary --date 2024-03-04 --format json
//! rollcall export --format markdown --output attendance.md
//! rollcall serve
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rollcall_config::{ConfigLoader, RollcallConfig};
use rollcall_reports::ExportFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod commands;

use commands::{attendance, roster, session};

/// Rollcall - roster-based attendance check-in with session scoping
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file
    #[arg(long, default_value = "rollcall.toml", global = true)]
    pub config: PathBuf,

    /// Database file path (overrides config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Roster CSV path (overrides config)
    #[arg(long, global = true)]
    pub roster: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and schema
    Init,

    /// Show database and roster status
    Status,

    /// Roster management
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// Session management
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Check a participant in
    Checkin(CheckinArgs),

    /// List attendance records, most recent first
    Attendance {
        /// Only records for this session
        #[arg(long)]
        session: Option<i64>,
        /// Earliest day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Maximum rows (default from config)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Present/absent summary for a session or a day
    Summary {
        /// Session ID
        #[arg(long, conflicts_with = "date", required_unless_present = "date")]
        session: Option<i64>,
        /// Day (YYYY-MM-DD) for day-scoped check-ins
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output format
        #[arg(long, default_value = "markdown")]
        format: ExportFormatArg,
    },

    /// Export attendance records
    Export {
        /// Output format
        #[arg(long, default_value = "csv")]
        format: ExportFormatArg,
        /// Output file path (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Only records for this session
        #[arg(long)]
        session: Option<i64>,
        /// Earliest day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Run the HTTP API
    Serve,
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// List roster entries
    List,
    /// Replace the roster with a CSV file
    Import {
        /// CSV file to import
        file: PathBuf,
    },
    /// Add one participant
    Add {
        /// Participant identifier
        #[arg(long)]
        id: String,
        /// Display name
        #[arg(long, short)]
        name: String,
        /// Secondary token (e.g. MAC address)
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Open a session, closing the current one
    Open {
        /// Label (default "<prefix> YYYY-MM-DD")
        label: Option<String>,
    },
    /// Close the open session
    Close,
    /// Show the open session
    Show,
    /// List all sessions
    List,
}

#[derive(Args)]
pub struct CheckinArgs {
    /// Participant identifier
    #[arg(long)]
    pub id: Option<String>,
    /// Display name (case-insensitive)
    #[arg(long, short)]
    pub name: Option<String>,
    /// Secondary token (case-insensitive)
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
    Markdown,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Config file, then CLI flags, then `PORT`
fn load_config(cli: &Cli) -> Result<RollcallConfig> {
    let loader = ConfigLoader::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;

    let mut config = (*loader.get()).clone();
    if let Some(db) = &cli.db {
        config.storage.database = db.clone();
    }
    if let Some(roster) = &cli.roster {
        config.storage.roster = roster.clone();
    }
    loader.update(config).context("Invalid configuration")?;

    Ok((*loader.get()).clone())
}

fn apply_port_env(config: RollcallConfig) -> RollcallConfig {
    match std::env::var("PORT") {
        Ok(port) => match port.trim().parse::<u16>() {
            Ok(port) => config.with_port(port),
            Err(_) => {
                tracing::warn!(%port, "ignoring invalid PORT");
                config
            }
        },
        Err(_) => config,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.server.log_level);
    let config = apply_port_env(config);

    match cli.command {
        Commands::Init => {
            app::init(&config).await?;
        }

        Commands::Status => {
            app::show_status(&config).await?;
        }

        Commands::Roster { action } => {
            let ctx = app::context(&config).await?;
            roster::handle(&ctx, action).await?;
        }

        Commands::Session { action } => {
            let ctx = app::context(&config).await?;
            session::handle(&ctx, action).await?;
        }

        Commands::Checkin(args) => {
            let ctx = app::context(&config).await?;
            attendance::check_in(&ctx, args).await?;
        }

        Commands::Attendance {
            session,
            from,
            to,
            limit,
        } => {
            let ctx = app::context(&config).await?;
            attendance::list(&ctx, session, from, to, limit).await?;
        }

        Commands::Summary {
            session,
            date,
            format,
        } => {
            let ctx = app::context(&config).await?;
            attendance::summary(&ctx, session, date, format.into()).await?;
        }

        Commands::Export {
            format,
            output,
            session,
            from,
            to,
        } => {
            let ctx = app::context(&config).await?;
            attendance::export(&ctx, format.into(), output, session, from, to).await?;
        }

        Commands::Serve => {
            let ctx = app::context(&config).await?;
            rollcall_server::serve(config.server.listen, rollcall_server::AppState::new(ctx))
                .await
                .context("HTTP server failed")?;
        }
    }

    Ok(())
}
