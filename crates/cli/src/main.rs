// gsc - GST filing-compliance scoring CLI

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gsc")]
#[command(about = "GST filing-compliance scoring (fetch, recompute, inspect)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a taxpayer from the GST registry and store one record per
    /// filed return
    #[command(after_help = "\
Examples:
  gsc fetch 27AAAAA0000A1Z5 --asp-id 123 --password secret
  gsc fetch 27AAAAA0000A1Z5 --fy 2023-24 --turnover 60000000
  gsc fetch 27AAAAA0000A1Z5 --db ./records.db --json")]
    Fetch {
        /// 15-character GST identification number
        gstin: String,

        /// Financial year to pull filed returns for
        #[arg(long, default_value = "2023-24")]
        fy: String,

        /// ASP gateway id
        #[arg(long, env = "GST_ASP_ID")]
        asp_id: String,

        /// ASP gateway password
        #[arg(long, env = "GST_ASP_PASSWORD")]
        password: String,

        /// Annual turnover in rupees (omit if unknown)
        #[arg(long)]
        turnover: Option<String>,

        /// Legacy delay-days value to seed records with (uncoercible
        /// values become 0 and are reported)
        #[arg(long)]
        delay_days: Option<String>,

        /// Database file (default: per-user data directory)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Emit JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },

    /// Set a taxpayer's turnover and recompute delays and the
    /// compliance result over the trailing window
    #[command(after_help = "\
The result is taxpayer-level: every GSTR-3B/GSTR-1 record gets the same
pass/fail verdict.

Examples:
  gsc recompute 27AAAAA0000A1Z5 --turnover 1000000
  gsc recompute 27AAAAA0000A1Z5 --turnover '' --as-of 2024-07-15
  gsc recompute 27AAAAA0000A1Z5 --turnover 1000000 --config rules.toml --json")]
    Recompute {
        /// 15-character GST identification number
        gstin: String,

        /// Annual turnover in rupees; empty string means unknown
        #[arg(long)]
        turnover: Option<String>,

        /// Status hint carried for wire compatibility (pass/fail/unset);
        /// the computed result supersedes it
        #[arg(long)]
        status: Option<String>,

        /// Reference date for the trailing window (YYYY-MM-DD, default
        /// today)
        #[arg(long)]
        as_of: Option<String>,

        /// Rule configuration TOML (default: statutory calendar)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Database file (default: per-user data directory)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Emit JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },

    /// List stored records for a taxpayer
    Records {
        /// 15-character GST identification number
        gstin: String,

        /// Database file (default: per-user data directory)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Emit JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },

    /// Validate a rule configuration file
    ValidateConfig {
        /// Path to the TOML rule configuration
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch { gstin, fy, asp_id, password, turnover, delay_days, db, json } => {
            commands::cmd_fetch(gstin, fy, asp_id, password, turnover, delay_days, db, json)
        }
        Commands::Recompute { gstin, turnover, status, as_of, config, db, json } => {
            commands::cmd_recompute(gstin, turnover, status, as_of, config, db, json)
        }
        Commands::Records { gstin, db, json } => commands::cmd_records(gstin, db, json),
        Commands::ValidateConfig { path } => commands::cmd_validate_config(path),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: exit_codes::EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Create error from a store error with proper exit code.
    pub fn store(err: gstscore_store::StoreError) -> Self {
        let code = exit_codes::store_exit_code(&err);
        let hint = match &err {
            gstscore_store::StoreError::Duplicate { .. } => {
                Some("records for this taxpayer and period already exist".to_string())
            }
            gstscore_store::StoreError::NotFound(_) => {
                Some("run `gsc fetch` for this GSTIN first".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Create error from a registry error with proper exit code.
    pub fn registry(err: gstscore_registry::RegistryError) -> Self {
        Self {
            code: exit_codes::registry_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
