//! `notes` executable.
//!
//! # Responsibility
//! - Load settings, start logging, open the database and serve HTTP.
//! - Map startup failures to a non-zero exit code with one stderr line.

use clap::{Parser, Subcommand};
use log::error;
use notes_web::{AppState, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notes", about = "Private notes web application")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serves the web application.
    Serve {
        /// TOML settings file; defaults to `notes.toml` when present.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Overrides `server.bind`.
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Prints the version.
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Version => {
            println!("notes {}", notes_core::core_version());
            ExitCode::SUCCESS
        }
        Command::Serve { config, bind } => match serve(config, bind).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                error!("event=server_exit module=cli status=error message={message}");
                eprintln!("notes: {message}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn serve(config: Option<PathBuf>, bind: Option<String>) -> Result<(), String> {
    let mut settings = Settings::load(config.as_deref())
        .map_err(|err| format!("failed to load settings: {err}"))?;
    if let Some(bind) = bind {
        settings.server.bind = bind;
    }

    let log_dir = settings
        .logging
        .resolved_dir()
        .map_err(|err| format!("failed to resolve log directory: {err}"))?;
    notes_core::init_logging(&settings.logging.level, &log_dir.to_string_lossy())?;

    let conn = notes_core::db::open_db_at(&settings.database.path)
        .map_err(|err| format!("failed to open database: {err}"))?;

    notes_web::serve(&settings, AppState::new(conn))
        .await
        .map_err(|err| format!("server failed on {}: {err}", settings.server.bind))
}
