//! Layered runtime settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file,
//! then `NOTES_*` environment variables (`NOTES_SERVER__BIND=0.0.0.0:8000`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "notes.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    /// Relative paths are resolved against the working directory.
    pub dir: String,
}

impl LoggingSettings {
    pub fn resolved_dir(&self) -> std::io::Result<PathBuf> {
        let dir = Path::new(self.dir.trim());
        if dir.is_absolute() {
            Ok(dir.to_path_buf())
        } else {
            Ok(std::env::current_dir()?.join(dir))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub inactivity_days: i64,
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            inactivity_days: 14,
            secure_cookie: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub session: SessionSettings,
}

impl Settings {
    /// Loads settings from defaults, `file` (or `notes.toml` when present) and
    /// the environment. An explicitly named file must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file_source = match file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .set_default("server.bind", "127.0.0.1:8000")?
            .set_default("database.path", "notes.sqlite3")?
            .set_default("logging.level", notes_core::default_log_level())?
            .set_default("logging.dir", "logs")?
            .set_default("session.inactivity_days", 14)?
            .set_default("session.secure_cookie", false)?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix("NOTES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
