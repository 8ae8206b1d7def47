use std::path::PathBuf;

use crate::domain::error::{AppError, Result};

const DEFAULT_DB_PATH: &str = "DB_Backup/etf_analysis.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;

/// Runtime settings, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_path = std::env::var("ETF_DASHBOARD_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        let host = std::env::var("ETF_DASHBOARD_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match std::env::var("ETF_DASHBOARD_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                AppError::ConfigError(format!("Invalid ETF_DASHBOARD_PORT '{}': {}", raw, e))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            database_path,
            host,
            port,
        })
    }

    /// sqlx connection string for the store file.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database_path.display())
    }

    /// Create the store file's parent directory if it does not exist yet.
    pub fn ensure_database_dir(&self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
