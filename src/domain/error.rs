use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppError {
    /// The uploaded dataset is missing required columns. Carries every
    /// missing column name, not just the first.
    ValidationError { missing_columns: Vec<String> },
    PersistenceError(String),
    ParseError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError { missing_columns } => {
                write!(f, "Missing required columns: {}", missing_columns.join(", "))
            }
            AppError::PersistenceError(msg) => write!(f, "Persistence error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_missing_column() {
        let err = AppError::ValidationError {
            missing_columns: vec!["NAME".to_string(), "SYMBOL".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: NAME, SYMBOL");
    }
}
