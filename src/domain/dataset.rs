// ============================================================
// UPLOADED DATASET
// ============================================================
// Parsed CSV content and the required-column schema

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Columns every uploaded CSV must contain (case-sensitive, exact match).
/// Extra columns are passed through unvalidated.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "NAME",
    "SYMBOL",
    "MT MULTIPLE",
    "MAX ALLOWED EXPOSURE IN CR",
];

/// Tabular data parsed from an uploaded CSV file.
///
/// Row order is insertion order. Cells are kept as the raw strings the file
/// carried; the store decides their affinity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Set-difference of the required schema against the parsed header,
    /// in schema order.
    pub fn missing_required_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|required| !self.columns.iter().any(|c| c == *required))
            .map(|required| required.to_string())
            .collect()
    }

    /// Check the header is a superset of the required columns.
    pub fn validate_required_columns(&self) -> Result<()> {
        let missing = self.missing_required_columns();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError {
                missing_columns: missing,
            })
        }
    }
}
