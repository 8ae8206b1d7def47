// ============================================================
// TABLE REGISTRY
// ============================================================
// Query results and the naming rule that partitions the store
// into uploaded vs. pre-existing tables

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every table created by an upload carries this prefix; listing treats it
/// as a literal string, not a pattern.
pub const UPLOAD_PREFIX: &str = "Uploaded_";

/// A full tabular read from the store. Cells follow SQLite's dynamic
/// typing: null, number, or string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Derive the table name for an upload:
/// `Uploaded_<stem with spaces as underscores>_<YYYYMMDD_HHMMSS>`.
///
/// The final extension is stripped; a leading-dot name keeps its full name.
/// Uniqueness holds up to second precision; two uploads of the same file
/// name within the same second collide, and the store rejects the loser.
pub fn upload_table_name(file_name: &str, uploaded_at: NaiveDateTime) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    format!(
        "{}{}_{}",
        UPLOAD_PREFIX,
        stem.replace(' ', "_"),
        uploaded_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn is_uploaded_table(name: &str) -> bool {
    name.starts_with(UPLOAD_PREFIX)
}
