// ============================================================
// DASHBOARD REPORTS USE CASE
// ============================================================
// Pass-through reads for the dashboard panels and upload browsing

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{TableData, UPLOAD_PREFIX};
use crate::infrastructure::db::sqlite::SqliteStore;

const DAILY_STATUS_TABLE: &str = "ETF_Daily_Status";
const ROI_TABLE: &str = "ETF_ROI";
const TRADE_LOG_TABLE: &str = "ETF_Trade_Log";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiPoint {
    pub symbol: String,
    pub roi: f64,
}

/// The ROI panel: the full table plus the bar-chart series keyed by symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiSummary {
    pub table: TableData,
    pub chart: Vec<RoiPoint>,
}

pub struct ReportsUseCase {
    store: Arc<SqliteStore>,
}

impl ReportsUseCase {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }

    pub async fn daily_status(&self) -> Result<TableData> {
        self.store.fetch_table(DAILY_STATUS_TABLE).await
    }

    pub async fn trade_log(&self) -> Result<TableData> {
        self.store.fetch_table(TRADE_LOG_TABLE).await
    }

    /// The ETF_ROI table with its chart series. `Symbol` and `ROI` columns
    /// are a documented contract of that table; their absence is an error.
    pub async fn roi_summary(&self) -> Result<RoiSummary> {
        let table = self.store.fetch_table(ROI_TABLE).await?;
        let chart = extract_roi_series(&table)?;
        Ok(RoiSummary { table, chart })
    }

    pub async fn list_uploads(&self) -> Result<Vec<String>> {
        self.store.list_tables_with_prefix(UPLOAD_PREFIX).await
    }

    pub async fn view_upload(&self, table_name: &str) -> Result<TableData> {
        self.store.fetch_table(table_name).await
    }
}

fn extract_roi_series(table: &TableData) -> Result<Vec<RoiPoint>> {
    let symbol_idx = column_index(table, "Symbol")?;
    let roi_idx = column_index(table, "ROI")?;

    table
        .rows
        .iter()
        .map(|row| {
            let symbol = cell_as_string(&row[symbol_idx]);
            let roi = cell_as_number(&row[roi_idx]).ok_or_else(|| {
                AppError::PersistenceError(format!(
                    "{}: non-numeric ROI for symbol {}",
                    ROI_TABLE, symbol
                ))
            })?;
            Ok(RoiPoint { symbol, roi })
        })
        .collect()
}

fn column_index(table: &TableData, name: &str) -> Result<usize> {
    table
        .columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| {
            AppError::PersistenceError(format!("{}: missing expected column {}", ROI_TABLE, name))
        })
}

fn cell_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
