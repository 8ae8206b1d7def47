// ============================================================
// CSV IMPORT USE CASE
// ============================================================
// Parse an uploaded file, validate its columns, and persist it
// as a new uniquely-named table

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::dataset::Dataset;
use crate::domain::error::Result;
use crate::domain::table::upload_table_name;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::db::sqlite::SqliteStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub table_name: String,
    pub data: Dataset,
}

pub struct ImportCsvUseCase {
    store: Arc<SqliteStore>,
    parser: CsvParser,
}

impl ImportCsvUseCase {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self {
            store,
            parser: CsvParser::new(),
        }
    }

    /// Import one uploaded CSV file.
    ///
    /// Validation runs before any store call, so a rejected file leaves the
    /// store untouched; the create itself is transactional.
    pub async fn execute(&self, file_name: &str, content: &str) -> Result<ImportOutcome> {
        let dataset = self.parser.parse_content(content)?;
        dataset.validate_required_columns()?;

        let table_name = upload_table_name(file_name, Local::now().naive_local());
        self.store.create_table(&table_name, &dataset).await?;

        info!(
            table = %table_name,
            rows = dataset.row_count(),
            "CSV import complete"
        );

        Ok(ImportOutcome {
            table_name,
            data: dataset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::table::UPLOAD_PREFIX;

    const VALID_CSV: &str = "\
NAME,SYMBOL,MT MULTIPLE,MAX ALLOWED EXPOSURE IN CR,2024-01-01
Nifty 50 ETF,NIFTYBEES,1.5,10,201.4
Gold ETF,GOLDBEES,2.0,5,51.2";

    async fn importer() -> (ImportCsvUseCase, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        (ImportCsvUseCase::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_import_round_trips_the_file() {
        let (importer, store) = importer().await;
        let outcome = importer.execute("Q1 Holdings.csv", VALID_CSV).await.unwrap();

        assert!(outcome.table_name.starts_with("Uploaded_Q1_Holdings_"));
        assert_eq!(outcome.data.row_count(), 2);

        let table = store.fetch_table(&outcome.table_name).await.unwrap();
        assert_eq!(table.columns, outcome.data.columns);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], serde_json::Value::from("GOLDBEES"));
    }

    #[tokio::test]
    async fn test_missing_columns_fail_with_full_list() {
        let (importer, _) = importer().await;
        let csv = "SYMBOL,2024-01-01\nGOLDBEES,51.2";

        let err = importer.execute("partial.csv", csv).await.unwrap_err();
        match err {
            AppError::ValidationError { missing_columns } => assert_eq!(
                missing_columns,
                vec!["NAME", "MT MULTIPLE", "MAX ALLOWED EXPOSURE IN CR"]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validation_failure_leaves_store_untouched() {
        let (importer, store) = importer().await;
        let csv = "SYMBOL\nGOLDBEES";

        assert!(importer.execute("partial.csv", csv).await.is_err());
        let tables = store.list_tables_with_prefix(UPLOAD_PREFIX).await.unwrap();
        assert!(tables.is_empty());
    }

    #[tokio::test]
    async fn test_each_import_registers_one_upload() {
        let (importer, store) = importer().await;
        importer.execute("first.csv", VALID_CSV).await.unwrap();
        importer.execute("second.csv", VALID_CSV).await.unwrap();
        importer.execute("third.csv", VALID_CSV).await.unwrap();

        let tables = store.list_tables_with_prefix(UPLOAD_PREFIX).await.unwrap();
        assert_eq!(tables.len(), 3);
        assert!(tables.iter().all(|name| name.starts_with(UPLOAD_PREFIX)));
    }
}
