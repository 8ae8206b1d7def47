use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};
use crate::domain::table::TableData;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow},
    Column, Pool, Row, Sqlite, TypeInfo, ValueRef,
};
use std::str::FromStr;

pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn init(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::PersistenceError(format!("Failed to parse connection string: {}", e))
            })?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| AppError::PersistenceError(format!("Failed to connect: {}", e)))?;

        Ok(Self { pool })
    }

    /// A private in-memory store for tests. A single pooled connection keeps
    /// every operation on the same `:memory:` database.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::PersistenceError(format!("Failed to connect: {}", e)))?;
        Ok(Self { pool })
    }

    /// Materialize a dataset as a brand-new table. The existence check,
    /// creation, and inserts run in one transaction, so the import is
    /// all-or-nothing and a name collision fails without touching the store.
    pub async fn create_table(&self, table_name: &str, dataset: &Dataset) -> Result<()> {
        if dataset.columns.is_empty() {
            return Err(AppError::PersistenceError(
                "Cannot create a table with no columns".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::PersistenceError(format!("Failed to begin transaction: {}", e))
        })?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table_name)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::PersistenceError(format!("Failed to check table name: {}", e))
                })?;

        if existing.is_some() {
            return Err(AppError::PersistenceError(format!(
                "Table already exists: {}",
                table_name
            )));
        }

        let column_defs = dataset
            .columns
            .iter()
            .map(|c| format!("{} TEXT", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(", ");

        sqlx::query(&format!(
            "CREATE TABLE {} ({})",
            quote_ident(table_name),
            column_defs
        ))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::PersistenceError(format!("Failed to create table: {}", e)))?;

        let placeholders = vec!["?"; dataset.columns.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(table_name),
            placeholders
        );

        for row in &dataset.rows {
            let mut query = sqlx::query(&insert_sql);
            for value in row {
                query = query.bind(value);
            }
            query.execute(&mut *tx).await.map_err(|e| {
                AppError::PersistenceError(format!("Failed to insert row: {}", e))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::PersistenceError(format!("Failed to commit: {}", e)))
    }

    /// Names of tables starting with `prefix`, compared literally (the `_`
    /// in `Uploaded_` must not act as a LIKE wildcard).
    pub async fn list_tables_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::PersistenceError(format!("Failed to list tables: {}", e))
                })?;

        Ok(names
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect())
    }

    /// Read an entire table. Column names come from the schema, so an empty
    /// table still reports its header.
    pub async fn fetch_table(&self, table_name: &str) -> Result<TableData> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table_name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::PersistenceError(format!("Failed to check table name: {}", e))
                })?;

        if existing.is_none() {
            return Err(AppError::PersistenceError(format!(
                "No such table: {}",
                table_name
            )));
        }

        let columns: Vec<String> =
            sqlx::query(&format!("PRAGMA table_info({})", quote_ident(table_name)))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::PersistenceError(format!("Failed to read table schema: {}", e))
                })?
                .iter()
                .map(|row| row.try_get::<String, _>("name"))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| {
                    AppError::PersistenceError(format!("Failed to read table schema: {}", e))
                })?;

        let rows = sqlx::query(&format!("SELECT * FROM {}", quote_ident(table_name)))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::PersistenceError(format!("Failed to read table: {}", e)))?;

        let rows = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<Vec<Value>>>>()?;

        Ok(TableData { columns, rows })
    }

    /// Run an arbitrary query and return its full result, unmodified. With
    /// no result rows the column list is empty.
    pub async fn fetch_query(&self, sql: &str) -> Result<TableData> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::PersistenceError(format!("Query failed: {}", e)))?;

        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let rows = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<Vec<Value>>>>()?;

        Ok(TableData { columns, rows })
    }
}

/// Double-quote an identifier for SQLite, escaping embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Decode one row into JSON values following SQLite's dynamic typing.
fn decode_row(row: &SqliteRow) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(row.columns().len());

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row
            .try_get_raw(idx)
            .map_err(|e| AppError::PersistenceError(format!("Failed to read column: {}", e)))?;
        let is_null = raw.is_null();
        let type_name = raw.type_info().name().to_string();

        let value = if is_null {
            Value::Null
        } else {
            match type_name.as_str() {
                "INTEGER" => Value::from(get_cell::<i64>(row, idx)?),
                "REAL" => Value::from(get_cell::<f64>(row, idx)?),
                "BLOB" => Value::from(String::from_utf8_lossy(&get_cell::<Vec<u8>>(row, idx)?).into_owned()),
                _ => Value::from(get_cell::<String>(row, idx)?),
            }
        };
        values.push(value);
    }

    Ok(values)
}

fn get_cell<'r, T>(row: &'r SqliteRow, idx: usize) -> Result<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get::<T, _>(idx)
        .map_err(|e| AppError::PersistenceError(format!("Failed to decode column: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec!["NAME".to_string(), "SYMBOL".to_string()],
            vec![
                vec!["Nifty 50 ETF".to_string(), "NIFTYBEES".to_string()],
                vec!["Gold ETF".to_string(), "GOLDBEES".to_string()],
            ],
        )
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let store = memory_store().await;
        store
            .create_table("Uploaded_test_20240301_101530", &sample_dataset())
            .await
            .unwrap();

        let table = store
            .fetch_table("Uploaded_test_20240301_101530")
            .await
            .unwrap();
        assert_eq!(table.columns, vec!["NAME", "SYMBOL"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], Value::from("NIFTYBEES"));
    }

    #[tokio::test]
    async fn test_duplicate_table_name_is_rejected() {
        let store = memory_store().await;
        let dataset = sample_dataset();
        store.create_table("Uploaded_dup", &dataset).await.unwrap();

        let err = store.create_table("Uploaded_dup", &dataset).await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceError(_)));
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_table_behind() {
        let store = memory_store().await;
        let empty = Dataset::new(Vec::new(), Vec::new());

        assert!(store.create_table("Uploaded_empty", &empty).await.is_err());
        let names = store.list_tables_with_prefix("Uploaded_").await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_prefix_listing_is_literal() {
        let store = memory_store().await;
        let dataset = sample_dataset();
        store.create_table("Uploaded_a", &dataset).await.unwrap();
        store.create_table("Uploaded_b", &dataset).await.unwrap();
        // '_' must not match as a wildcard
        store.create_table("UploadedXc", &dataset).await.unwrap();

        let names = store.list_tables_with_prefix("Uploaded_").await.unwrap();
        assert_eq!(names, vec!["Uploaded_a", "Uploaded_b"]);
    }

    #[tokio::test]
    async fn test_fetch_missing_table_fails() {
        let store = memory_store().await;
        let err = store.fetch_table("ETF_Daily_Status").await.unwrap_err();
        assert!(err.to_string().contains("No such table"));
    }

    #[tokio::test]
    async fn test_fetch_empty_table_keeps_columns() {
        let store = memory_store().await;
        let header_only = Dataset::new(
            vec!["NAME".to_string(), "SYMBOL".to_string()],
            Vec::new(),
        );
        store.create_table("Uploaded_hdr", &header_only).await.unwrap();

        let table = store.fetch_table("Uploaded_hdr").await.unwrap();
        assert_eq!(table.columns, vec!["NAME", "SYMBOL"]);
        assert!(table.rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_query_passes_rows_through() {
        let store = memory_store().await;
        store.create_table("Uploaded_q", &sample_dataset()).await.unwrap();

        let result = store
            .fetch_query("SELECT SYMBOL FROM Uploaded_q ORDER BY SYMBOL")
            .await
            .unwrap();
        assert_eq!(result.columns, vec!["SYMBOL"]);
        assert_eq!(result.rows[0][0], Value::from("GOLDBEES"));
        assert_eq!(result.rows[1][0], Value::from("NIFTYBEES"));
    }

    #[tokio::test]
    async fn test_fetch_query_against_missing_table_fails() {
        let store = memory_store().await;
        let err = store.fetch_query("SELECT * FROM nope").await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceError(_)));
    }

    #[tokio::test]
    async fn test_quoted_identifiers_allow_spaced_columns() {
        let store = memory_store().await;
        let dataset = Dataset::new(
            vec!["MT MULTIPLE".to_string(), "MAX ALLOWED EXPOSURE IN CR".to_string()],
            vec![vec!["1.5".to_string(), "10".to_string()]],
        );
        store.create_table("Uploaded_spaced", &dataset).await.unwrap();

        let table = store.fetch_table("Uploaded_spaced").await.unwrap();
        assert_eq!(table.columns[0], "MT MULTIPLE");
        assert_eq!(table.rows[0][0], Value::from("1.5"));
    }
}
