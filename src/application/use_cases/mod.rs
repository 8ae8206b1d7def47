pub mod import_csv;
pub mod reports;
