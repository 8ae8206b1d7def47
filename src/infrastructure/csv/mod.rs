// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing for uploaded dataset files

mod csv_parser;

pub use csv_parser::CsvParser;
