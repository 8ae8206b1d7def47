pub mod use_cases;

pub use use_cases::import_csv::{ImportCsvUseCase, ImportOutcome};
pub use use_cases::reports::{ReportsUseCase, RoiSummary};
