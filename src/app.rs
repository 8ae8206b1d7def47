use std::sync::Arc;

use actix_web::web;
use tracing::info;

use crate::application::{ImportCsvUseCase, ReportsUseCase};
use crate::domain::error::AppError;
use crate::infrastructure::config::Settings;
use crate::infrastructure::db::sqlite::SqliteStore;
use crate::interfaces::http::{start_server, HttpState};

pub async fn run() -> std::io::Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().map_err(to_io)?;
    settings.ensure_database_dir().map_err(to_io)?;

    let store = Arc::new(
        SqliteStore::init(&settings.database_url())
            .await
            .map_err(to_io)?,
    );

    let state = web::Data::new(HttpState {
        importer: ImportCsvUseCase::new(store.clone()),
        reports: ReportsUseCase::new(store),
    });

    info!(
        host = %settings.host,
        port = settings.port,
        db = %settings.database_path.display(),
        "Starting ETF dashboard"
    );

    start_server(state, &settings.host, settings.port)?.await
}

fn to_io(err: AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
