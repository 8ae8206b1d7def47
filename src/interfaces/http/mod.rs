use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::application::{ImportCsvUseCase, ReportsUseCase};
use crate::domain::error::AppError;

pub struct HttpState {
    pub importer: ImportCsvUseCase,
    pub reports: ReportsUseCase,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub content: String,
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../../../static/index.html"))
}

#[get("/reports/daily-status")]
async fn daily_status(data: web::Data<HttpState>) -> impl Responder {
    match data.reports.daily_status().await {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(e) => {
            error!(error = %e, "Failed to load daily status");
            error_response(&e)
        }
    }
}

#[get("/reports/roi-summary")]
async fn roi_summary(data: web::Data<HttpState>) -> impl Responder {
    match data.reports.roi_summary().await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            error!(error = %e, "Failed to load ROI summary");
            error_response(&e)
        }
    }
}

#[get("/reports/trade-log")]
async fn trade_log(data: web::Data<HttpState>) -> impl Responder {
    match data.reports.trade_log().await {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(e) => {
            error!(error = %e, "Failed to load trade log");
            error_response(&e)
        }
    }
}

#[post("/uploads")]
async fn upload_csv(data: web::Data<HttpState>, req: web::Json<UploadRequest>) -> impl Responder {
    info!(file = %req.file_name, "Importing uploaded CSV");

    match data.importer.execute(&req.file_name, &req.content).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            error!(error = %e, file = %req.file_name, "CSV import failed");
            error_response(&e)
        }
    }
}

#[get("/uploads")]
async fn list_uploads(data: web::Data<HttpState>) -> impl Responder {
    match data.reports.list_uploads().await {
        Ok(tables) => HttpResponse::Ok().json(json!({ "tables": tables })),
        Err(e) => {
            error!(error = %e, "Failed to list uploads");
            error_response(&e)
        }
    }
}

#[get("/uploads/{table_name}")]
async fn view_upload(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let table_name = path.into_inner();
    match data.reports.view_upload(&table_name).await {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(e) => {
            error!(error = %e, table = %table_name, "Failed to load uploaded table");
            error_response(&e)
        }
    }
}

/// Errors render as inline messages on the page; the status code carries
/// the kind.
fn error_response(err: &AppError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        AppError::ValidationError { .. } => HttpResponse::UnprocessableEntity().json(body),
        AppError::ParseError(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(daily_status)
        .service(roi_summary)
        .service(trade_log)
        .service(upload_csv)
        .service(list_uploads)
        .service(view_upload)
}

pub fn start_server(state: web::Data<HttpState>, host: &str, port: u16) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(index)
            .service(api_scope())
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
