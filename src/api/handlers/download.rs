// src/api/handlers/download.rs
use actix_files::NamedFile;
use actix_web::error::ErrorInternalServerError;
use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Local;

use super::session_id;
use crate::api::AppState;
use crate::report;

pub const NO_RESULTS_MESSAGE: &str = "No test results found. Run tests first.";

/// GET /download/pdf - PDF report of this session's latest submission
pub async fn download_pdf(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let submission = match session_id(&req) {
        Some(id) => state.sessions.get(&id).await,
        None => None,
    };

    let Some(submission) = submission else {
        return Ok(HttpResponse::BadRequest()
            .content_type(ContentType::plaintext())
            .body(NO_RESULTS_MESSAGE));
    };

    let reports_dir = state.config.reports_dir.clone();
    let path = web::block(move || report::write_report(&reports_dir, &submission, Local::now()))
        .await?
        .map_err(|e| {
            log::error!("Failed to write PDF report: {}", e);
            ErrorInternalServerError(e)
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "test_report.pdf".to_string());

    let file = NamedFile::open_async(&path)
        .await?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        });

    Ok(file.into_response(&req))
}
