// src/api/handlers/index.rs
use actix_web::error::ErrorInternalServerError;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;
use uuid::Uuid;

use super::{session_cookie, session_id, status_for};
use crate::api::page::{render_index, PageView};
use crate::api::AppState;
use crate::models::Submission;
use crate::runner;

#[derive(Deserialize)]
pub struct SubmitForm {
    pub code: String,
    #[serde(default)]
    pub function_name: Option<String>,
}

/// GET / - the empty form
pub async fn index_page() -> Result<HttpResponse> {
    let html = render_index(&PageView::default()).map_err(ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}

/// POST / - generate and run tests for the submitted code
pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<SubmitForm>,
) -> Result<HttpResponse> {
    let SubmitForm { code, function_name } = form.into_inner();
    let requested = function_name.as_deref().unwrap_or("");

    let outcome = runner::run_test_generation(
        &state.provider,
        &state.harness,
        state.prompt_template(),
        &code,
        function_name.as_deref(),
    )
    .await;

    match outcome {
        Ok(result) => {
            let html = render_index(&PageView {
                code: &code,
                function_name: requested,
                result: Some(&result),
                error: None,
            })
            .map_err(ErrorInternalServerError)?;

            let existing = session_id(&req);
            let session = existing.unwrap_or_else(Uuid::new_v4);
            state.sessions.put(session, Submission::new(code, result)).await;

            let mut response = HttpResponse::Ok();
            if existing.is_none() {
                log::info!("Started session {}", session);
                response.cookie(session_cookie(session));
            }
            Ok(response.content_type(ContentType::html()).body(html))
        }
        Err(e) => {
            log::error!("Test generation failed: {}", e);
            let html = render_index(&PageView {
                code: &code,
                function_name: requested,
                result: None,
                error: Some(e.to_string()),
            })
            .map_err(ErrorInternalServerError)?;

            Ok(HttpResponse::build(status_for(&e))
                .content_type(ContentType::html())
                .body(html))
        }
    }
}
