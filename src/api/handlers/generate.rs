// src/api/handlers/generate.rs
use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status_for;
use crate::api::AppState;
use crate::runner::{self, GenerationResult};

#[derive(Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    pub code: String,
    #[serde(default)]
    pub function_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GenerateResponse {
    pub id: String,
    pub status: String,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

/// POST /api/v1/generate - stateless JSON variant of the form submission
pub async fn generate(
    state: web::Data<AppState>,
    req: web::Json<GenerateRequest>,
) -> Result<HttpResponse> {
    let id = Uuid::new_v4().to_string();
    let req_body = req.into_inner();

    match runner::run_test_generation(
        &state.provider,
        &state.harness,
        state.prompt_template(),
        &req_body.code,
        req_body.function_name.as_deref(),
    )
    .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(GenerateResponse {
            id,
            status: result.outcome().to_string(),
            result: Some(result),
            error: None,
        })),
        Err(e) => {
            log::error!("Generation {} failed: {}", id, e);
            Ok(HttpResponse::build(status_for(&e)).json(GenerateResponse {
                id,
                status: "error".to_string(),
                result: None,
                error: Some(e.to_string()),
            }))
        }
    }
}
