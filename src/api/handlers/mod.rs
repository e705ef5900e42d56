// src/api/handlers/mod.rs
mod assets;
mod download;
mod generate;
mod health;
mod index;

pub use assets::static_asset;
pub use download::{download_pdf, NO_RESULTS_MESSAGE};
pub use generate::{generate, GenerateRequest, GenerateResponse};
pub use health::health_check;
pub use index::{index_page, submit, SubmitForm};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::HttpRequest;
use uuid::Uuid;

use crate::errors::GenError;

pub const SESSION_COOKIE: &str = "testgen_session";

/// Session id carried by the request's cookie, if it parses.
pub fn session_id(req: &HttpRequest) -> Option<Uuid> {
    req.cookie(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// HTTP status reported for a failed pipeline run.
pub fn status_for(error: &GenError) -> StatusCode {
    match error {
        GenError::InvalidInput(_) | GenError::FunctionNotFound => StatusCode::BAD_REQUEST,
        GenError::TestTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
