pub mod health;
pub mod itinerary;
pub mod place;
pub mod plan;
pub mod review;
pub mod weather;

use actix_web::HttpResponse;
use serde_json::json;

/// `{error, code}` envelope shared by every handler.
pub(crate) fn error_json(code: &str, message: &str) -> serde_json::Value {
    json!({ "error": message, "code": code })
}

pub(crate) fn bad_request(code: &str, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(error_json(code, message))
}

pub(crate) fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(error_json("not_found", message))
}
