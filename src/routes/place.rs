use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::routes::{bad_request, error_json};
use crate::services::place_search_service::PlaceSearchService;

#[derive(Debug, Deserialize)]
pub struct PlaceQuery {
    #[serde(default)]
    pub q: String,
}

/*
    /api/places/search?q=
*/
pub async fn search_places(
    service: web::Data<PlaceSearchService>,
    query: web::Query<PlaceQuery>,
) -> impl Responder {
    let q = query.q.trim();
    if q.is_empty() {
        return bad_request("invalid_input", "q is required");
    }

    match service.search(q).await {
        Ok(candidates) => HttpResponse::Ok().json(json!({ "success": true, "data": candidates })),
        Err(err) => {
            eprintln!("Place search failed for '{}': {}", q, err);
            HttpResponse::BadGateway().json(error_json(
                "place_search_failed",
                "Place search is unavailable right now.",
            ))
        }
    }
}
