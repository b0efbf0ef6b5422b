use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::models::review::NewReview;
use crate::routes::{bad_request, not_found};
use crate::state::AppState;

/*
    /api/reviews  (GET)
*/
pub async fn get_reviews(state: web::Data<AppState>) -> impl Responder {
    let reviews = state.reviews.lock().expect("review store lock poisoned");
    HttpResponse::Ok().json(json!({ "success": true, "data": reviews.list() }))
}

/*
    /api/reviews  (POST)
*/
pub async fn add_review(
    state: web::Data<AppState>,
    input: web::Json<NewReview>,
) -> impl Responder {
    let new_review = input.into_inner();
    if new_review.author.trim().is_empty() {
        return bad_request("invalid_input", "author is required");
    }
    if new_review.location_name.trim().is_empty() {
        return bad_request("invalid_input", "locationName is required");
    }
    if new_review.text.trim().is_empty() {
        return bad_request("invalid_input", "text is required");
    }
    if !(1..=5).contains(&new_review.rating) {
        return bad_request("invalid_input", "rating must be between 1 and 5");
    }

    let mut reviews = state.reviews.lock().expect("review store lock poisoned");
    let review = reviews.add(new_review);
    HttpResponse::Ok().json(json!({ "success": true, "data": review }))
}

/*
    /api/reviews/{id}/like  (POST)
*/
pub async fn like_review(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match Uuid::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return bad_request("invalid_input", "review id must be a UUID"),
    };

    let mut reviews = state.reviews.lock().expect("review store lock poisoned");
    match reviews.like(id) {
        Some(likes) => HttpResponse::Ok().json(json!({ "success": true, "data": { "likes": likes } })),
        None => not_found("Review not found"),
    }
}
