use actix_web::{web, HttpResponse, Responder};
use regex::Regex;
use serde_json::json;

use crate::models::plan::PlanRequest;
use crate::routes::{bad_request, error_json};
use crate::services::planning_service::{PlanningError, PlanningService};
use crate::state::AppState;

const MAX_DESTINATION_LEN: usize = 100;
const MAX_TEXT_FIELD_LEN: usize = 400;
const MAX_TRIP_DAYS: u32 = 30;

/*
    /api/plan
*/
pub async fn create_plan(
    planner: web::Data<Option<PlanningService>>,
    state: web::Data<AppState>,
    input: web::Json<PlanRequest>,
) -> impl Responder {
    let request = match sanitize_request(input.into_inner()) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let planner = match planner.as_ref() {
        Some(planner) => planner,
        None => {
            let err = PlanningError::EnvironmentError("planning backend not configured".into());
            return HttpResponse::ServiceUnavailable()
                .json(error_json(err.code(), err.user_message()));
        }
    };

    match planner.generate_plan(&request).await {
        Ok(plan) => {
            let mut session = state.session.lock().expect("trip session lock poisoned");
            session.apply_plan(&plan);
            println!(
                "Seeded trip session with {} entries across {} day(s)",
                session.store.entries().len(),
                session.store.day_order().len()
            );
            HttpResponse::Ok().json(json!({ "success": true, "data": plan }))
        }
        Err(err) => {
            eprintln!("Planning request failed: {}", err);
            planning_error_response(&err)
        }
    }
}

/// Validates and cleans the request before anything leaves the process:
/// missing/too-long fields are rejected with a field-specific message,
/// and free text is stripped of HTML tags.
fn sanitize_request(mut request: PlanRequest) -> Result<PlanRequest, HttpResponse> {
    request.destination = strip_html(&request.destination).trim().to_string();
    request.start_date = strip_html(&request.start_date).trim().to_string();
    request.travelers = strip_html(&request.travelers).trim().to_string();
    request.budget = strip_html(&request.budget).trim().to_string();
    request.days = request.days.trim().to_string();
    request.personality = request
        .personality
        .as_deref()
        .map(|p| strip_html(p).trim().to_string())
        .filter(|p| !p.is_empty());

    if request.destination.is_empty() {
        return Err(bad_request("invalid_input", "destination is required"));
    }
    if request.destination.chars().count() > MAX_DESTINATION_LEN {
        return Err(bad_request(
            "invalid_input",
            "destination is too long (100 characters max)",
        ));
    }
    for (field, value) in [
        ("startDate", &request.start_date),
        ("travelers", &request.travelers),
        ("budget", &request.budget),
    ] {
        if value.chars().count() > MAX_TEXT_FIELD_LEN {
            return Err(bad_request(
                "invalid_input",
                &format!("{} is too long (400 characters max)", field),
            ));
        }
    }
    if let Some(personality) = &request.personality {
        if personality.chars().count() > MAX_TEXT_FIELD_LEN {
            return Err(bad_request(
                "invalid_input",
                "personality is too long (400 characters max)",
            ));
        }
    }

    match request.days.parse::<u32>() {
        Ok(days) if (1..=MAX_TRIP_DAYS).contains(&days) => {}
        _ => {
            return Err(bad_request(
                "invalid_input",
                "days must be a whole number between 1 and 30",
            ))
        }
    }

    Ok(request)
}

fn strip_html(text: &str) -> String {
    let tag_re = Regex::new(r"<[^>]*>").unwrap();
    tag_re.replace_all(text, "").into_owned()
}

fn planning_error_response(err: &PlanningError) -> HttpResponse {
    let body = error_json(err.code(), err.user_message());
    match err {
        PlanningError::Quota => HttpResponse::TooManyRequests().json(body),
        PlanningError::SafetyBlocked => HttpResponse::UnprocessableEntity().json(body),
        PlanningError::Unavailable | PlanningError::EnvironmentError(_) => {
            HttpResponse::ServiceUnavailable().json(body)
        }
        PlanningError::Auth
        | PlanningError::EmptyResponse
        | PlanningError::Network(_)
        | PlanningError::Malformed(_) => HttpResponse::BadGateway().json(body),
        PlanningError::Unknown(_) => HttpResponse::InternalServerError().json(body),
    }
}
