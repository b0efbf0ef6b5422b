use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::models::entry::{Coordinate, EntryPatch, ItineraryEntry};
use crate::models::plan::TripPlan;
use crate::routes::{bad_request, not_found};
use crate::services::itinerary_store::DEFAULT_DAY;
use crate::services::{expense_service, map_projection, presentation_service};
use crate::state::{AppState, TripSession};

/*
    /api/trip  (POST: import a planning result, replacing the session)
*/
pub async fn import_trip(
    state: web::Data<AppState>,
    input: web::Json<TripPlan>,
) -> impl Responder {
    let plan = input.into_inner();
    let mut session = state.session.lock().expect("trip session lock poisoned");
    session.apply_plan(&plan);
    HttpResponse::Ok().json(json!({ "success": true, "data": trip_view(&session) }))
}

/*
    /api/trip  (GET: current entries, day grouping, warnings)
*/
pub async fn get_trip(state: web::Data<AppState>) -> impl Responder {
    let session = state.session.lock().expect("trip session lock poisoned");
    HttpResponse::Ok().json(json!({ "success": true, "data": trip_view(&session) }))
}

#[derive(Debug, Deserialize)]
pub struct InsertRequest {
    pub entry: ItineraryEntry,
    #[serde(default)]
    pub day: Option<String>,
    /// Epoch observed when the async flow began; a stale value means
    /// the trip was replaced meanwhile and the insert is dropped.
    #[serde(default)]
    pub epoch: Option<u64>,
}

/*
    /api/trip/entries  (POST)
*/
pub async fn insert_entry(
    state: web::Data<AppState>,
    input: web::Json<InsertRequest>,
) -> impl Responder {
    let request = input.into_inner();
    if request.entry.name.trim().is_empty() {
        return bad_request("invalid_input", "entry name is required");
    }

    let mut session = state.session.lock().expect("trip session lock poisoned");
    let day = request
        .day
        .or_else(|| request.entry.day.clone())
        .unwrap_or_else(|| DEFAULT_DAY.to_string());

    let applied = match request.epoch {
        Some(epoch) => session.store.insert_if_current(request.entry, &day, epoch),
        None => {
            session.store.insert(request.entry, &day);
            true
        }
    };

    HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "applied": applied, "trip": trip_view(&session) },
    }))
}

/*
    /api/trip/entries/{index}  (DELETE)
*/
pub async fn delete_entry(state: web::Data<AppState>, path: web::Path<usize>) -> impl Responder {
    let index = path.into_inner();
    let mut session = state.session.lock().expect("trip session lock poisoned");
    match session.store.delete(index) {
        Ok(_) => HttpResponse::Ok().json(json!({ "success": true, "data": trip_view(&session) })),
        Err(err) => not_found(&err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "destIndex")]
    pub dest_index: usize,
    #[serde(rename = "destDay")]
    pub dest_day: String,
    #[serde(rename = "insertAfter")]
    pub insert_after: bool,
}

/*
    /api/trip/entries/{index}/move  (POST, one call per completed drag)
*/
pub async fn move_entry(
    state: web::Data<AppState>,
    path: web::Path<usize>,
    input: web::Json<MoveRequest>,
) -> impl Responder {
    let source_index = path.into_inner();
    let request = input.into_inner();
    let mut session = state.session.lock().expect("trip session lock poisoned");
    match session.store.move_entry(
        source_index,
        request.dest_index,
        &request.dest_day,
        request.insert_after,
    ) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true, "data": trip_view(&session) })),
        Err(err) => not_found(&err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct RetimeRequest {
    pub time: String,
}

/*
    /api/trip/entries/{index}/time  (PUT)
*/
pub async fn retime_entry(
    state: web::Data<AppState>,
    path: web::Path<usize>,
    input: web::Json<RetimeRequest>,
) -> impl Responder {
    let index = path.into_inner();
    let mut session = state.session.lock().expect("trip session lock poisoned");
    match session.store.retime(index, &input.time) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true, "data": trip_view(&session) })),
        Err(err) => not_found(&err.to_string()),
    }
}

/*
    /api/trip/entries/{index}  (PUT: display fields only)
*/
pub async fn replace_entry_content(
    state: web::Data<AppState>,
    path: web::Path<usize>,
    input: web::Json<EntryPatch>,
) -> impl Responder {
    let index = path.into_inner();
    let mut session = state.session.lock().expect("trip session lock poisoned");
    match session.store.replace_content(index, input.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true, "data": trip_view(&session) })),
        Err(err) => not_found(&err.to_string()),
    }
}

/*
    /api/trip/expenses  (GET)
*/
pub async fn get_expenses(state: web::Data<AppState>) -> impl Responder {
    let session = state.session.lock().expect("trip session lock poisoned");
    let breakdown = expense_service::aggregate(session.store.entries(), &session.budget_text);
    HttpResponse::Ok().json(json!({ "success": true, "data": breakdown }))
}

#[derive(Debug, Deserialize)]
pub struct ViewportQuery {
    pub south: Option<f64>,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,
}

/*
    /api/trip/map  (GET; pass a viewport to cull, omit it for all markers)
*/
pub async fn get_map(
    state: web::Data<AppState>,
    query: web::Query<ViewportQuery>,
) -> impl Responder {
    let session = state.session.lock().expect("trip session lock poisoned");
    let entries = session.store.entries();

    let markers = match (query.south, query.west, query.north, query.east) {
        (Some(south), Some(west), Some(north), Some(east)) => {
            let viewport = map_projection::GeoBounds {
                south,
                west,
                north,
                east,
            };
            map_projection::visible_markers(entries, &viewport)
        }
        _ => map_projection::markers(entries),
    };

    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "fitView": map_projection::fit_view(entries),
            "markers": markers,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct FlyToQuery {
    pub lat: f64,
    pub lng: f64,
}

/*
    /api/trip/fly-to  (GET; a null flyTo means the target was unplaceable)
*/
pub async fn fly_to(query: web::Query<FlyToQuery>) -> impl Responder {
    let request = map_projection::fly_to(Some(Coordinate::new(query.lat, query.lng)));
    HttpResponse::Ok().json(json!({ "success": true, "data": { "flyTo": request } }))
}

/*
    /api/trip/highlights  (GET: day themes + top-rated spots)
*/
pub async fn get_highlights(state: web::Data<AppState>) -> impl Responder {
    let session = state.session.lock().expect("trip session lock poisoned");
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "themes": presentation_service::day_themes(&session.narrative),
            "topSpots": presentation_service::top_rated_spots(session.store.entries()),
        },
    }))
}

/// Serializable snapshot of the session: flat entries, day grouping,
/// per-day warnings, and the epoch async flows should carry.
fn trip_view(session: &TripSession) -> serde_json::Value {
    let days: Vec<serde_json::Value> = session
        .store
        .day_groups()
        .into_iter()
        .map(|(day, entries)| json!({ "day": day, "entries": entries }))
        .collect();

    json!({
        "entries": session.store.entries(),
        "days": days,
        "warnings": session.store.warnings(),
        "tags": session.tags,
        "budget": session.budget_text,
        "epoch": session.store.epoch(),
    })
}
