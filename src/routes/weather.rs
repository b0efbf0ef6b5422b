use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::models::entry::Coordinate;
use crate::routes::{bad_request, error_json};
use crate::services::weather_service::WeatherService;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lng: f64,
}

/*
    /api/weather?lat=&lng=
*/
pub async fn get_weather(
    service: web::Data<WeatherService>,
    query: web::Query<WeatherQuery>,
) -> impl Responder {
    let coordinate = Coordinate::new(query.lat, query.lng);
    if !coordinate.is_placeable() {
        return bad_request("invalid_input", "lat/lng do not name a real location");
    }

    match service.forecast(coordinate).await {
        Ok(days) => HttpResponse::Ok().json(json!({ "success": true, "data": days })),
        Err(err) => {
            eprintln!("Weather lookup failed: {}", err);
            HttpResponse::BadGateway().json(error_json(
                "weather_unavailable",
                "The forecast is unavailable right now.",
            ))
        }
    }
}
