use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check() -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let planning_result = check_planning_backend();
    health
        .services
        .insert("planning".to_string(), planning_result.clone());

    let place_result = check_place_search();
    health
        .services
        .insert("place_search".to_string(), place_result.clone());

    let weather_result = check_weather();
    health
        .services
        .insert("weather".to_string(), weather_result.clone());

    // The planning backend is the only dependency that can take the
    // whole app down; the decorative services never degrade the status.
    if planning_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_planning_backend() -> ServiceStatus {
    let api_url = env::var("PLANNING_API_URL").ok();
    let api_key = env::var("PLANNING_API_KEY").ok();

    match (api_url, api_key) {
        (Some(url), Some(key)) => {
            let masked_key = if key.len() > 8 {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };
            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!(
                    "Planning backend configured at {} (key {})",
                    url, masked_key
                )),
            }
        }
        (url, key) => {
            let mut missing = Vec::new();
            if url.is_none() {
                missing.push("PLANNING_API_URL");
            }
            if key.is_none() {
                missing.push("PLANNING_API_KEY");
            }
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Missing configuration: {}", missing.join(", "))),
            }
        }
    }
}

fn check_place_search() -> ServiceStatus {
    let detail = env::var("PLACE_SEARCH_API_URL")
        .map(|url| format!("Geocoder configured at {}", url))
        .unwrap_or_else(|_| "Geocoder using default endpoint".to_string());
    ServiceStatus {
        status: "ok".to_string(),
        details: Some(detail),
    }
}

fn check_weather() -> ServiceStatus {
    let detail = env::var("WEATHER_API_URL")
        .map(|url| format!("Forecast service configured at {}", url))
        .unwrap_or_else(|_| "Forecast service using default endpoint".to_string());
    ServiceStatus {
        status: "ok".to_string(),
        details: Some(detail),
    }
}
