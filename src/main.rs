use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use wanderplan_api::middleware::rate_limit::RateLimit;
use wanderplan_api::routes;
use wanderplan_api::services::place_search_service::PlaceSearchService;
use wanderplan_api::services::planning_service::PlanningService;
use wanderplan_api::services::weather_service::WeatherService;
use wanderplan_api::state::AppState;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

// Looser app-wide ceiling; the planning endpoint gets its own stricter
// per-address window because every hit costs an upstream generation.
const GLOBAL_RATE_LIMIT: usize = 120;
const PLAN_RATE_LIMIT: usize = 5;
const RATE_WINDOW_SECS: u64 = 60;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let planner = match PlanningService::new() {
        Ok(service) => {
            println!("Planning backend client initialized");
            Some(service)
        }
        Err(e) => {
            println!("Planning backend not available: {}. /api/plan will answer 503.", e);
            None
        }
    };
    let place_search = PlaceSearchService::new().expect("Failed to build place search client");
    let weather = WeatherService::new().expect("Failed to build weather client");

    let state = web::Data::new(AppState::default());
    let planner = web::Data::new(planner);
    let place_search = web::Data::new(place_search);
    let weather = web::Data::new(weather);
    let global_limit = RateLimit::global(GLOBAL_RATE_LIMIT, Duration::from_secs(RATE_WINDOW_SECS));
    let plan_limit = RateLimit::per_client(PLAN_RATE_LIMIT, Duration::from_secs(RATE_WINDOW_SECS));

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(global_limit.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(state.clone())
            .app_data(planner.clone())
            .app_data(place_search.clone())
            .app_data(weather.clone())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/plan")
                            .wrap(plan_limit.clone())
                            .route("", web::post().to(routes::plan::create_plan)),
                    )
                    .service(
                        web::scope("/trip")
                            .route("", web::post().to(routes::itinerary::import_trip))
                            .route("", web::get().to(routes::itinerary::get_trip))
                            .route(
                                "/entries",
                                web::post().to(routes::itinerary::insert_entry),
                            )
                            .route(
                                "/entries/{index}",
                                web::delete().to(routes::itinerary::delete_entry),
                            )
                            .route(
                                "/entries/{index}",
                                web::put().to(routes::itinerary::replace_entry_content),
                            )
                            .route(
                                "/entries/{index}/move",
                                web::post().to(routes::itinerary::move_entry),
                            )
                            .route(
                                "/entries/{index}/time",
                                web::put().to(routes::itinerary::retime_entry),
                            )
                            .route("/expenses", web::get().to(routes::itinerary::get_expenses))
                            .route("/map", web::get().to(routes::itinerary::get_map))
                            .route("/fly-to", web::get().to(routes::itinerary::fly_to))
                            .route(
                                "/highlights",
                                web::get().to(routes::itinerary::get_highlights),
                            ),
                    )
                    .route(
                        "/places/search",
                        web::get().to(routes::place::search_places),
                    )
                    .route("/weather", web::get().to(routes::weather::get_weather))
                    .service(
                        web::scope("/reviews")
                            .route("", web::get().to(routes::review::get_reviews))
                            .route("", web::post().to(routes::review::add_review))
                            .route(
                                "/{id}/like",
                                web::post().to(routes::review::like_review),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
