use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use serde_json::json;

use wanderplan_api::routes;
use wanderplan_api::services::place_search_service::PlaceSearchService;
use wanderplan_api::services::planning_service::PlanningService;
use wanderplan_api::services::weather_service::WeatherService;
use wanderplan_api::state::AppState;

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            state: web::Data::new(AppState::default()),
        }
    }

    /// The real route table with real handlers. The planning backend is
    /// deliberately unconfigured so /api/plan is exercised without any
    /// upstream; everything else runs the same code paths as main().
    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let planner: Option<PlanningService> = None;
        let place_search = PlaceSearchService::new().expect("place search client");
        let weather = WeatherService::new().expect("weather client");

        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(self.state.clone())
            .app_data(web::Data::new(planner))
            .app_data(web::Data::new(place_search))
            .app_data(web::Data::new(weather))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/plan")
                            .route("", web::post().to(routes::plan::create_plan)),
                    )
                    .service(
                        web::scope("/trip")
                            .route("", web::post().to(routes::itinerary::import_trip))
                            .route("", web::get().to(routes::itinerary::get_trip))
                            .route("/entries", web::post().to(routes::itinerary::insert_entry))
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
                            .route("/{id}/like", web::post().to(routes::review::like_review)),
                    ),
            )
    }
}

/// A three-day plan payload with unsorted Day 1 entries, one conflict-free
/// schedule, a sentinel coordinate, and mixed cost texts.
pub fn sample_plan() -> serde_json::Value {
    json!({
        "narrativeText": "## Day 1: Old town on foot\nWander the lanes.\n## Day 2: Across the bay\nFerries and forts.\n## Day 3: Slow morning\nPack and brunch.",
        "metadata": {
            "totalBudgetEstimate": "5,000",
            "tags": ["coastal", "history"],
            "routeEntries": [
                { "day": "Day 1", "time": "14:00", "name": "Harbor museum", "category": "attraction", "cost": "¥120", "rating": "4.6", "coordinate": [35.70, 139.70] },
                { "day": "Day 1", "time": "09:00", "name": "Morning market", "category": "food", "cost": "¥80", "coordinate": [35.69, 139.69] },
                { "day": "Day 1", "time": "11:00", "name": "Castle walls", "category": "attraction", "cost": "免费", "rating": "4.8", "coordinate": [35.71, 139.71] },
                { "day": "Day 2", "time": "08:30-10:00", "name": "Ferry transfer", "category": "attraction", "cost": "¥60", "coordinate": [35.60, 139.60] },
                { "day": "Day 2", "time": "10:30", "name": "Bay fort", "category": "attraction", "cost": "¥90", "rating": "4.2", "coordinate": [0, 0] },
                { "day": "Day 3", "name": "Brunch cafe", "category": "food", "cost": "¥150", "coordinate": [35.68, 139.68] },
                { "day": "Day 3", "time": "15:00", "name": "Ryokan night", "category": "lodging", "cost": "¥800", "coordinate": [35.67, 139.67] }
            ]
        }
    })
}
