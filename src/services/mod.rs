pub mod expense_service;
pub mod itinerary_store;
pub mod map_projection;
pub mod place_search_service;
pub mod planning_service;
pub mod presentation_service;
pub mod review_service;
pub mod schedule_validator;
pub mod time_parser;
pub mod weather_service;
