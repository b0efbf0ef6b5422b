use std::sync::Mutex;

use crate::models::plan::TripPlan;
use crate::services::itinerary_store::ItineraryStore;
use crate::services::review_service::ReviewStore;

/// The single trip this session is editing: the entry store plus the
/// trip-level narrative, stated budget, and tags from the last plan.
#[derive(Debug, Default)]
pub struct TripSession {
    pub store: ItineraryStore,
    pub narrative: String,
    pub budget_text: String,
    pub tags: Vec<String>,
}

impl TripSession {
    /// Seeds the session from a planning result, replacing whatever was
    /// here before. Bumping the store epoch invalidates any in-flight
    /// async edits aimed at the previous trip.
    pub fn apply_plan(&mut self, plan: &TripPlan) {
        self.narrative = plan.narrative_text.clone();
        let metadata = plan.metadata.clone().unwrap_or_default();
        self.budget_text = metadata.total_budget_estimate;
        self.tags = metadata.tags;
        self.store.seed(metadata.route_entries);
    }
}

/// Shared app state. All store mutations run to completion under the
/// session lock, so edits never interleave.
#[derive(Debug, Default)]
pub struct AppState {
    pub session: Mutex<TripSession>,
    pub reviews: Mutex<ReviewStore>,
}
