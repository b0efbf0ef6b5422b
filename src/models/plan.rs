use serde::{Deserialize, Serialize};

use super::entry::ItineraryEntry;

/// Client-facing planning request. Everything arrives as plain text;
/// validation and numeric parsing happen in the route layer.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlanRequest {
    #[serde(default)]
    pub destination: String,
    #[serde(default, rename = "startDate")]
    pub start_date: String,
    #[serde(default)]
    pub travelers: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub days: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PlanMetadata {
    #[serde(default, rename = "totalBudgetEstimate")]
    pub total_budget_estimate: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "routeEntries")]
    pub route_entries: Vec<ItineraryEntry>,
}

/// What the planning backend hands back: a narrative plus, when the
/// generation kept its structure, a machine-readable payload.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripPlan {
    #[serde(rename = "narrativeText")]
    pub narrative_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlanMetadata>,
}
