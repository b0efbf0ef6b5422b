//! Planning Backend Client
//!
//! Proxies a planning prompt to the LLM planning service and normalizes
//! whatever comes back into a narrative plus an optional structured
//! payload.
//!
//! ## Setup
//! 1. Set `PLANNING_API_URL` to the planning backend's generate endpoint
//! 2. Set `PLANNING_API_KEY` to its bearer token
//!
//! ## Degradation
//! A response without usable structured metadata still yields the
//! narrative text with zero route entries; metadata extraction never
//! fails the whole request.

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use std::{env, fmt};

use crate::models::plan::{PlanMetadata, PlanRequest, TripPlan};

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Key that identifies a structured payload when scanning loose JSON
/// out of the narrative.
const METADATA_KEY: &str = "routeEntries";

#[derive(Debug)]
pub enum PlanningError {
    EnvironmentError(String),
    Auth,
    Quota,
    Unavailable,
    SafetyBlocked,
    EmptyResponse,
    Network(reqwest::Error),
    Malformed(String),
    Unknown(String),
}

impl PlanningError {
    /// Stable machine-readable code for the `{error, code}` envelope.
    pub fn code(&self) -> &'static str {
        match self {
            PlanningError::EnvironmentError(_) => "planner_unconfigured",
            PlanningError::Auth => "upstream_auth",
            PlanningError::Quota => "quota_exceeded",
            PlanningError::Unavailable => "upstream_unavailable",
            PlanningError::SafetyBlocked => "safety_blocked",
            PlanningError::EmptyResponse => "empty_generation",
            PlanningError::Network(_) => "network_error",
            PlanningError::Malformed(_) => "malformed_response",
            PlanningError::Unknown(_) => "unknown",
        }
    }

    /// One explanatory message per failure category.
    pub fn user_message(&self) -> &'static str {
        match self {
            PlanningError::EnvironmentError(_) => {
                "The planning service is not configured. Please try again later."
            }
            PlanningError::Auth => "The planning service rejected our credentials.",
            PlanningError::Quota => {
                "The planning service is over its usage limit. Please retry in a minute."
            }
            PlanningError::Unavailable => {
                "The planning service is temporarily unavailable. Please retry."
            }
            PlanningError::SafetyBlocked => {
                "The planning service declined this request. Try rephrasing your trip details."
            }
            PlanningError::EmptyResponse => {
                "The planning service returned an empty itinerary. Please retry."
            }
            PlanningError::Network(_) => "Could not reach the planning service.",
            PlanningError::Malformed(_) => "The planning service sent an unreadable response.",
            PlanningError::Unknown(_) => "Something went wrong while planning this trip.",
        }
    }
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            PlanningError::Auth => write!(f, "Upstream authentication failure"),
            PlanningError::Quota => write!(f, "Upstream quota exhausted"),
            PlanningError::Unavailable => write!(f, "Upstream unavailable"),
            PlanningError::SafetyBlocked => write!(f, "Generation blocked by safety filter"),
            PlanningError::EmptyResponse => write!(f, "Upstream returned an empty generation"),
            PlanningError::Network(err) => write!(f, "Network error: {}", err),
            PlanningError::Malformed(msg) => write!(f, "Malformed upstream response: {}", msg),
            PlanningError::Unknown(msg) => write!(f, "Unknown planning error: {}", msg),
        }
    }
}

impl Error for PlanningError {}

impl From<reqwest::Error> for PlanningError {
    fn from(err: reqwest::Error) -> Self {
        PlanningError::Network(err)
    }
}

#[derive(Debug, Serialize)]
struct UpstreamRequest {
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    metadata: Option<PlanMetadata>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Clone)]
pub struct PlanningService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl PlanningService {
    pub fn new() -> Result<Self, PlanningError> {
        let api_url = env::var("PLANNING_API_URL")
            .map_err(|_| PlanningError::EnvironmentError("PLANNING_API_URL not set".to_string()))?;
        let api_key = env::var("PLANNING_API_KEY")
            .map_err(|_| PlanningError::EnvironmentError("PLANNING_API_KEY not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Sends the planning prompt upstream and maps every failure mode
    /// onto its own category.
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<TripPlan, PlanningError> {
        let body = UpstreamRequest {
            prompt: build_prompt(request),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(PlanningError::Auth),
            StatusCode::TOO_MANY_REQUESTS => return Err(PlanningError::Quota),
            status if status.is_server_error() => return Err(PlanningError::Unavailable),
            status => return Err(PlanningError::Unknown(format!("HTTP {}", status))),
        }

        let upstream: UpstreamResponse = response
            .json()
            .await
            .map_err(|err| PlanningError::Malformed(err.to_string()))?;

        if upstream
            .finish_reason
            .as_deref()
            .map_or(false, |reason| reason.eq_ignore_ascii_case("safety"))
        {
            return Err(PlanningError::SafetyBlocked);
        }

        if upstream.text.trim().is_empty() && upstream.metadata.is_none() {
            return Err(PlanningError::EmptyResponse);
        }

        let metadata = upstream
            .metadata
            .or_else(|| extract_metadata(&upstream.text));

        Ok(TripPlan {
            narrative_text: upstream.text,
            metadata,
        })
    }
}

fn build_prompt(request: &PlanRequest) -> String {
    let personality = request.personality.as_deref().unwrap_or("balanced");
    format!(
        "Plan a {} day trip to {} starting {} for {} with a total budget of {}. \
         Travel style: {}. Write a day-by-day narrative with `Day N: theme` headings, \
         then append a fenced ```json block with keys totalBudgetEstimate, tags and \
         routeEntries (day, time, name, description, coordinate, category, cost, rating).",
        request.days,
        request.destination,
        request.start_date,
        request.travelers,
        request.budget,
        personality,
    )
}

/// Recovers a structured payload embedded in the narrative: first from a
/// fenced code block, then by scanning for a brace run containing the
/// known key. Returns `None` rather than erroring; the caller degrades
/// to narrative-only.
pub fn extract_metadata(narrative: &str) -> Option<PlanMetadata> {
    let fence_re = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap();
    for caps in fence_re.captures_iter(narrative) {
        if let Some(metadata) = parse_metadata(&caps[1]) {
            return Some(metadata);
        }
    }

    // Truncated generations lose the closing fence; fall back to the
    // outermost balanced object around the known key.
    let key_pos = narrative.find(&format!("\"{}\"", METADATA_KEY))?;
    let start = object_start(narrative, key_pos)?;
    let candidate = balanced_object(&narrative[start..])?;
    parse_metadata(candidate)
}

fn parse_metadata(raw: &str) -> Option<PlanMetadata> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if value.get(METADATA_KEY).is_none() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Walks backward from the key to the `{` that opens its enclosing
/// outermost object.
fn object_start(text: &str, key_pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut start = None;
    for (index, c) in text[..key_pos].char_indices().rev() {
        match c {
            '}' => depth += 1,
            '{' => {
                if depth == 0 {
                    start = Some(index);
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
    }
    start
}

fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=index]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_metadata_from_fenced_block() {
        let narrative = "Day 1: Harbor\nSee the boats.\n```json\n{\"totalBudgetEstimate\": \"5000\", \"tags\": [\"coastal\"], \"routeEntries\": [{\"name\": \"Harbor walk\"}]}\n```\n";
        let metadata = extract_metadata(narrative).unwrap();
        assert_eq!(metadata.total_budget_estimate, "5000");
        assert_eq!(metadata.route_entries.len(), 1);
        assert_eq!(metadata.route_entries[0].name, "Harbor walk");
    }

    #[test]
    fn test_extracts_bare_object_without_fence() {
        let narrative = "Here is the plan. {\"routeEntries\": [{\"name\": \"Shrine\"}], \"tags\": []} Enjoy!";
        let metadata = extract_metadata(narrative).unwrap();
        assert_eq!(metadata.route_entries[0].name, "Shrine");
    }

    #[test]
    fn test_fenced_block_without_known_key_is_ignored() {
        let narrative = "```json\n{\"note\": \"not a payload\"}\n```";
        assert!(extract_metadata(narrative).is_none());
    }

    #[test]
    fn test_truncated_object_degrades_to_none() {
        let narrative = "plan text {\"routeEntries\": [{\"name\": \"Shrine\"";
        assert!(extract_metadata(narrative).is_none());
    }

    #[test]
    fn test_plain_narrative_has_no_metadata() {
        assert!(extract_metadata("Just go and have fun.").is_none());
    }
}
