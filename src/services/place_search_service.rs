use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use std::{env, fmt};

use crate::models::entry::Coordinate;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_CANDIDATES: usize = 8;
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// One geocoder hit the user can pick a destination day for.
#[derive(Debug, Serialize, Clone)]
pub struct PlaceCandidate {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub coordinate: Coordinate,
}

/// The geocoder's wire shape: coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct GeocoderPlace {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug)]
pub enum PlaceSearchError {
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PlaceSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceSearchError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PlaceSearchError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for PlaceSearchError {}

impl From<reqwest::Error> for PlaceSearchError {
    fn from(err: reqwest::Error) -> Self {
        PlaceSearchError::HttpError(err)
    }
}

#[derive(Clone)]
pub struct PlaceSearchService {
    client: Client,
    base_url: String,
}

impl PlaceSearchService {
    pub fn new() -> Result<Self, PlaceSearchError> {
        let base_url =
            env::var("PLACE_SEARCH_API_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Free-text query to an ordered candidate list. Hits without a
    /// usable coordinate are dropped rather than surfaced.
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
        let limit = MAX_CANDIDATES.to_string();
        let places: Vec<GeocoderPlace> = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .header(reqwest::header::USER_AGENT, "wanderplan-api")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| PlaceSearchError::ResponseError(err.to_string()))?;

        Ok(places
            .into_iter()
            .filter_map(|place| {
                let lat: f64 = place.lat.trim().parse().ok()?;
                let lng: f64 = place.lon.trim().parse().ok()?;
                let coordinate = Coordinate::new(lat, lng);
                if !coordinate.is_placeable() {
                    return None;
                }
                Some(PlaceCandidate {
                    display_name: place.display_name,
                    coordinate,
                })
            })
            .collect())
    }
}
