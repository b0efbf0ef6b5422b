use serde::{Deserialize, Serialize};

use crate::models::entry::{Category, Coordinate, ItineraryEntry};
use crate::services::itinerary_store::DEFAULT_DAY;

// Degrees of slack around the fitted bounds and the culling viewport.
const BOUNDS_PADDING_DEG: f64 = 0.02;
const CULL_MARGIN_DEG: f64 = 0.01;

// Clustered destinations should not over-zoom the initial view.
const MAX_FIT_ZOOM: f32 = 14.0;
const FLY_TO_ZOOM: f32 = 15.0;
const FLY_TO_DURATION_MS: u32 = 800;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.lat >= self.south
            && coordinate.lat <= self.north
            && coordinate.lng >= self.west
            && coordinate.lng <= self.east
    }

    pub fn expanded(&self, margin: f64) -> GeoBounds {
        GeoBounds {
            south: self.south - margin,
            west: self.west - margin,
            north: self.north + margin,
            east: self.east + margin,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct MapMarker {
    pub name: String,
    pub day: String,
    pub category: Category,
    pub coordinate: Coordinate,
}

/// Initial framing for the map surface: padded bounds over every
/// placeable entry plus a zoom estimate.
#[derive(Debug, Serialize, Clone)]
pub struct FitView {
    pub bounds: GeoBounds,
    pub zoom: f32,
}

/// Request for the map surface to animate to a point.
#[derive(Debug, Serialize, Clone)]
pub struct FlyToRequest {
    pub center: Coordinate,
    pub zoom: f32,
    #[serde(rename = "durationMs")]
    pub duration_ms: u32,
}

/// Every entry that can actually be placed: present, finite, and not
/// the (0, 0) sentinel.
pub fn markers(entries: &[ItineraryEntry]) -> Vec<MapMarker> {
    entries
        .iter()
        .filter_map(|entry| {
            let coordinate = entry.coordinate.filter(Coordinate::is_placeable)?;
            Some(MapMarker {
                name: entry.name.clone(),
                day: entry.day.clone().unwrap_or_else(|| DEFAULT_DAY.to_string()),
                category: entry.category,
                coordinate,
            })
        })
        .collect()
}

/// Bounding viewport over all placeable coordinates, expanded by a fixed
/// padding, with the zoom capped so a tight cluster is not over-zoomed.
/// `None` when nothing on the trip can be placed.
pub fn fit_view(entries: &[ItineraryEntry]) -> Option<FitView> {
    let points: Vec<Coordinate> = markers(entries)
        .into_iter()
        .map(|marker| marker.coordinate)
        .collect();
    let first = points.first()?;

    let mut bounds = GeoBounds {
        south: first.lat,
        west: first.lng,
        north: first.lat,
        east: first.lng,
    };
    for point in &points[1..] {
        bounds.south = bounds.south.min(point.lat);
        bounds.west = bounds.west.min(point.lng);
        bounds.north = bounds.north.max(point.lat);
        bounds.east = bounds.east.max(point.lng);
    }

    let span = (bounds.north - bounds.south)
        .max(bounds.east - bounds.west)
        .max(f64::EPSILON);
    let zoom = ((360.0 / span).log2() as f32).clamp(1.0, MAX_FIT_ZOOM);

    Some(FitView {
        bounds: bounds.expanded(BOUNDS_PADDING_DEG),
        zoom,
    })
}

/// Markers inside the viewport expanded by a fixed margin, so pins do
/// not pop in and out exactly at the edge while panning. Linear scan;
/// a single trip is tens of points at most.
pub fn visible_markers(entries: &[ItineraryEntry], viewport: &GeoBounds) -> Vec<MapMarker> {
    let padded = viewport.expanded(CULL_MARGIN_DEG);
    markers(entries)
        .into_iter()
        .filter(|marker| padded.contains(marker.coordinate))
        .collect()
}

/// Center-and-zoom request for a chosen point; a no-op for the sentinel
/// or other unplaceable coordinates.
pub fn fly_to(coordinate: Option<Coordinate>) -> Option<FlyToRequest> {
    let center = coordinate.filter(Coordinate::is_placeable)?;
    Some(FlyToRequest {
        center,
        zoom: FLY_TO_ZOOM,
        duration_ms: FLY_TO_DURATION_MS,
    })
}
