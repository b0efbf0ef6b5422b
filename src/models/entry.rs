use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The upstream payload uses (0, 0) as its "no location" sentinel,
    /// so an exact zero pair is never treated as a real stop.
    pub fn is_placeable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && !(self.lat == 0.0 && self.lng == 0.0)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lodging,
    Food,
    #[default]
    #[serde(other)]
    Attraction,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ItineraryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(
        default,
        rename = "openingHours",
        skip_serializing_if = "Option::is_none"
    )]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, rename = "userNote", skip_serializing_if = "Option::is_none")]
    pub user_note: Option<String>,
}

/// Display fields the user can overwrite without touching time or day.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

/// Accepts the coordinate shapes the planning backend actually emits:
/// a `[lat, lng]` pair (numbers or numeric strings) or a `{lat, lng}`
/// object. Anything non-numeric becomes "no location" instead of failing
/// the whole entry.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coordinate_from_value))
}

fn coordinate_from_value(value: &serde_json::Value) -> Option<Coordinate> {
    match value {
        serde_json::Value::Array(parts) if parts.len() >= 2 => {
            let lat = numeric(&parts[0])?;
            let lng = numeric(&parts[1])?;
            Some(Coordinate::new(lat, lng))
        }
        serde_json::Value::Object(map) => {
            let lat = numeric(map.get("lat")?)?;
            let lng = numeric(map.get("lng")?)?;
            Some(Coordinate::new(lat, lng))
        }
        _ => None,
    }
}

fn numeric(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_array_with_numeric_strings() {
        let entry: ItineraryEntry = serde_json::from_str(
            r#"{"name": "Asakusa Temple", "coordinate": ["35.7148", "139.7967"]}"#,
        )
        .unwrap();
        let coord = entry.coordinate.unwrap();
        assert!((coord.lat - 35.7148).abs() < 1e-9);
        assert!((coord.lng - 139.7967).abs() < 1e-9);
    }

    #[test]
    fn test_non_numeric_coordinate_becomes_none() {
        let entry: ItineraryEntry = serde_json::from_str(
            r#"{"name": "Mystery Stop", "coordinate": ["unknown", ""]}"#,
        )
        .unwrap();
        assert!(entry.coordinate.is_none());
    }

    #[test]
    fn test_zero_pair_is_not_placeable() {
        assert!(!Coordinate::new(0.0, 0.0).is_placeable());
        assert!(Coordinate::new(35.68, 139.69).is_placeable());
    }

    #[test]
    fn test_unknown_category_defaults_to_attraction() {
        let entry: ItineraryEntry =
            serde_json::from_str(r#"{"name": "Ferry Ride", "category": "boat"}"#).unwrap();
        assert_eq!(entry.category, Category::Attraction);

        let entry: ItineraryEntry = serde_json::from_str(r#"{"name": "Hotel"}"#).unwrap();
        assert_eq!(entry.category, Category::Attraction);
    }
}
