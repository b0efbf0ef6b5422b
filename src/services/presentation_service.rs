use regex::Regex;
use serde::Serialize;

use crate::models::entry::{Category, ItineraryEntry};
use crate::services::itinerary_store::DEFAULT_DAY;

const TOP_SPOT_COUNT: usize = 3;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DayTheme {
    pub day: String,
    pub theme: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct RatedSpot {
    pub name: String,
    pub day: String,
    pub rating: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum InlineSpan {
    Text(String),
    Bold(String),
}

/// Pulls the short theme line for each day out of the narrative's
/// `Day N: ...` headings.
pub fn day_themes(narrative: &str) -> Vec<DayTheme> {
    let heading_re = Regex::new(r"(?m)^#{0,4}\s*Day\s*(\d+)\s*[:：]\s*(.+?)\s*$").unwrap();
    heading_re
        .captures_iter(narrative)
        .map(|caps| DayTheme {
            day: format!("Day {}", &caps[1]),
            theme: caps[2].trim_end_matches(['#', '*']).trim().to_string(),
        })
        .collect()
}

/// Attraction entries ranked by the number in their rating text,
/// descending, top three. Entries without a readable rating are left
/// out rather than ranked at zero.
pub fn top_rated_spots(entries: &[ItineraryEntry]) -> Vec<RatedSpot> {
    let mut spots: Vec<RatedSpot> = entries
        .iter()
        .filter(|entry| entry.category == Category::Attraction)
        .filter_map(|entry| {
            let rating = entry.rating.as_deref().and_then(rating_number)?;
            Some(RatedSpot {
                name: entry.name.clone(),
                day: entry.day.clone().unwrap_or_else(|| DEFAULT_DAY.to_string()),
                rating,
            })
        })
        .collect();

    spots.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    spots.truncate(TOP_SPOT_COUNT);
    spots
}

/// Minimal inline-markup splitter: `**bold**` runs become bold spans,
/// everything else stays text. An unbalanced trailing marker leaves the
/// remainder as plain text.
pub fn split_bold(text: &str) -> Vec<InlineSpan> {
    let segments: Vec<&str> = text.split("**").collect();
    let balanced = segments.len() % 2 == 1;

    segments
        .into_iter()
        .enumerate()
        .filter(|(_, segment)| !segment.is_empty())
        .map(|(index, segment)| {
            if index % 2 == 1 && balanced {
                InlineSpan::Bold(segment.to_string())
            } else {
                InlineSpan::Text(segment.to_string())
            }
        })
        .collect()
}

fn rating_number(text: &str) -> Option<f64> {
    let number_re = Regex::new(r"(\d+(?:\.\d+)?)").unwrap();
    number_re
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attraction(name: &str, rating: Option<&str>) -> ItineraryEntry {
        ItineraryEntry {
            day: Some("Day 1".to_string()),
            time: None,
            name: name.to_string(),
            description: String::new(),
            coordinate: None,
            category: Category::Attraction,
            cost: None,
            rating: rating.map(String::from),
            opening_hours: None,
            contact: None,
            user_note: None,
        }
    }

    #[test]
    fn test_day_themes_from_headings() {
        let narrative = "## Day 1: Old town and harbor\nwander...\n### Day 2：Mountains\nclimb...\n";
        let themes = day_themes(narrative);
        assert_eq!(
            themes,
            vec![
                DayTheme {
                    day: "Day 1".to_string(),
                    theme: "Old town and harbor".to_string()
                },
                DayTheme {
                    day: "Day 2".to_string(),
                    theme: "Mountains".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_top_rated_spots_takes_three_descending() {
        let mut food = attraction("Night market", Some("4.9"));
        food.category = Category::Food;
        let entries = vec![
            attraction("Shrine", Some("4.6 stars")),
            attraction("Tower", Some("4.8")),
            attraction("Garden", Some("4.2")),
            attraction("Aquarium", Some("4.7")),
            attraction("Unrated alley", None),
            food,
        ];
        let spots = top_rated_spots(&entries);
        let names: Vec<&str> = spots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Tower", "Aquarium", "Shrine"]);
    }

    #[test]
    fn test_split_bold_alternates_spans() {
        let spans = split_bold("Visit **the castle** before lunch");
        assert_eq!(
            spans,
            vec![
                InlineSpan::Text("Visit ".to_string()),
                InlineSpan::Bold("the castle".to_string()),
                InlineSpan::Text(" before lunch".to_string()),
            ]
        );
    }

    #[test]
    fn test_split_bold_unbalanced_marker_stays_text() {
        let spans = split_bold("Dangling **marker");
        assert_eq!(
            spans,
            vec![
                InlineSpan::Text("Dangling ".to_string()),
                InlineSpan::Text("marker".to_string()),
            ]
        );
    }
}
