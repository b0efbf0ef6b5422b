use serde::{Deserialize, Serialize};

use crate::models::entry::{Category, ItineraryEntry};
use crate::services::itinerary_store::DEFAULT_DAY;

/// Cost texts that mean "nothing to allocate": the entry contributes
/// zero and stays out of the line-item list.
const UNPRICED_MARKERS: &[&str] = &["free", "免费", "included", "tbd", "待定", "undetermined"];

/// Name keywords that force an entry into the transport bucket
/// regardless of its declared category.
const TRANSPORT_KEYWORDS: &[&str] = &[
    "transfer", "pickup", "pick-up", "drop-off", "dropoff", "shuttle", "接送",
];

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Lodging,
    Food,
    Activity,
    Transport,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExpenseItem {
    pub name: String,
    pub amount: u32,
    pub category: ExpenseCategory,
    pub day: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ExpenseBreakdown {
    pub lodging: u32,
    pub food: u32,
    pub activity: u32,
    pub transport: u32,
    pub reserve: u32,
    pub items: Vec<ExpenseItem>,
}

impl ExpenseBreakdown {
    pub fn spent(&self) -> u32 {
        self.lodging + self.food + self.activity + self.transport
    }
}

/// Derives categorized spend totals from the entries' free-text cost
/// fields, reconciled against the stated total budget.
///
/// Unparseable costs are excluded silently; they are "unknown", not
/// failures. The reserve floors at zero even when tracked spend exceeds
/// the stated budget.
pub fn aggregate(entries: &[ItineraryEntry], budget_text: &str) -> ExpenseBreakdown {
    let mut breakdown = ExpenseBreakdown::default();

    for entry in entries {
        let amount = match entry.cost.as_deref().and_then(entry_amount) {
            Some(amount) => amount,
            None => continue,
        };
        let category = classify(entry);
        match category {
            ExpenseCategory::Lodging => breakdown.lodging += amount,
            ExpenseCategory::Food => breakdown.food += amount,
            ExpenseCategory::Activity => breakdown.activity += amount,
            ExpenseCategory::Transport => breakdown.transport += amount,
        }
        breakdown.items.push(ExpenseItem {
            name: entry.name.clone(),
            amount,
            category,
            day: entry.day.clone().unwrap_or_else(|| DEFAULT_DAY.to_string()),
        });
    }

    let budget = parse_budget(budget_text);
    breakdown.reserve = budget.saturating_sub(breakdown.spent());
    breakdown
}

/// First integer run after stripping thousand separators; an
/// unparseable budget counts as zero, which zeroes the reserve.
pub fn parse_budget(text: &str) -> u32 {
    let stripped: String = text.chars().filter(|c| *c != ',' && *c != '，').collect();
    first_digit_run(&stripped).unwrap_or(0)
}

fn entry_amount(cost: &str) -> Option<u32> {
    let lowered = cost.to_lowercase();
    if UNPRICED_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return None;
    }
    first_digit_run(cost)
}

fn first_digit_run(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn classify(entry: &ItineraryEntry) -> ExpenseCategory {
    let lowered = entry.name.to_lowercase();
    if TRANSPORT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return ExpenseCategory::Transport;
    }
    match entry.category {
        Category::Lodging => ExpenseCategory::Lodging,
        Category::Food => ExpenseCategory::Food,
        Category::Attraction => ExpenseCategory::Activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, category: Category, cost: Option<&str>) -> ItineraryEntry {
        ItineraryEntry {
            day: Some("Day 1".to_string()),
            time: None,
            name: name.to_string(),
            description: String::new(),
            coordinate: None,
            category,
            cost: cost.map(String::from),
            rating: None,
            opening_hours: None,
            contact: None,
            user_note: None,
        }
    }

    #[test]
    fn test_free_entries_contribute_nothing() {
        let entries = vec![
            entry("Ryokan night", Category::Lodging, Some("¥800")),
            entry("Street food crawl", Category::Food, Some("免费")),
        ];
        let breakdown = aggregate(&entries, "5000");
        assert_eq!(breakdown.lodging, 800);
        assert_eq!(breakdown.food, 0);
        assert_eq!(breakdown.reserve, 4200);
        assert_eq!(breakdown.items.len(), 1);
    }

    #[test]
    fn test_reserve_never_goes_negative() {
        let entries = vec![entry("Ryokan night", Category::Lodging, Some("¥9000"))];
        let breakdown = aggregate(&entries, "5000");
        assert_eq!(breakdown.reserve, 0);
    }

    #[test]
    fn test_transport_keyword_overrides_declared_category() {
        let entries = vec![entry(
            "Airport transfer to hotel",
            Category::Attraction,
            Some("120"),
        )];
        let breakdown = aggregate(&entries, "1000");
        assert_eq!(breakdown.transport, 120);
        assert_eq!(breakdown.activity, 0);
        assert_eq!(breakdown.items[0].category, ExpenseCategory::Transport);
    }

    #[test]
    fn test_unparseable_cost_is_skipped_silently() {
        let entries = vec![
            entry("Viewpoint", Category::Attraction, Some("varies by season")),
            entry("Museum", Category::Attraction, None),
            entry("Tea house", Category::Food, Some("about 40 per person")),
        ];
        let breakdown = aggregate(&entries, "500");
        assert_eq!(breakdown.food, 40);
        assert_eq!(breakdown.activity, 0);
        assert_eq!(breakdown.items.len(), 1);
        assert_eq!(breakdown.reserve, 460);
    }

    #[test]
    fn test_budget_with_thousand_separators() {
        assert_eq!(parse_budget("12,000 total"), 12000);
        assert_eq!(parse_budget("¥8,500"), 8500);
        assert_eq!(parse_budget("whatever it takes"), 0);
    }

    #[test]
    fn test_unparseable_budget_zeroes_the_reserve() {
        let entries = vec![entry("Ryokan night", Category::Lodging, Some("800"))];
        let breakdown = aggregate(&entries, "generous");
        assert_eq!(breakdown.lodging, 800);
        assert_eq!(breakdown.reserve, 0);
    }
}
