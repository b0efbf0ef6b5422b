use crate::models::entry::ItineraryEntry;
use crate::services::time_parser::{self, TimeInterval};

/// Sorts one day's entries and reports overlapping pairs.
///
/// Entries whose time text parses are ordered by interval start (stable,
/// so shared start times keep their original relative order); entries
/// without a parseable time trail the timed ones in their original order.
/// The returned ordering is what the store persists for the day, so
/// running `validate` on its own output changes nothing.
///
/// Overlap between adjacent timed entries is the only check. A minimum
/// gap between activities is deliberately not enforced; back-to-back
/// scheduling is a legitimate style for some travelers.
pub fn validate(entries: Vec<ItineraryEntry>) -> (Vec<ItineraryEntry>, Vec<String>) {
    let mut timed: Vec<(ItineraryEntry, TimeInterval)> = Vec::new();
    let mut untimed: Vec<ItineraryEntry> = Vec::new();

    for entry in entries {
        match entry.time.as_deref().and_then(time_parser::parse) {
            Some(interval) => timed.push((entry, interval)),
            None => untimed.push(entry),
        }
    }

    timed.sort_by_key(|(_, interval)| interval.start);

    let mut warnings = Vec::new();
    for pair in timed.windows(2) {
        let (current, current_interval) = &pair[0];
        let (next, next_interval) = &pair[1];
        if current_interval.end > next_interval.start {
            warnings.push(format!(
                "\"{}\" ({}) overlaps \"{}\" ({})",
                current.name,
                current.time.as_deref().unwrap_or(""),
                next.name,
                next.time.as_deref().unwrap_or(""),
            ));
        }
    }

    let mut ordered: Vec<ItineraryEntry> = timed.into_iter().map(|(entry, _)| entry).collect();
    ordered.append(&mut untimed);

    (ordered, warnings)
}
