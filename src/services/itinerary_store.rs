use std::collections::HashMap;
use std::fmt;

use crate::models::entry::{EntryPatch, ItineraryEntry};
use crate::services::schedule_validator;

/// Bucket for entries the planning payload left without a day label.
pub const DEFAULT_DAY: &str = "Day 1";

#[derive(Debug)]
pub enum StoreError {
    IndexOutOfRange(usize),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IndexOutOfRange(index) => {
                write!(f, "No itinerary entry at index {}", index)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// The mutable in-memory model of the whole trip.
///
/// Owns the flat, ordered entry collection and the per-day warning map.
/// Every mutation re-runs the schedule validator for the affected day(s)
/// only; the validated ordering is written back into that day's slots in
/// the flat collection, so untouched days keep their order and warnings
/// verbatim. A day with no conflicts has no key in the warning map.
///
/// The epoch counter guards against late async completions: a seed bumps
/// it, and an insert carrying a stale epoch is discarded.
#[derive(Debug, Default)]
pub struct ItineraryStore {
    entries: Vec<ItineraryEntry>,
    warnings: HashMap<String, Vec<String>>,
    epoch: u64,
}

impl ItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ItineraryEntry] {
        &self.entries
    }

    pub fn warnings(&self) -> &HashMap<String, Vec<String>> {
        &self.warnings
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the whole collection with a fresh planning result.
    pub fn seed(&mut self, raw_entries: Vec<ItineraryEntry>) {
        self.epoch += 1;
        self.warnings.clear();
        self.entries = raw_entries
            .into_iter()
            .map(|mut entry| {
                if entry.day.as_deref().map_or(true, |d| d.trim().is_empty()) {
                    entry.day = Some(DEFAULT_DAY.to_string());
                }
                entry
            })
            .collect();

        for day in self.day_order() {
            self.revalidate_day(&day);
        }
    }

    /// Appends an entry to a day and re-validates that day only.
    pub fn insert(&mut self, mut entry: ItineraryEntry, day: &str) {
        entry.day = Some(day.to_string());
        self.entries.push(entry);
        self.revalidate_day(day);
    }

    /// Epoch-guarded insert for async flows (place search completing
    /// after the user already replaced the trip). Returns whether the
    /// entry was applied.
    pub fn insert_if_current(&mut self, entry: ItineraryEntry, day: &str, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.insert(entry, day);
        true
    }

    pub fn delete(&mut self, index: usize) -> Result<ItineraryEntry, StoreError> {
        if index >= self.entries.len() {
            return Err(StoreError::IndexOutOfRange(index));
        }
        let removed = self.entries.remove(index);
        if let Some(day) = removed.day.clone() {
            self.revalidate_day(&day);
        }
        Ok(removed)
    }

    /// Completes a drag: removes the source entry, reassigns its day,
    /// and re-inserts it adjacent to the destination entry. Both the
    /// source and destination days are re-validated (once, if they are
    /// the same day).
    pub fn move_entry(
        &mut self,
        source_index: usize,
        dest_index: usize,
        dest_day: &str,
        insert_after: bool,
    ) -> Result<(), StoreError> {
        if source_index >= self.entries.len() {
            return Err(StoreError::IndexOutOfRange(source_index));
        }
        if dest_index >= self.entries.len() {
            return Err(StoreError::IndexOutOfRange(dest_index));
        }

        let source_day = self.entries[source_index].day.clone();
        let mut entry = self.entries.remove(source_index);
        entry.day = Some(dest_day.to_string());

        let mut anchor = dest_index;
        if anchor > source_index {
            anchor -= 1;
        }
        let at = (anchor + insert_after as usize).min(self.entries.len());
        self.entries.insert(at, entry);

        if let Some(source_day) = source_day {
            if source_day != dest_day {
                self.revalidate_day(&source_day);
            }
        }
        self.revalidate_day(dest_day);
        Ok(())
    }

    /// Replaces an entry's time text and re-validates its day, which may
    /// shift the entry's position within that day.
    pub fn retime(&mut self, index: usize, new_time: &str) -> Result<(), StoreError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange(index))?;
        entry.time = Some(new_time.to_string());
        let day = entry.day.clone();
        if let Some(day) = day {
            self.revalidate_day(&day);
        }
        Ok(())
    }

    /// Overwrites display fields only. No ordering-relevant field
    /// changes, so no re-validation runs.
    pub fn replace_content(&mut self, index: usize, patch: EntryPatch) -> Result<(), StoreError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange(index))?;
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(cost) = patch.cost {
            entry.cost = Some(cost);
        }
        if let Some(rating) = patch.rating {
            entry.rating = Some(rating);
        }
        Ok(())
    }

    /// Day labels in order of first appearance.
    pub fn day_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for entry in &self.entries {
            let day = entry.day.as_deref().unwrap_or(DEFAULT_DAY);
            if !order.iter().any(|seen| seen == day) {
                order.push(day.to_string());
            }
        }
        order
    }

    /// Entries grouped by day, days in first-appearance order.
    pub fn day_groups(&self) -> Vec<(String, Vec<&ItineraryEntry>)> {
        self.day_order()
            .into_iter()
            .map(|day| {
                let members = self
                    .entries
                    .iter()
                    .filter(|entry| entry.day.as_deref().unwrap_or(DEFAULT_DAY) == day)
                    .collect();
                (day, members)
            })
            .collect()
    }

    /// Re-sorts one day in place and refreshes its warnings. The day's
    /// entries are pulled out, validated, and written back into the same
    /// slots of the flat collection; no other day is touched.
    fn revalidate_day(&mut self, day: &str) {
        let slots: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.day.as_deref() == Some(day))
            .map(|(index, _)| index)
            .collect();

        let day_entries: Vec<ItineraryEntry> =
            slots.iter().map(|&index| self.entries[index].clone()).collect();
        let (ordered, warnings) = schedule_validator::validate(day_entries);

        for (&slot, entry) in slots.iter().zip(ordered.into_iter()) {
            self.entries[slot] = entry;
        }

        if warnings.is_empty() {
            self.warnings.remove(day);
        } else {
            self.warnings.insert(day.to_string(), warnings);
        }
    }
}
