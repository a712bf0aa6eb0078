// Derived aggregates over the known entries. Always recomputed, never stored on their own.

use crate::modules::time_tracking::core::time_entry::TimeEntry;
use serde::Serialize;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeStats {
    pub total_hours: f64,
    pub billable_hours: f64,
}

impl TimeStats {
    pub fn from_entries(entries: &[TimeEntry]) -> Self {
        let (total, billable) = entries.iter().fold((0i64, 0i64), |(total, billable), entry| {
            let billable_seconds = if entry.is_billable { entry.duration } else { 0 };
            (
                total.saturating_add(entry.duration),
                billable.saturating_add(billable_seconds),
            )
        });
        Self {
            total_hours: total as f64 / SECONDS_PER_HOUR,
            billable_hours: billable as f64 / SECONDS_PER_HOUR,
        }
    }
}
