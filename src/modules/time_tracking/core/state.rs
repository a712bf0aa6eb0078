// TrackerState is everything the tracker knows at one instant, and the snapshot handed to readers.
//
// Purpose
// - Hold the entry cache, the active timer, the offline queue and the load/sync flags.
// - Keep the aggregates in step with the entry list: every list mutation goes through a method
//   here that recomputes them.
//
// Boundaries
// - No input or output. The tracker decides when to mutate; this type only knows how.

use crate::modules::time_tracking::core::pending_operation::{PendingOperation, PersistedQueue};
use crate::modules::time_tracking::core::stats::TimeStats;
use crate::modules::time_tracking::core::time_entry::TimeEntry;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerState {
    pub time_entries: Vec<TimeEntry>,
    pub active_timer: Option<TimeEntry>,
    #[serde(flatten)]
    pub stats: TimeStats,
    pub loading: bool,
    pub syncing: bool,
    pub pending_operations: Vec<PendingOperation>,
    pub failed_operations: Vec<PendingOperation>,
}

impl TrackerState {
    pub fn replace_entries(&mut self, entries: Vec<TimeEntry>) {
        self.time_entries = entries;
        self.recompute_stats();
    }

    /// Put an entry at the head of the list, or update it in place when the id is already known.
    pub fn upsert_front(&mut self, entry: TimeEntry) {
        match self.time_entries.iter_mut().find(|known| known.id == entry.id) {
            Some(slot) => *slot = entry,
            None => self.time_entries.insert(0, entry),
        }
        self.recompute_stats();
    }

    /// Swap the entry with `id` for `entry`, keeping its position. Returns false when absent.
    pub fn replace_entry(&mut self, id: &str, entry: TimeEntry) -> bool {
        match self.time_entries.iter_mut().find(|known| known.id == id) {
            Some(slot) => {
                *slot = entry;
                self.recompute_stats();
                true
            }
            None => false,
        }
    }

    pub fn remove_entry(&mut self, id: &str) -> Option<TimeEntry> {
        let position = self.time_entries.iter().position(|entry| entry.id == id)?;
        let removed = self.time_entries.remove(position);
        self.recompute_stats();
        Some(removed)
    }

    pub fn contains_entry(&self, id: &str) -> bool {
        self.time_entries.iter().any(|entry| entry.id == id)
    }

    /// Entries in the running state across the list and the active timer.
    pub fn running_count(&self) -> usize {
        let listed = self
            .time_entries
            .iter()
            .filter(|entry| entry.is_running())
            .filter(|entry| {
                self.active_timer
                    .as_ref()
                    .is_none_or(|active| active.id != entry.id)
            })
            .count();
        listed + usize::from(self.active_timer.as_ref().is_some_and(TimeEntry::is_running))
    }

    pub fn persisted_queue(&self) -> PersistedQueue {
        PersistedQueue {
            pending_operations: self.pending_operations.clone(),
            failed_operations: self.failed_operations.clone(),
        }
    }

    fn recompute_stats(&mut self) {
        self.stats = TimeStats::from_entries(&self.time_entries);
    }
}
