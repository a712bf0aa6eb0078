// Shared test fixture for TimeEntry values, seeded from json/time_entry.json.

use crate::modules::time_tracking::core::time_entry::{EntryStatus, TimeEntry};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
}

pub struct TimeEntryBuilder {
    inner: TimeEntry,
}

impl Default for TimeEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TimeEntryBuilder {
    pub fn new() -> Self {
        let inner: TimeEntry = serde_json::from_str(include_str!("json/time_entry.json")).unwrap();
        Self { inner }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.inner.user_id = Some(v.into());
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.inner.description = Some(v.into());
        self
    }

    /// Moves the entry, keeping its duration.
    pub fn start_time(mut self, v: DateTime<Utc>) -> Self {
        self.inner.start_time = v;
        if self.inner.end_time.is_some() {
            self.inner.end_time = Some(v + Duration::seconds(self.inner.duration));
        }
        self
    }

    pub fn duration(mut self, v: i64) -> Self {
        self.inner.duration = v;
        if self.inner.end_time.is_some() {
            self.inner.end_time = Some(self.inner.start_time + Duration::seconds(v));
        }
        self
    }

    pub fn billable(mut self, v: bool) -> Self {
        self.inner.is_billable = v;
        self
    }

    pub fn running(mut self) -> Self {
        self.inner.status = EntryStatus::Running;
        self.inner.end_time = None;
        self.inner.duration = 0;
        self
    }

    pub fn build(self) -> TimeEntry {
        self.inner
    }
}
