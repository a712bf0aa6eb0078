// Client-side identifiers: provisional entry ids and pending operation ids.
//
// Both are derived from the enqueue/creation timestamp in epoch milliseconds. Two ids issued
// in the same millisecond are bumped forward so they never collide.

use crate::modules::time_tracking::core::pending_operation::OperationKind;
use crate::modules::time_tracking::core::time_entry::TEMP_ID_PREFIX;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct ClientIds {
    last_stamp: AtomicI64,
}

impl ClientIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_stamp(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let next = |last: i64| candidate.max(last.saturating_add(1));
        match self
            .last_stamp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(next(last)))
        {
            Ok(previous) | Err(previous) => next(previous),
        }
    }

    pub fn temp_id(&self, now: DateTime<Utc>) -> String {
        format!("{TEMP_ID_PREFIX}{}", self.next_stamp(now))
    }

    pub fn operation_id(&self, kind: OperationKind, now: DateTime<Utc>) -> String {
        format!("{kind}-{}", self.next_stamp(now))
    }
}
