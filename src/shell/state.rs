use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<TimeTracker>,
}
