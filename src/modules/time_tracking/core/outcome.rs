// Uniform result of every mutating tracker operation.
//
// Callers render inline feedback from it instead of handling errors: a queued offline action
// is a success, only a rejection while online is a failure.

use serde::{Deserialize, Serialize};

pub const NO_ACTIVE_TIMER: &str = "No active timer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The remote service accepted the change.
    Synced,
    /// The service was unreachable; the change is queued for replay.
    SavedOffline,
    Failed(String),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ActionOutcome::Failed(_))
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, ActionOutcome::SavedOffline)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub offline: bool,
}

impl From<ActionOutcome> for ActionResult {
    fn from(outcome: ActionOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            offline: outcome.is_offline(),
            error: match outcome {
                ActionOutcome::Failed(message) => Some(message),
                _ => None,
            },
        }
    }
}
