// In memory implementation of the Notifier port.
//
// Purpose
// - Let tests assert which notifications an operation raised, in order.

use crate::shared::infrastructure::notifier::{Notification, NotificationLevel, Notifier};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|notification| notification.level == level)
            .map(|notification| notification.message)
            .collect()
    }

    pub fn clear(&self) {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}
