// Connectivity signal consumed by the tracker.
//
// Purpose
// - Answer "are we online right now" synchronously, at the moment a write fails.
// - Publish transitions so the composition root can replay the offline queue on reconnect.
//
// ConnectivityMonitor is the watch-backed implementation: tests flip it by hand, the binary
// lets the health check loop drive it.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

pub trait ConnectivityProbe: Send + Sync {
    fn current(&self) -> Connectivity;

    fn subscribe(&self) -> watch::Receiver<Connectivity>;

    fn is_online(&self) -> bool {
        self.current() == Connectivity::Online
    }
}

#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    sender: Arc<watch::Sender<Connectivity>>,
}

impl ConnectivityMonitor {
    pub fn new(initial: Connectivity) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns true when this call changed the state.
    pub fn set(&self, connectivity: Connectivity) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == connectivity {
                return false;
            }
            *current = connectivity;
            true
        })
    }

    pub fn set_online(&self) -> bool {
        self.set(Connectivity::Online)
    }

    pub fn set_offline(&self) -> bool {
        self.set(Connectivity::Offline)
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(Connectivity::Online)
    }
}

impl ConnectivityProbe for ConnectivityMonitor {
    fn current(&self) -> Connectivity {
        *self.sender.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.sender.subscribe()
    }
}

pub mod health_check;
