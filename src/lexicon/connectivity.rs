//! Online/offline signal shared by provider clients.
//!
//! The surrounding application publishes connectivity changes through a
//! [`ConnectivityMonitor`]; every client holds a [`ConnectivityHandle`]
//! subscribed to the same channel and reflects the latest value in
//! `is_available()` without polling.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    sender: Arc<watch::Sender<bool>>,
}

/// Read side of the connectivity signal held by a client.
#[derive(Debug, Clone)]
pub struct ConnectivityHandle {
    receiver: watch::Receiver<bool>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (sender, _) = watch::channel(initially_online);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish a connectivity change to every subscribed client.
    pub fn set_online(&self, online: bool) {
        let previous = self.sender.send_replace(online);
        if previous != online {
            info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
    }

    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> ConnectivityHandle {
        ConnectivityHandle {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityHandle {
    pub fn is_online(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait for the next change and return the new state. Returns `None`
    /// once the monitor is gone.
    pub async fn changed(&mut self) -> Option<bool> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }
}
