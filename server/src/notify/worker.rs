//! Notification delivery worker
//!
//! Consumes queued notifications and hands them to the transport.
//! Exits when the channel closes. Delivery errors are logged and dropped.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::{Notification, NotificationTransport};

pub struct NotificationWorker {
    transport: Arc<dyn NotificationTransport>,
}

impl NotificationWorker {
    pub fn new(transport: Arc<dyn NotificationTransport>) -> Self {
        Self { transport }
    }

    /// Run the worker (blocks until the channel closes)
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        tracing::info!("Notification worker started");

        while let Some(notification) = rx.recv().await {
            if let Err(e) = self.transport.deliver(&notification).await {
                tracing::warn!(
                    target: "notify",
                    kind = notification.kind(),
                    order_number = notification.order_number(),
                    "Notification delivery failed: {:?}",
                    e
                );
            }
        }

        tracing::info!("Notification channel closed, worker stopping");
    }
}
