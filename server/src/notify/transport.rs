//! Notification delivery transport
//!
//! The actual mail channel is an opaque collaborator. The default
//! transport writes deliveries to the log, which keeps local and test
//! environments free of SMTP configuration.

use async_trait::async_trait;

use super::Notification;

/// Delivery backend for customer notifications
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Transport that logs deliveries instead of sending them
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            target: "notify",
            kind = notification.kind(),
            recipient = notification.email(),
            order_number = notification.order_number(),
            "Notification delivered (log transport)"
        );
        Ok(())
    }
}
