//! Notification queue service
//!
//! Thin mpsc front-end the handlers publish to. Publishing is best-effort
//! and non-blocking: a full or closed queue drops the message with a
//! warning, because a lost email must never fail an order mutation.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::{Notification, NotificationTransport, NotificationWorker};

/// Default queue depth before messages are dropped
const DEFAULT_BUFFER: usize = 256;

/// Handle for queueing outbound notifications
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}

impl Notifier {
    /// Create the queue without a worker (the caller owns the receiver).
    /// Used by tests to observe published notifications.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Create the queue and spawn the delivery worker on the runtime.
    pub fn spawn(transport: Arc<dyn NotificationTransport>) -> Self {
        let (notifier, rx) = Self::new(DEFAULT_BUFFER);
        let worker = NotificationWorker::new(transport);
        tokio::spawn(worker.run(rx));
        notifier
    }

    /// Queue a notification, best-effort.
    pub fn publish(&self, notification: Notification) {
        if let Err(e) = self.tx.try_send(notification) {
            let dropped = match &e {
                mpsc::error::TrySendError::Full(n) => n,
                mpsc::error::TrySendError::Closed(n) => n,
            };
            tracing::warn!(
                target: "notify",
                kind = dropped.kind(),
                order_number = dropped.order_number(),
                "Notification dropped: {}",
                e
            );
        }
    }
}
