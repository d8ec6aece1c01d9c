//! Outbound customer notifications
//!
//! Handlers never talk to a mail transport directly: they publish typed
//! [`Notification`] values to the [`Notifier`] queue and move on. A
//! background worker drains the queue and hands each message to the
//! configured [`NotificationTransport`]. Delivery failures are logged and
//! swallowed; they never affect the request that queued them.

pub mod service;
pub mod transport;
pub mod worker;

pub use service::Notifier;
pub use transport::{LogTransport, NotificationTransport};
pub use worker::NotificationWorker;

use serde::Serialize;

/// A queued customer notification
#[derive(Debug, Clone, Serialize)]
pub enum Notification {
    /// Order placed, payment pending
    OrderPlaced {
        email: String,
        order_number: String,
        total_amount: f64,
    },
    /// Payment confirmed, order accepted by the store
    OrderAccepted {
        email: String,
        order_number: String,
    },
    /// Operator moved the order along the chain
    StatusChanged {
        email: String,
        order_number: String,
        status: String,
    },
    /// Order is ready; carries the pickup code
    OtpIssued {
        email: String,
        order_number: String,
        otp: String,
    },
    /// Pickup confirmed
    PickupConfirmed {
        email: String,
        order_number: String,
    },
}

impl Notification {
    /// Recipient address
    pub fn email(&self) -> &str {
        match self {
            Notification::OrderPlaced { email, .. }
            | Notification::OrderAccepted { email, .. }
            | Notification::StatusChanged { email, .. }
            | Notification::OtpIssued { email, .. }
            | Notification::PickupConfirmed { email, .. } => email,
        }
    }

    /// Order the notification is about
    pub fn order_number(&self) -> &str {
        match self {
            Notification::OrderPlaced { order_number, .. }
            | Notification::OrderAccepted { order_number, .. }
            | Notification::StatusChanged { order_number, .. }
            | Notification::OtpIssued { order_number, .. }
            | Notification::PickupConfirmed { order_number, .. } => order_number,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::OrderPlaced { .. } => "order_placed",
            Notification::OrderAccepted { .. } => "order_accepted",
            Notification::StatusChanged { .. } => "status_changed",
            Notification::OtpIssued { .. } => "otp_issued",
            Notification::PickupConfirmed { .. } => "pickup_confirmed",
        }
    }
}
