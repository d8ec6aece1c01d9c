//! Order lifecycle types
//!
//! Status enums shared between the server and API clients. The order status
//! chain is forward-only: placed → accepted → processing → ready → picked_up.
//! `cancelled` is a terminal state with no API transition producing it.

use serde::{Deserialize, Serialize};

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Accepted,
    Processing,
    Ready,
    PickedUp,
    Cancelled,
}

impl OrderStatus {
    /// Whether the status chain permits moving from `self` to `next`.
    ///
    /// Only the three operator-driven forward steps are allowed here;
    /// `placed → accepted` happens implicitly on payment confirmation and
    /// is not a valid request on its own.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Accepted, OrderStatus::Processing)
                | (OrderStatus::Processing, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::PickedUp)
        )
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::PickedUp | OrderStatus::Cancelled)
    }

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_chain_only() {
        use OrderStatus::*;

        assert!(Accepted.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(PickedUp));

        // No skipping, no regression, no self-loops
        assert!(!Placed.can_transition_to(Processing));
        assert!(!Placed.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Processing));
        assert!(!Ready.can_transition_to(Ready));
        assert!(!PickedUp.can_transition_to(PickedUp));
        assert!(!Cancelled.can_transition_to(Accepted));
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PickedUp).unwrap(),
            "\"picked_up\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(parsed, OrderStatus::Processing);
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Success).unwrap(),
            "\"success\""
        );
    }

    #[test]
    fn test_payment_status_from_str() {
        assert_eq!("success".parse(), Ok(PaymentStatus::Success));
        assert_eq!("pending".parse(), Ok(PaymentStatus::Pending));
        assert!("paid".parse::<PaymentStatus>().is_err());
        assert!("SUCCESS".parse::<PaymentStatus>().is_err());
    }
}
