//! UPI deep-link formatting
//!
//! Builds the canonical `upi://pay?...` URI for an order plus best-effort
//! per-app variants derived by scheme substitution. This is a string
//! formatter only; there is no gateway callback or reconciliation, and the
//! store operator flips payment status manually after checking their app.

use serde::{Deserialize, Serialize};
use urlencoding::encode;

/// Per-app deep links derived from the canonical URI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpiAppLinks {
    pub gpay: String,
    pub phonepe: String,
    pub paytm: String,
    pub bhim: String,
}

/// Payment payload returned alongside a created order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub upi_link: String,
    pub upi_app_links: UpiAppLinks,
    pub amount: f64,
    pub store_name: String,
    pub store_upi_id: String,
}

/// Build the canonical UPI URI. Name and note fields are percent-encoded;
/// currency is fixed to INR.
pub fn build_link(payee_vpa: &str, payee_name: &str, amount: f64, order_number: &str) -> String {
    let note = format!("Order {}", order_number);
    format!(
        "upi://pay?pa={}&pn={}&am={:.2}&cu=INR&tn={}",
        payee_vpa,
        encode(payee_name),
        amount,
        encode(&note)
    )
}

/// Derive the per-app links by substituting the URI scheme/prefix.
/// Best-effort convenience, not validated against each app's URI format.
pub fn app_links(upi_link: &str) -> UpiAppLinks {
    UpiAppLinks {
        gpay: upi_link.replacen("upi://pay", "tez://upi/pay", 1),
        phonepe: upi_link.replacen("upi://pay", "phonepe://pay", 1),
        paytm: upi_link.replacen("upi://pay", "paytmmp://pay", 1),
        bhim: upi_link.to_string(),
    }
}

/// Full payment payload for an order response
pub fn payment_info(
    payee_vpa: &str,
    payee_name: &str,
    store_name: &str,
    amount: f64,
    order_number: &str,
) -> PaymentInfo {
    let upi_link = build_link(payee_vpa, payee_name, amount, order_number);
    let upi_app_links = app_links(&upi_link);
    PaymentInfo {
        upi_link,
        upi_app_links,
        amount,
        store_name: store_name.to_string(),
        store_upi_id: payee_vpa.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_link_fields() {
        let link = build_link("mess@upi", "North Mess", 250.0, "ORD202608051A2B");
        assert_eq!(
            link,
            "upi://pay?pa=mess@upi&pn=North%20Mess&am=250.00&cu=INR&tn=Order%20ORD202608051A2B"
        );
    }

    #[test]
    fn test_amount_always_two_decimals() {
        let link = build_link("mess@upi", "Mess", 99.5, "ORD1");
        assert!(link.contains("am=99.50"));
    }

    #[test]
    fn test_name_encoding_handles_specials() {
        let link = build_link("mess@upi", "Chai & Co.", 10.0, "ORD1");
        assert!(link.contains("pn=Chai%20%26%20Co."));
    }

    #[test]
    fn test_app_variants_substitute_scheme() {
        let link = build_link("mess@upi", "Mess", 10.0, "ORD1");
        let apps = app_links(&link);

        assert!(apps.gpay.starts_with("tez://upi/pay?"));
        assert!(apps.phonepe.starts_with("phonepe://pay?"));
        assert!(apps.paytm.starts_with("paytmmp://pay?"));
        assert!(apps.bhim.starts_with("upi://pay?"));

        // Query string survives the substitution untouched
        let query = link.split_once('?').unwrap().1;
        assert!(apps.gpay.ends_with(query));
        assert!(apps.paytm.ends_with(query));
    }
}
