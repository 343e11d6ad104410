//! Callback signature verification
//!
//! The gateway signs each callback with
//! `SHA-512(order_id + status_code + gross_amount + server_key)`, hex encoded.
//! Verification happens before any state is touched; an unverifiable event
//! must never reach the transition path.

use sha2::{Digest, Sha512};
use shared::payment::GatewayNotification;

/// Compute the expected signature for a callback
pub fn expected_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a notification's signature against the configured server key
pub fn verify(notification: &GatewayNotification, server_key: &str) -> bool {
    let expected = expected_signature(
        &notification.order_id,
        &notification.status_code,
        &notification.gross_amount,
        server_key,
    );
    let provided = notification.signature_key.trim().to_ascii_lowercase();
    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

/// Constant-time byte comparison (digests are fixed-length, so the early
/// length check leaks nothing useful)
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::payment::TransactionSignal;

    const SERVER_KEY: &str = "SB-Mid-server-test-key";

    fn signed_notification() -> GatewayNotification {
        let mut n = GatewayNotification {
            order_id: "ORDER-abc".to_string(),
            transaction_id: "txn-1".to_string(),
            event_id: None,
            status_code: "200".to_string(),
            gross_amount: "2500000.00".to_string(),
            signature_key: String::new(),
            transaction_status: TransactionSignal::Settlement,
            fraud_status: None,
        };
        n.signature_key =
            expected_signature(&n.order_id, &n.status_code, &n.gross_amount, SERVER_KEY);
        n
    }

    #[test]
    fn valid_signature_verifies() {
        let n = signed_notification();
        assert!(verify(&n, SERVER_KEY));
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let mut n = signed_notification();
        n.signature_key = n.signature_key.to_ascii_uppercase();
        assert!(verify(&n, SERVER_KEY));
    }

    #[test]
    fn tampered_amount_fails_verification() {
        let mut n = signed_notification();
        n.gross_amount = "1.00".to_string();
        assert!(!verify(&n, SERVER_KEY));
    }

    #[test]
    fn wrong_server_key_fails_verification() {
        let n = signed_notification();
        assert!(!verify(&n, "some-other-key"));
    }

    #[test]
    fn empty_signature_fails_verification() {
        let mut n = signed_notification();
        n.signature_key = String::new();
        assert!(!verify(&n, SERVER_KEY));
    }
}
