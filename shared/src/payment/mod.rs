//! Payment lifecycle types
//!
//! Shared vocabulary for the payment transaction coordinator:
//!
//! - **status**: the closed order status enum and its terminal set
//! - **notification**: the gateway callback wire format and signals
//! - **record**: the durable order record with its append-only history

pub mod notification;
pub mod record;
pub mod status;

pub use notification::{FraudStatus, GatewayNotification, TransactionSignal};
pub use record::{CustomerDetails, OrderRecord, StatusEntry};
pub use status::PaymentStatus;
