//! Payment Lifecycle Coordination Module
//!
//! This module owns the mapping from internal order ids to payment status:
//!
//! - **coordinator**: checkout initiation and idempotent callback application
//! - **machine**: the closed status transition table
//! - **signature**: callback authenticity verification (SHA-512)
//! - **storage**: redb-based persistence for order records
//!
//! # Architecture
//!
//! ```text
//! initiate ──→ OrderRecord (created) ──→ Gateway session ──→ token
//!                     │
//! callback ──→ verify signature ──→ lookup-compute-commit (one txn)
//!                     │                      │
//!                security log          status + history + last_event_id
//! ```
//!
//! # Delivery contract
//!
//! Gateway callbacks are delivered at least once and possibly out of order.
//! Every distinct event id commits at most one transition; terminal states
//! never transition again. The whole lookup-compute-commit sequence runs in
//! a single write transaction (single writer), so two concurrent deliveries
//! for the same order cannot both observe the same prior state.

pub mod coordinator;
pub mod error;
pub mod machine;
pub mod signature;
pub mod storage;

// Re-exports
pub use coordinator::{CallbackOutcome, CheckoutSession, PaymentCoordinator};
pub use error::PaymentError;
pub use machine::{Transition, next_status};
pub use storage::{OrderStore, StorageError, StorageResult};
