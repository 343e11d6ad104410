//! Shared types for the Karya marketplace backend
//!
//! Common types used across crates: domain models, payment lifecycle
//! types, and the unified API response structure.

pub mod models;
pub mod payment;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use payment::{PaymentStatus, StatusEntry};
pub use response::ApiResponse;
