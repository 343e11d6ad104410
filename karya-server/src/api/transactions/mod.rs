//! 支付交易接口

pub mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/transactions", post(handler::create))
        .route(
            "/api/transactions/notification",
            post(handler::notification),
        )
        .route("/api/transactions/{order_id}", get(handler::get_by_id))
}
