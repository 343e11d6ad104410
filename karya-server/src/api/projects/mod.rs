//! 项目目录接口

pub mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/projects", get(handler::list).post(handler::create))
        .route("/api/projects/{id}", get(handler::get_by_id))
}
