mod health;
mod metrics;
mod page;

use crate::server::SharedState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health::healthcheck))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api/state", get(page::get_state))
        .route(
            "/api/image",
            put(page::put_image).delete(page::delete_image),
        )
        .route("/api/drag", put(page::put_drag))
        .route("/api/analyze", post(page::post_analyze))
        .route("/api/reset", post(page::post_reset))
        .route("/api/server-status", post(page::post_server_status))
        .route("/api/language", put(page::put_language))
}
