use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::flow;
use crate::state::AppState;

/// Mount `/flows` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(flow::create_flow))
        .route("/{id}", delete(flow::delete_flow))
        .route("/{id}/steps", post(flow::add_flow_step))
}
