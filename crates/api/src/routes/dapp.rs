use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{dapp, image};
use crate::state::AppState;

/// Mount `/dapps` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dapp::list_dapps).post(dapp::create_dapp))
        .route(
            "/{id}",
            get(dapp::get_dapp_by_id)
                .put(dapp::update_dapp)
                .delete(dapp::delete_dapp),
        )
        .route("/slug/{slug}", get(dapp::get_dapp_by_slug))
        .route("/{id}/flows", get(dapp::list_dapp_flows))
        .route("/{id}/images", post(image::upload_image))
}
