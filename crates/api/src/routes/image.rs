use axum::routing::{get, put};
use axum::Router;

use crate::handlers::image;
use crate::state::AppState;

/// Mount `/images` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(image::list_images).post(image::create_image))
        .route(
            "/{id}",
            put(image::update_image).delete(image::delete_image),
        )
        .route("/{id}/access", get(image::check_image_access))
}
