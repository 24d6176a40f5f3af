use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Mount `/admin` routes. Every handler behind this router takes
/// [`crate::auth::RequireAdmin`].
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(admin::list_users))
}
