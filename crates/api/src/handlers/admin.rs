//! Admin-only account views.

use axum::extract::State;
use dapparchive_db::models::user::User;
use dapparchive_db::repositories::user_repo::UserRepo;

use crate::auth::RequireAdmin;
use crate::response::FetchedJson;
use crate::state::AppState;

/// GET /users -- list all user accounts, newest first (admin only).
pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> FetchedJson<Vec<User>> {
    let fetched = state
        .data
        .read("list_users", Vec::new, |pool| async move {
            UserRepo::list(&pool).await
        })
        .await;
    FetchedJson(fetched)
}
