//! Dapp catalog handlers.
//!
//! Reads go through the degrading read path so listings and detail pages
//! render during an outage; writes are admin-only and propagate store
//! failures.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dapparchive_core::access::is_visible;
use dapparchive_core::error::CoreError;
use dapparchive_core::types::DbId;
use dapparchive_db::fallback;
use dapparchive_db::models::dapp::{CreateDapp, Dapp, DappSummary, DappWithImages, UpdateDapp};
use dapparchive_db::models::flow::FlowWithSteps;
use dapparchive_db::models::user::User;
use dapparchive_db::repositories::dapp_repo::DappRepo;
use dapparchive_db::repositories::flow_repo::FlowRepo;
use dapparchive_db::Fetched;
use validator::Validate;

use crate::auth::{RequireAdmin, Viewer};
use crate::error::{AppError, AppResult};
use crate::response::FetchedJson;
use crate::services::content;
use crate::state::AppState;

/// GET / -- list all dapps with image counts.
pub async fn list_dapps(State(state): State<AppState>) -> FetchedJson<Vec<DappSummary>> {
    let fetched = state
        .data
        .read("list_dapps", fallback::sample_dapp_summaries, |pool| {
            async move { DappRepo::list(&pool).await }
        })
        .await;
    FetchedJson(fetched)
}

/// GET /slug/{slug} -- dapp detail with its images, paywall-filtered.
pub async fn get_dapp_by_slug(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(slug): Path<String>,
) -> AppResult<FetchedJson<DappWithImages>> {
    let fetched = state
        .data
        .read(
            "find_dapp_by_slug",
            {
                let slug = slug.clone();
                move || fallback::sample_dapp_by_slug(&slug)
            },
            |pool| {
                let slug = slug.clone();
                async move { DappRepo::find_by_slug_with_images(&pool, &slug).await }
            },
        )
        .await;

    let degraded = fetched.degraded;
    let mut entry = fetched.value.ok_or_else(|| CoreError::NotFound {
        entity: "Dapp",
        key: slug,
    })?;
    filter_images(&mut entry, &viewer);
    Ok(FetchedJson(Fetched {
        value: entry,
        degraded,
    }))
}

/// GET /{id} -- dapp detail by internal id, paywall-filtered.
pub async fn get_dapp_by_id(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<DbId>,
) -> AppResult<FetchedJson<DappWithImages>> {
    let fetched = state
        .data
        .read("find_dapp", || None, |pool| async move {
            DappRepo::find_by_id_with_images(&pool, id).await
        })
        .await;

    let degraded = fetched.degraded;
    let mut entry = fetched.value.ok_or_else(|| CoreError::NotFound {
        entity: "Dapp",
        key: id.to_string(),
    })?;
    filter_images(&mut entry, &viewer);
    Ok(FetchedJson(Fetched {
        value: entry,
        degraded,
    }))
}

/// GET /{id}/flows -- a dapp's flows with their steps.
pub async fn list_dapp_flows(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> FetchedJson<Vec<FlowWithSteps>> {
    let fetched = state
        .data
        .read("list_flows", Vec::new, |pool| async move {
            FlowRepo::list_by_dapp(&pool, id).await
        })
        .await;
    FetchedJson(fetched)
}

/// POST / -- create a dapp (admin only).
pub async fn create_dapp(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDapp>,
) -> AppResult<(StatusCode, Json<Dapp>)> {
    let dapp = content::create_dapp(&state.data, &input).await?;
    Ok((StatusCode::CREATED, Json(dapp)))
}

/// PUT /{id} -- partial update of a dapp (admin only).
pub async fn update_dapp(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDapp>,
) -> AppResult<Json<Dapp>> {
    input.validate().map_err(|e| AppError::validation(&e))?;

    let updated = state
        .data
        .write("update_dapp", |pool| {
            let input = input.clone();
            async move { DappRepo::update(&pool, id, &input).await }
        })
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Dapp",
            key: id.to_string(),
        })?;
    Ok(Json(updated))
}

/// DELETE /{id} -- delete a dapp, cascading rows and stored objects
/// (admin only).
pub async fn delete_dapp(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_dapp(&state.data, state.storage.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drop images the viewer is not allowed to see from a detail payload.
/// Listing never consumes quota; only the per-image access endpoint does.
fn filter_images(entry: &mut DappWithImages, viewer: &Viewer) {
    let access = viewer.0.as_ref().map(User::access);
    entry
        .images
        .retain(|img| is_visible(access.as_ref(), img.is_premium));
}
