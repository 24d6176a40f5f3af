//! Image handlers: filtered listing, paywall access checks, and
//! admin-only CRUD including binary upload.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use dapparchive_core::access::{evaluate, is_visible};
use dapparchive_core::error::CoreError;
use dapparchive_core::taxonomy::{Category, UiElement, UiFlow};
use dapparchive_core::types::DbId;
use dapparchive_db::fallback;
use dapparchive_db::models::image::{CreateImage, Image, ImageFilter, UpdateImage};
use dapparchive_db::models::user::User;
use dapparchive_db::repositories::image_repo::ImageRepo;
use dapparchive_db::repositories::user_repo::UserRepo;
use dapparchive_db::Fetched;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{RequireAdmin, Viewer};
use crate::error::AppResult;
use crate::response::FetchedJson;
use crate::services::content;
use crate::state::AppState;

/// GET / -- list images, filterable by dapp, category, and flow.
///
/// Premium images are hidden from viewers without access; hiding never
/// consumes quota.
pub async fn list_images(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(filter): Query<ImageFilter>,
) -> FetchedJson<Vec<Image>> {
    let fetched = state
        .data
        .read(
            "list_images",
            {
                let filter = filter.clone();
                move || filtered_fallback(&filter)
            },
            |pool| {
                let filter = filter.clone();
                async move { ImageRepo::list(&pool, &filter).await }
            },
        )
        .await;

    let access = viewer.0.as_ref().map(User::access);
    let mut images = fetched.value;
    images.retain(|img| is_visible(access.as_ref(), img.is_premium));
    FetchedJson(Fetched {
        value: images,
        degraded: fetched.degraded,
    })
}

/// Response body for the per-image access check.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub allowed: bool,
}

/// GET /{id}/access -- evaluate the paywall for one image view.
///
/// A free-tier view of a premium image consumes one quota unit. Each
/// call counts, repeat views of the same image included.
///
/// While degraded the check falls back to the static catalog, so any
/// image a degraded listing can show can also be access-checked.
pub async fn check_image_access(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<DbId>,
) -> AppResult<Json<AccessResponse>> {
    let fetched = state
        .data
        .read(
            "find_image",
            || fallback::sample_images().into_iter().find(|img| img.id == id),
            |pool| async move { ImageRepo::find_by_id(&pool, id).await },
        )
        .await;
    let image = fetched.value.ok_or_else(|| CoreError::NotFound {
        entity: "Image",
        key: id.to_string(),
    })?;

    let access = viewer.0.as_ref().map(User::access);
    let decision = evaluate(access.as_ref(), image.is_premium);

    if decision.record_view {
        if let Some(user) = &viewer.0 {
            let user_id = user.id;
            let recorded = state
                .data
                .write("record_premium_view", |pool| async move {
                    UserRepo::increment_viewed_images(&pool, user_id).await
                })
                .await;
            if let Err(err) = recorded {
                // The view was granted; losing the count is the lesser harm.
                tracing::warn!(user_id, image_id = id, error = %err, "Could not record premium view");
            }
        }
    }

    Ok(Json(AccessResponse {
        allowed: decision.allowed,
    }))
}

/// POST / -- create an image record for an existing URL (admin only).
pub async fn create_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateImage>,
) -> AppResult<(StatusCode, Json<Image>)> {
    let image = content::create_image(&state.data, &input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// PUT /{id} -- partial update of an image (admin only).
pub async fn update_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateImage>,
) -> AppResult<Json<Image>> {
    let image = content::update_image(&state.data, id, &input).await?;
    Ok(Json(image))
}

/// DELETE /{id} -- delete an image record and its stored object (admin
/// only).
pub async fn delete_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_image(&state.data, state.storage.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Metadata accompanying a binary upload, passed as query parameters.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub version: Option<String>,
    pub flow: Option<UiFlow>,
    pub ui_element: Option<UiElement>,
    pub is_premium: Option<bool>,
    pub display_order: Option<i32>,
}

/// POST /dapps/{id}/images -- upload a screenshot binary and catalog it
/// (admin only).
///
/// The object is stored under `{dapp_id}/{uuid}.{ext}`; a random name
/// avoids collisions between re-uploads of the same filename.
pub async fn upload_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(dapp_id): Path<DbId>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Image>)> {
    let extension = params
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("png");
    let object_path = format!("{dapp_id}/{}.{extension}", Uuid::new_v4());

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let url = state
        .storage
        .upload(&object_path, body.to_vec(), content_type)
        .await?;

    let input = CreateImage {
        dapp_id,
        url,
        title: params.title,
        description: params.description,
        category: params.category,
        version: params.version,
        flow: params.flow,
        ui_element: params.ui_element,
        tags: Vec::new(),
        is_premium: params.is_premium,
        display_order: params.display_order,
        captured_at: None,
    };
    let image = content::create_image(&state.data, &input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Apply listing filters to the static fallback catalog in memory.
fn filtered_fallback(filter: &ImageFilter) -> Vec<Image> {
    fallback::sample_images()
        .into_iter()
        .filter(|img| filter.dapp_id.map_or(true, |id| img.dapp_id == id))
        .filter(|img| filter.category.map_or(true, |c| img.category == Some(c)))
        .filter(|img| filter.flow.map_or(true, |f| img.flow == Some(f)))
        .collect()
}
