//! Flow handlers: admin-curated walkthroughs built from catalog images.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dapparchive_core::error::CoreError;
use dapparchive_core::types::DbId;
use dapparchive_db::models::flow::{CreateFlow, CreateFlowStep, Flow, FlowStep};
use dapparchive_db::repositories::dapp_repo::DappRepo;
use dapparchive_db::repositories::flow_repo::FlowRepo;
use validator::Validate;

use crate::auth::RequireAdmin;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST / -- create a flow for a dapp (admin only).
pub async fn create_flow(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateFlow>,
) -> AppResult<(StatusCode, Json<Flow>)> {
    input.validate().map_err(|e| AppError::validation(&e))?;

    let dapp_id = input.dapp_id;
    let dapp = state
        .data
        .write("find_dapp", |pool| async move {
            DappRepo::find_by_id(&pool, dapp_id).await
        })
        .await?;
    if dapp.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Dapp",
            key: dapp_id.to_string(),
        }));
    }

    let flow = state
        .data
        .write("create_flow", |pool| {
            let input = input.clone();
            async move { FlowRepo::create(&pool, &input).await }
        })
        .await?;
    Ok((StatusCode::CREATED, Json(flow)))
}

/// POST /{id}/steps -- append a step to a flow (admin only).
///
/// A taken `step_order` within the flow surfaces as a 409 via the unique
/// constraint.
pub async fn add_flow_step(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(flow_id): Path<DbId>,
    Json(input): Json<CreateFlowStep>,
) -> AppResult<(StatusCode, Json<FlowStep>)> {
    let flow = state
        .data
        .write("find_flow", |pool| async move {
            FlowRepo::find_by_id(&pool, flow_id).await
        })
        .await?;
    if flow.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Flow",
            key: flow_id.to_string(),
        }));
    }

    let step = state
        .data
        .write("add_flow_step", |pool| {
            let input = input.clone();
            async move { FlowRepo::add_step(&pool, flow_id, &input).await }
        })
        .await?;
    Ok((StatusCode::CREATED, Json(step)))
}

/// DELETE /{id} -- delete a flow and its steps (admin only).
pub async fn delete_flow(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = state
        .data
        .write("delete_flow", |pool| async move {
            FlowRepo::delete(&pool, id).await
        })
        .await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Flow",
            key: id.to_string(),
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
