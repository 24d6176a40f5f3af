//! Flow and flow-step models: ordered walkthroughs of a dapp's images.

use dapparchive_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `flows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Flow {
    pub id: DbId,
    pub dapp_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `flow_steps` table. Each step references one image by
/// order index within its flow.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FlowStep {
    pub id: DbId,
    pub flow_id: DbId,
    pub image_id: DbId,
    pub step_order: i32,
    pub created_at: Timestamp,
}

/// A flow with its steps in walkthrough order.
#[derive(Debug, Clone, Serialize)]
pub struct FlowWithSteps {
    #[serde(flatten)]
    pub flow: Flow,
    pub steps: Vec<FlowStep>,
}

/// DTO for creating a new flow.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFlow {
    pub dapp_id: DbId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for appending a step to a flow.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFlowStep {
    pub image_id: DbId,
    pub step_order: i32,
}
