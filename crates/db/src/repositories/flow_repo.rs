//! Repository for the `flows` and `flow_steps` tables.

use dapparchive_core::types::DbId;
use sqlx::PgPool;

use crate::models::flow::{CreateFlow, CreateFlowStep, Flow, FlowStep, FlowWithSteps};

/// Column list for `flows` queries.
const FLOW_COLUMNS: &str = "id, dapp_id, name, description, created_at, updated_at";

/// Column list for `flow_steps` queries.
const STEP_COLUMNS: &str = "id, flow_id, image_id, step_order, created_at";

/// Provides CRUD operations for flows and their ordered steps.
pub struct FlowRepo;

impl FlowRepo {
    /// Insert a new flow, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateFlow) -> Result<Flow, sqlx::Error> {
        let query = format!(
            "INSERT INTO flows (dapp_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {FLOW_COLUMNS}"
        );
        sqlx::query_as::<_, Flow>(&query)
            .bind(input.dapp_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a flow by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Flow>, sqlx::Error> {
        let query = format!("SELECT {FLOW_COLUMNS} FROM flows WHERE id = $1");
        sqlx::query_as::<_, Flow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a dapp's flows, each with its steps in walkthrough order.
    pub async fn list_by_dapp(
        pool: &PgPool,
        dapp_id: DbId,
    ) -> Result<Vec<FlowWithSteps>, sqlx::Error> {
        let query = format!(
            "SELECT {FLOW_COLUMNS} FROM flows WHERE dapp_id = $1 ORDER BY created_at ASC"
        );
        let flows = sqlx::query_as::<_, Flow>(&query)
            .bind(dapp_id)
            .fetch_all(pool)
            .await?;

        let mut result = Vec::with_capacity(flows.len());
        for flow in flows {
            let steps = Self::list_steps(pool, flow.id).await?;
            result.push(FlowWithSteps { flow, steps });
        }
        Ok(result)
    }

    /// List a flow's steps in walkthrough order.
    pub async fn list_steps(pool: &PgPool, flow_id: DbId) -> Result<Vec<FlowStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM flow_steps WHERE flow_id = $1 ORDER BY step_order ASC"
        );
        sqlx::query_as::<_, FlowStep>(&query)
            .bind(flow_id)
            .fetch_all(pool)
            .await
    }

    /// Append a step to a flow.
    ///
    /// Fails with a unique violation on `uq_flow_steps_order` when the
    /// order index is already taken within the flow.
    pub async fn add_step(
        pool: &PgPool,
        flow_id: DbId,
        input: &CreateFlowStep,
    ) -> Result<FlowStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO flow_steps (flow_id, image_id, step_order)
             VALUES ($1, $2, $3)
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, FlowStep>(&query)
            .bind(flow_id)
            .bind(input.image_id)
            .bind(input.step_order)
            .fetch_one(pool)
            .await
    }

    /// Delete a flow; the database cascades to its steps. Returns `true`
    /// if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM flows WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
