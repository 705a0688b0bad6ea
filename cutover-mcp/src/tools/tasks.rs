//! Task MCP tools
//!
//! Tools for deleting tasks from Cutover runbooks, one at a time or in small
//! batches.

use super::{failure_result, id_schema, parse_args};
use crate::clients::{CutoverClient, ResourceId, MAX_BULK_DELETE};
use crate::server::{McpServerError, McpServerResult, Tool, ToolContext};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Tool to delete a single task from a runbook.
///
/// Reports the remote error (status and body) verbatim when the delete is
/// rejected, so a missing task is distinguishable from other failures.
pub struct DeleteTaskTool {
    client: Arc<CutoverClient>,
}

impl DeleteTaskTool {
    /// Create the tool around a shared client.
    pub fn new(client: Arc<CutoverClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteTaskTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("delete_task", "Delete a task from a runbook")
            .with_category("tasks")
            .destructive()
            .with_schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "runbook_id": id_schema("The ID of the runbook containing the task"),
                    "task_id": id_schema("The ID of the task to delete")
                },
                "required": ["runbook_id", "task_id"]
            }))
    }

    #[instrument(skip(self, args, context), fields(tool = "delete_task"))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: DeleteTaskParams = parse_args(args)?;

        debug!(
            correlation_id = context.correlation_id.as_deref().unwrap_or("-"),
            "Deleting task {} from runbook {}", params.task_id, params.runbook_id
        );

        match self
            .client
            .delete_task(&params.runbook_id, &params.task_id)
            .await
        {
            Ok(result) => serde_json::to_value(result)
                .map(ToolResult::json)
                .map_err(|e| McpServerError::Internal(e.to_string())),
            Err(e) => failure_result("delete task", e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteTaskParams {
    runbook_id: ResourceId,
    task_id: ResourceId,
}

/// Tool to delete several tasks from a runbook in one call.
///
/// Accepts between 1 and [`MAX_BULK_DELETE`] task ids. Each task is deleted
/// with its own request; the result lists the deleted ids and the failures
/// separately, and a partial failure is not a tool error.
pub struct DeleteTasksTool {
    client: Arc<CutoverClient>,
}

impl DeleteTasksTool {
    /// Create the tool around a shared client.
    pub fn new(client: Arc<CutoverClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteTasksTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "delete_tasks",
            format!(
                "Delete up to {} tasks from a runbook. Returns the deleted task ids and the per-task errors",
                MAX_BULK_DELETE
            ),
        )
        .with_category("tasks")
        .destructive()
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "runbook_id": id_schema("The ID of the runbook containing the tasks"),
                "task_ids": {
                    "type": "array",
                    "items": {"type": ["string", "integer"]},
                    "minItems": 1,
                    "maxItems": MAX_BULK_DELETE,
                    "description": "The IDs of the tasks to delete"
                }
            },
            "required": ["runbook_id", "task_ids"]
        }))
    }

    #[instrument(skip(self, args, context), fields(tool = "delete_tasks"))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: DeleteTasksParams = parse_args(args)?;

        debug!(
            correlation_id = context.correlation_id.as_deref().unwrap_or("-"),
            "Deleting {} tasks from runbook {}",
            params.task_ids.len(),
            params.runbook_id
        );

        match self
            .client
            .delete_tasks(&params.runbook_id, &params.task_ids)
            .await
        {
            Ok(result) => serde_json::to_value(result)
                .map(ToolResult::json)
                .map_err(|e| McpServerError::Internal(e.to_string())),
            Err(e) => failure_result("delete tasks", e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteTasksParams {
    runbook_id: ResourceId,
    task_ids: Vec<ResourceId>,
}

/// Get all task tools.
pub fn task_tools(client: Arc<CutoverClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(DeleteTaskTool::new(client.clone())),
        Arc::new(DeleteTasksTool::new(client)),
    ]
}
