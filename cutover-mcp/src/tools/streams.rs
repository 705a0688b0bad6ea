//! Stream MCP tools

use super::{failure_result, id_schema, parse_args};
use crate::clients::{CutoverClient, ResourceId};
use crate::server::{McpServerError, McpServerResult, Tool, ToolContext};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Tool to delete a stream or substream from a runbook.
pub struct DeleteStreamTool {
    client: Arc<CutoverClient>,
}

impl DeleteStreamTool {
    /// Create the tool around a shared client.
    pub fn new(client: Arc<CutoverClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteStreamTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("delete_stream", "Delete a stream from a runbook")
            .with_category("streams")
            .destructive()
            .with_schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "runbook_id": id_schema("The ID of the runbook containing the stream"),
                    "stream_id": id_schema("The ID of the stream to delete")
                },
                "required": ["runbook_id", "stream_id"]
            }))
    }

    #[instrument(skip(self, args, context), fields(tool = "delete_stream"))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: DeleteStreamParams = parse_args(args)?;

        debug!(
            correlation_id = context.correlation_id.as_deref().unwrap_or("-"),
            "Deleting stream {} from runbook {}", params.stream_id, params.runbook_id
        );

        match self
            .client
            .delete_stream(&params.runbook_id, &params.stream_id)
            .await
        {
            Ok(result) => serde_json::to_value(result)
                .map(ToolResult::json)
                .map_err(|e| McpServerError::Internal(e.to_string())),
            Err(e) => failure_result("delete stream", e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteStreamParams {
    runbook_id: ResourceId,
    stream_id: ResourceId,
}

/// Get all stream tools.
pub fn stream_tools(client: Arc<CutoverClient>) -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(DeleteStreamTool::new(client))]
}
