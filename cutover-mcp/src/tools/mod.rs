//! Cutover MCP tools
//!
//! Tools are grouped by the Cutover resource they act on. Every tool holds a
//! shared [`CutoverClient`] handle.

pub mod streams;
pub mod tasks;

pub use streams::*;
pub use tasks::*;

use crate::clients::{CutoverClient, CutoverError};
use crate::server::{McpServerError, Tool};
use crate::types::ToolResult;
use std::sync::Arc;
use tracing::error;

/// Get all available MCP tools bound to the given client.
///
/// # Example
///
/// ```rust,no_run
/// use cutover_mcp::{all_tools, CutoverClient, McpServer};
/// use std::sync::Arc;
///
/// async fn setup() -> Result<McpServer, cutover_mcp::CutoverError> {
///     let client = Arc::new(CutoverClient::from_env()?);
///     let server = McpServer::cutover();
///     server.register_tools(all_tools(client)).await;
///     Ok(server)
/// }
/// ```
pub fn all_tools(client: Arc<CutoverClient>) -> Vec<Arc<dyn Tool>> {
    let mut tools = Vec::new();

    tools.extend(task_tools(client.clone()));
    tools.extend(stream_tools(client));

    tools
}

/// Map a client failure onto the tool-call outcome.
///
/// Locally rejected input becomes an MCP invalid-params error. Anything the
/// remote service (or the network) produced is reported as an error result
/// carrying the status and the untouched response body.
pub(crate) fn failure_result(action: &str, err: CutoverError) -> Result<ToolResult, McpServerError> {
    let err = match err {
        CutoverError::InvalidArgument(message) => {
            return Err(McpServerError::InvalidParams(message))
        }
        other => other,
    };

    error!("Failed to {}: {}", action, err);

    let body = match &err {
        CutoverError::ApiError { body, .. } => Some(
            serde_json::from_str::<serde_json::Value>(body)
                .unwrap_or_else(|_| serde_json::Value::String(body.clone())),
        ),
        _ => None,
    };

    Ok(ToolResult::json_error(serde_json::json!({
        "error": format!("Failed to {}: {}", action, err),
        "kind": err.kind(),
        "status": err.status(),
        "body": body
    })))
}

/// JSON schema for a Cutover id, which may be a string or an integer.
pub(crate) fn id_schema(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": ["string", "integer"],
        "description": description
    })
}

/// Parse tool arguments into a typed parameter struct.
pub(crate) fn parse_args<T>(args: serde_json::Value) -> Result<T, McpServerError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    serde_json::from_value(args).map_err(|e| McpServerError::InvalidParams(e.to_string()))
}
