//! # Cutover MCP
//!
//! This crate exposes the Cutover runbook platform as a set of MCP (Model
//! Context Protocol) tools.
//!
//! ## Overview
//!
//! - **Clients**: authenticated HTTP client for the Cutover public API
//! - **Tools**: tool definitions and execution
//! - **JSON-RPC**: MCP request dispatch (`initialize`, `ping`, `tools/list`, `tools/call`)
//! - **Health**: liveness and readiness probes against the Cutover API
//!
//! ## Available Tools
//!
//! - `delete_task`: Delete one task from a runbook
//! - `delete_tasks`: Delete up to five tasks from a runbook, reporting
//!   per-task failures instead of aborting
//! - `delete_stream`: Delete a stream from a runbook
//!
//! Cutover has no working batch-delete endpoint. `delete_tasks` issues one
//! DELETE per task, sequentially, and always returns both the deleted ids
//! and the failures. Callers must check `errors` before assuming success.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cutover_mcp::{all_tools, CutoverClient, McpRequest, McpServer};
//! use std::sync::Arc;
//!
//! async fn run(json: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(CutoverClient::from_env()?);
//!     let server = McpServer::cutover();
//!     server.register_tools(all_tools(client)).await;
//!
//!     let request: McpRequest = serde_json::from_str(json)?;
//!     let response = server.handle_request(request).await;
//!     println!("{}", serde_json::to_string(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `CUTOVER_BASE_URL` | yes | |
//! | `CUTOVER_API_TOKEN` | yes | |
//! | `CUTOVER_CORE_URL` | no | |
//! | `CUTOVER_TIMEOUT_SECS` | no | 30 |
//! | `CUTOVER_VERIFY_TLS` | no | true |

pub mod clients;
pub mod health;
pub mod server;
pub mod tools;
pub mod types;

// Re-export main types
pub use server::{McpServer, McpServerError, McpServerResult, Tool, ToolContext};
pub use types::{
    ContentBlock, McpError, McpRequest, McpResponse, RequestId, ServerCapabilities, ServerInfo,
    ToolCall, ToolCapabilities, ToolDefinition, ToolResult,
};

// Re-export tool collections
pub use tools::{all_tools, stream_tools, task_tools};

// Re-export the service client
pub use clients::{
    BulkDeletionResult, ConfigError, CutoverClient, CutoverConfig, CutoverError, DeletionResult,
    FailureKind, ResourceId, ServiceEndpoint, TaskDeletionError, MAX_BULK_DELETE,
};

// Re-export health check types
pub use health::{
    HealthCheckConfig, HealthChecker, HealthReport, LivenessResult, ReadinessResult,
    ServiceHealth, ServiceStatus,
};
