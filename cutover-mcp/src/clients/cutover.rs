//! Cutover service client.
//!
//! HTTP client for the Cutover public API. Handles bearer authentication and
//! status checking, and implements task deletion on top of it:
//!
//! - [`CutoverClient::delete_task`] issues a single DELETE and surfaces any
//!   non-success response unchanged.
//! - [`CutoverClient::delete_tasks`] emulates a bulk delete. The API has no
//!   working batch endpoint, so each id is deleted with its own request, in
//!   order, and per-item failures are collected instead of aborting the batch.

use super::config::{ConfigError, CutoverConfig, ServiceEndpoint};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Maximum number of tasks accepted by a single bulk delete.
///
/// Client-side guard against accidental mass deletion. It is not a limit
/// imposed by the Cutover API.
pub const MAX_BULK_DELETE: usize = 5;

/// Cutover client errors.
#[derive(Debug, Error)]
pub enum CutoverError {
    /// No response was received (connect failure, timeout, TLS error).
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned a non-success response. Status and body are kept verbatim.
    #[error("API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Successful response with a body that could not be decoded.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Caller input rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Client configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CutoverError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            CutoverError::ApiError { status, .. } => Some(*status),
            CutoverError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the remote service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Coarse classification of the failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            CutoverError::ApiError { status: 404, .. } => FailureKind::NotFound,
            CutoverError::ApiError {
                status: 401 | 403, ..
            } => FailureKind::Unauthorized,
            CutoverError::ApiError { .. } | CutoverError::InvalidResponse(_) => {
                FailureKind::Remote
            }
            CutoverError::RequestFailed(_) => FailureKind::Transport,
            CutoverError::InvalidArgument(_) | CutoverError::Config(_) => {
                FailureKind::InvalidArgument
            }
        }
    }
}

/// Failure classes reported per item by a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The resource does not exist (HTTP 404).
    NotFound,
    /// The credentials were rejected (HTTP 401 or 403).
    Unauthorized,
    /// Any other non-success response.
    Remote,
    /// No response was received.
    Transport,
    /// The identifier was rejected locally.
    InvalidArgument,
}

/// Identifier of a Cutover resource (runbook, task, stream).
///
/// The API accepts both numeric and string ids. Either form is
/// percent-encoded into exactly one segment of the request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Numeric id.
    Number(i64),
    /// String id.
    Text(String),
}

impl ResourceId {
    /// An empty or whitespace-only string id.
    pub fn is_blank(&self) -> bool {
        match self {
            ResourceId::Number(_) => false,
            ResourceId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        ResourceId::Number(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Text(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId::Text(s)
    }
}

/// Result of a successful single delete. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionResult {}

/// A task that could not be deleted during a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDeletionError {
    /// The task that failed.
    pub task_id: ResourceId,

    /// Failure class.
    pub kind: FailureKind,

    /// HTTP status, when the service responded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Failure detail, including the response body for API errors.
    pub error: String,
}

impl TaskDeletionError {
    fn new(task_id: ResourceId, err: &CutoverError) -> Self {
        Self {
            task_id,
            kind: err.kind(),
            status: err.status(),
            error: err.to_string(),
        }
    }
}

/// Aggregate outcome of a bulk delete.
///
/// Every requested id appears exactly once, either in `deleted` or in
/// `errors`. Both lists keep the relative order of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeletionResult {
    /// Tasks confirmed deleted.
    pub deleted: Vec<ResourceId>,

    /// Tasks that failed, with the reason.
    pub errors: Vec<TaskDeletionError>,
}

impl BulkDeletionResult {
    /// True when every requested task was deleted.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of delete attempts made.
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.errors.len()
    }
}

/// Cutover service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CutoverClient {
    /// HTTP client instance.
    client: Client,

    /// Service endpoint configuration.
    endpoint: ServiceEndpoint,

    /// Request timeout.
    timeout: Duration,
}

impl CutoverClient {
    /// Create a new Cutover client.
    pub fn new(config: &CutoverConfig) -> Result<Self, CutoverError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout,
        })
    }

    /// Create a client from `CUTOVER_*` environment variables.
    pub fn from_env() -> Result<Self, CutoverError> {
        let config = CutoverConfig::from_env()?;
        Self::new(&config)
    }

    /// Service endpoint this client talks to.
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delete a single task from a runbook.
    ///
    /// Any non-success response is returned as [`CutoverError::ApiError`]
    /// with the status and body untouched, so a 404 can be told apart from
    /// other failures via [`CutoverError::is_not_found`].
    #[instrument(skip(self), fields(runbook_id = %runbook_id, task_id = %task_id))]
    pub async fn delete_task(
        &self,
        runbook_id: &ResourceId,
        task_id: &ResourceId,
    ) -> Result<DeletionResult, CutoverError> {
        let runbook = path_segment("runbook_id", runbook_id)?;
        let task = path_segment("task_id", task_id)?;

        debug!("Deleting task {} from runbook {}", task_id, runbook_id);

        let path = format!("core/runbooks/{}/tasks/{}", runbook, task);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(DeletionResult::default())
    }

    /// Delete up to [`MAX_BULK_DELETE`] tasks from a runbook.
    ///
    /// Returns `Err` only when the input is rejected up front (empty list,
    /// too many ids, blank runbook id); no request is sent in that case.
    /// Otherwise each task is deleted with its own request, one after the
    /// other, and the per-task outcomes are returned. A failed item never
    /// stops the remaining ones, so callers must inspect `errors`.
    #[instrument(skip(self, task_ids), fields(runbook_id = %runbook_id, count = task_ids.len()))]
    pub async fn delete_tasks(
        &self,
        runbook_id: &ResourceId,
        task_ids: &[ResourceId],
    ) -> Result<BulkDeletionResult, CutoverError> {
        if task_ids.is_empty() {
            return Err(CutoverError::InvalidArgument(
                "task_ids must contain at least one task id".to_string(),
            ));
        }
        if task_ids.len() > MAX_BULK_DELETE {
            return Err(CutoverError::InvalidArgument(format!(
                "task_ids accepts at most {} task ids per call, got {}",
                MAX_BULK_DELETE,
                task_ids.len()
            )));
        }
        path_segment("runbook_id", runbook_id)?;

        let mut result = BulkDeletionResult::default();

        for task_id in task_ids {
            match self.delete_task(runbook_id, task_id).await {
                Ok(_) => result.deleted.push(task_id.clone()),
                Err(e) => {
                    warn!(task_id = %task_id, error = %e, "Task deletion failed");
                    result.errors.push(TaskDeletionError::new(task_id.clone(), &e));
                }
            }
        }

        info!(
            deleted = result.deleted.len(),
            failed = result.errors.len(),
            "Bulk task deletion finished"
        );

        Ok(result)
    }

    /// Delete a stream (or substream) from a runbook.
    #[instrument(skip(self), fields(runbook_id = %runbook_id, stream_id = %stream_id))]
    pub async fn delete_stream(
        &self,
        runbook_id: &ResourceId,
        stream_id: &ResourceId,
    ) -> Result<DeletionResult, CutoverError> {
        let runbook = path_segment("runbook_id", runbook_id)?;
        let stream = path_segment("stream_id", stream_id)?;

        debug!("Deleting stream {} from runbook {}", stream_id, runbook_id);

        let path = format!("core/runbooks/{}/streams/{}", runbook, stream);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(DeletionResult::default())
    }

    /// Issue an authenticated GET and decode the JSON body.
    #[instrument(skip(self))]
    pub async fn get<T>(&self, path: &str) -> Result<T, CutoverError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.send(self.request(Method::GET, path)).await?;
        response
            .json()
            .await
            .map_err(|e| CutoverError::InvalidResponse(e.to_string()))
    }

    /// Build a request with the Cutover headers and credentials applied.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.endpoint.url(path))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header(
                "User-Agent",
                format!("CutoverMCP/{}", env!("CARGO_PKG_VERSION")),
            );

        if let Some(ref api_key) = self.endpoint.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Some(ref core_url) = self.endpoint.core_url {
            request = request.header("Core-Url", core_url);
        }

        request
    }

    /// Send a request and turn non-success statuses into `ApiError`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, CutoverError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = error_body(response.text().await);
            warn!("Cutover API error ({}): {}", status.as_u16(), body);
            return Err(CutoverError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

/// Body text of an error response, or a placeholder naming the read failure.
fn error_body(read: Result<String, reqwest::Error>) -> String {
    read.unwrap_or_else(|e| {
        warn!("Failed to read Cutover error body: {}", e);
        format!("<unreadable response body: {}>", e)
    })
}

/// Encode an id as a single path segment.
///
/// `/`, `?`, `#` and every other reserved character are percent-encoded, so
/// an id can never address a different resource or add a query string.
/// `.` and `..` would still be resolved as relative segments and are rejected.
fn path_segment(name: &str, id: &ResourceId) -> Result<String, CutoverError> {
    if id.is_blank() {
        return Err(CutoverError::InvalidArgument(format!(
            "{} must not be empty",
            name
        )));
    }

    let raw = id.to_string();
    if raw == "." || raw == ".." {
        return Err(CutoverError::InvalidArgument(format!(
            "{} must not be '{}'",
            name, raw
        )));
    }

    Ok(urlencoding::encode(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_deserializes_both_forms() {
        let ids: Vec<ResourceId> = serde_json::from_value(serde_json::json!([42, "t-7"])).unwrap();
        assert_eq!(ids, vec![ResourceId::Number(42), ResourceId::from("t-7")]);
        assert_eq!(ids[0].to_string(), "42");
        assert_eq!(ids[1].to_string(), "t-7");
    }

    #[test]
    fn test_resource_id_blank() {
        assert!(ResourceId::from("").is_blank());
        assert!(ResourceId::from("  ").is_blank());
        assert!(!ResourceId::from(0).is_blank());
        assert!(!ResourceId::from("x").is_blank());
    }

    #[test]
    fn test_path_segment_encodes_reserved_characters() {
        let encode = |raw: &str| path_segment("task_id", &ResourceId::from(raw)).unwrap();

        assert_eq!(path_segment("task_id", &ResourceId::from(42)).unwrap(), "42");
        assert_eq!(encode("t-7"), "t-7");
        assert_eq!(encode("../streams/9"), "..%2Fstreams%2F9");
        assert_eq!(encode("5?ids=1,2,3"), "5%3Fids%3D1%2C2%2C3");
        assert_eq!(encode("a#b"), "a%23b");
        assert_eq!(encode("a b"), "a%20b");
    }

    #[test]
    fn test_path_segment_rejects_dot_segments() {
        for raw in [".", "..", "", " "] {
            let err = path_segment("task_id", &ResourceId::from(raw)).unwrap_err();
            assert_eq!(err.kind(), FailureKind::InvalidArgument, "{:?}", raw);
        }
    }

    #[test]
    fn test_error_body_keeps_read_failure() {
        assert_eq!(error_body(Ok("Not Found".to_string())), "Not Found");

        let read_error = Client::new().get("not a url").build().unwrap_err();
        let body = error_body(Err(read_error));
        assert!(body.starts_with("<unreadable response body: "), "{}", body);
    }

    #[test]
    fn test_deletion_result_is_empty_object() {
        let value = serde_json::to_value(DeletionResult::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_error_classification() {
        let not_found = CutoverError::ApiError {
            status: 404,
            body: "{\"errors\":[]}".to_string(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.kind(), FailureKind::NotFound);

        let forbidden = CutoverError::ApiError {
            status: 403,
            body: String::new(),
        };
        assert_eq!(forbidden.kind(), FailureKind::Unauthorized);
        assert!(!forbidden.is_not_found());

        let server = CutoverError::ApiError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(server.kind(), FailureKind::Remote);
        assert_eq!(server.status(), Some(500));
        assert_eq!(server.to_string(), "API error (500): boom");

        let invalid = CutoverError::InvalidArgument("x".to_string());
        assert_eq!(invalid.kind(), FailureKind::InvalidArgument);
        assert_eq!(invalid.status(), None);
    }

    #[test]
    fn test_task_deletion_error_serialization() {
        let err = TaskDeletionError::new(
            ResourceId::from(7),
            &CutoverError::ApiError {
                status: 404,
                body: "missing".to_string(),
            },
        );
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["task_id"], 7);
        assert_eq!(value["kind"], "not_found");
        assert_eq!(value["status"], 404);
        assert_eq!(value["error"], "API error (404): missing");
    }

    #[test]
    fn test_bulk_result_helpers() {
        let mut result = BulkDeletionResult::default();
        assert!(result.is_complete());
        result.deleted.push(ResourceId::from(1));
        result.errors.push(TaskDeletionError::new(
            ResourceId::from(2),
            &CutoverError::InvalidArgument("task_id must not be empty".to_string()),
        ));
        assert!(!result.is_complete());
        assert_eq!(result.attempted(), 2);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let config = CutoverConfig::new("http://localhost:3000", "test-key");
        let client = CutoverClient::new(&config).unwrap();
        assert!(client.endpoint().has_auth());
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }
}
