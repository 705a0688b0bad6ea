//! Service client modules.
//!
//! This module provides the HTTP client for the Cutover public API. The
//! client handles bearer authentication and error handling; configuration
//! comes from `CUTOVER_*` environment variables.

pub mod config;
pub mod cutover;

pub use config::{ConfigError, CutoverConfig, ServiceEndpoint};
pub use cutover::{
    BulkDeletionResult, CutoverClient, CutoverError, DeletionResult, FailureKind, ResourceId,
    TaskDeletionError, MAX_BULK_DELETE,
};
