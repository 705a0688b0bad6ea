//! Health checks for the Cutover integration.
//!
//! - **Liveness**: the process is running.
//! - **Readiness**: the Cutover API is reachable with the configured token.
//! - **Report**: readiness plus latency, with a degraded threshold.
//!
//! The probe is an authenticated `GET core/task_types`, a cheap read that
//! every token with API access may perform.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cutover_mcp::{CutoverClient, HealthChecker};
//! use std::sync::Arc;
//!
//! async fn check_health() -> Result<(), cutover_mcp::CutoverError> {
//!     let checker = HealthChecker::new(Arc::new(CutoverClient::from_env()?));
//!     let report = checker.check().await;
//!     println!("{:?}: {} ({}ms)", report.status, report.message, report.service.latency_ms);
//!     Ok(())
//! }
//! ```

use crate::clients::CutoverClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Path used to probe the Cutover API.
const PROBE_PATH: &str = "core/task_types";

/// Status of the Cutover API as seen from this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy.
    Up,
    /// Service answered, but slower than the degraded threshold.
    Degraded,
    /// Service is unreachable or rejected the probe.
    Down,
}

/// Health check result for the Cutover API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Service name.
    pub name: String,

    /// Service status.
    pub status: ServiceStatus,

    /// Response latency in milliseconds.
    pub latency_ms: u64,

    /// Service URL.
    pub url: String,

    /// HTTP status of a rejected probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Error message if unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status.
    pub status: ServiceStatus,

    /// Timestamp of the check (ISO 8601).
    pub timestamp: String,

    /// Cutover API health.
    pub service: ServiceHealth,

    /// Crate version.
    pub version: String,

    /// Summary message.
    pub message: String,
}

/// Liveness check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResult {
    /// Is the service alive?
    pub alive: bool,

    /// Timestamp.
    pub timestamp: String,

    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Readiness check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResult {
    /// Is the service ready?
    pub ready: bool,

    /// Timestamp.
    pub timestamp: String,

    /// Reason if not ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Health check configuration.
#[derive(Debug, Clone)]
pub struct HealthCheckConfig {
    /// Latency threshold for degraded status.
    pub degraded_threshold: Duration,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            degraded_threshold: Duration::from_secs(1),
        }
    }
}

/// Health checker for the Cutover API.
pub struct HealthChecker {
    client: Arc<CutoverClient>,
    config: HealthCheckConfig,
    start_time: Instant,
}

impl HealthChecker {
    /// Create a health checker with default thresholds.
    pub fn new(client: Arc<CutoverClient>) -> Self {
        Self::with_config(client, HealthCheckConfig::default())
    }

    /// Create a health checker with custom thresholds.
    pub fn with_config(client: Arc<CutoverClient>, config: HealthCheckConfig) -> Self {
        Self {
            client,
            config,
            start_time: Instant::now(),
        }
    }

    /// Quick liveness check. Never touches the network.
    pub fn check_liveness(&self) -> LivenessResult {
        LivenessResult {
            alive: true,
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Readiness check: the probe request must succeed.
    #[instrument(skip(self))]
    pub async fn check_readiness(&self) -> ReadinessResult {
        let health = self.probe().await;
        let ready = health.status != ServiceStatus::Down;

        ReadinessResult {
            ready,
            timestamp: chrono::Utc::now().to_rfc3339(),
            reason: health.error,
        }
    }

    /// Full health check with latency.
    #[instrument(skip(self))]
    pub async fn check(&self) -> HealthReport {
        let service = self.probe().await;

        let message = match service.status {
            ServiceStatus::Up => "Cutover API operational".to_string(),
            ServiceStatus::Degraded => format!(
                "Cutover API slow: {}ms exceeds {}ms",
                service.latency_ms,
                self.config.degraded_threshold.as_millis()
            ),
            ServiceStatus::Down => format!(
                "Cutover API down: {}",
                service.error.as_deref().unwrap_or("unknown error")
            ),
        };

        info!(status = ?service.status, latency_ms = service.latency_ms, "Health check complete");

        HealthReport {
            status: service.status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
            message,
        }
    }

    async fn probe(&self) -> ServiceHealth {
        let url = self.client.endpoint().base_url.clone();
        debug!("Probing Cutover API at {}", url);

        let start = Instant::now();
        let outcome = self.client.get::<serde_json::Value>(PROBE_PATH).await;
        let elapsed = start.elapsed();
        let latency_ms = elapsed.as_millis() as u64;

        match outcome {
            Ok(_) => {
                let status = if elapsed > self.config.degraded_threshold {
                    warn!(latency_ms, "Cutover API response time exceeds threshold");
                    ServiceStatus::Degraded
                } else {
                    ServiceStatus::Up
                };

                ServiceHealth {
                    name: "Cutover".to_string(),
                    status,
                    latency_ms,
                    url,
                    status_code: None,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Cutover API health probe failed");
                ServiceHealth {
                    name: "Cutover".to_string(),
                    status: ServiceStatus::Down,
                    latency_ms,
                    url,
                    status_code: e.status(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
