use serde::Serialize;
use utoipa::ToSchema;

/// Availability of the storage backend as seen by the service.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Store installed and healthy.
    Ok,
    /// Running without storage.
    Degraded,
}

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when a store is installed and healthy, `degraded` otherwise.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Healthy response.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
        }
    }

    /// Response while storage is unavailable.
    pub fn degraded() -> Self {
        Self {
            status: HealthStatus::Degraded,
        }
    }
}
