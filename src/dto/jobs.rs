use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of a reminder run.
#[derive(Debug, Default, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct ReminderReport {
    /// Users a reminder was delivered to.
    pub notified: usize,
    /// Users whose reminder could not be delivered.
    pub failed: usize,
}
