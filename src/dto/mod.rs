use std::time::SystemTime;
use time::OffsetDateTime;

/// Shared message payload.
pub mod common;
/// Game requests and snapshots.
pub mod game;
/// Health check payload.
pub mod health;
/// Job trigger reports.
pub mod jobs;
/// Score listings.
pub mod score;
/// User registration and rankings.
pub mod user;
/// Custom field validators.
pub mod validation;

/// Calendar date (`YYYY-MM-DD`, UTC) of a stored timestamp.
fn format_system_date(time: SystemTime) -> String {
    OffsetDateTime::from(time).date().to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn formats_dates_as_iso_calendar_day() {
        // 2021-03-04T05:06:07Z
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_614_834_367);
        assert_eq!(format_system_date(time), "2021-03-04");
    }
}
