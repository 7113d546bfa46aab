//! Cron-driven execution of the reminder job.

use std::{str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use cron::Schedule;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{services::reminder_service, state::SharedState};

/// Cron expression that could not be parsed.
#[derive(Debug, Error)]
#[error("invalid cron expression `{expression}`")]
pub struct ScheduleError {
    expression: String,
    #[source]
    source: cron::error::Error,
}

/// Parse a cron expression with a leading seconds field.
pub fn parse_schedule(expression: &str) -> Result<Schedule, ScheduleError> {
    Schedule::from_str(expression).map_err(|source| ScheduleError {
        expression: expression.to_owned(),
        source,
    })
}

fn next_after(schedule: &Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&after).next()
}

/// Run the reminder job on every tick of `schedule`.
///
/// Ticks falling while the service is degraded are skipped.
pub async fn run_reminders(state: SharedState, schedule: Schedule) {
    loop {
        let Some(next) = next_after(&schedule, Utc::now()) else {
            warn!("reminder schedule has no upcoming run; stopping");
            return;
        };

        let delay = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        debug!(scheduled = %next, "waiting for next reminder run");
        sleep(delay).await;

        if state.is_degraded() {
            warn!(scheduled = %next, "storage unavailable; skipping reminder run");
            continue;
        }

        info!(scheduled = %next, "running reminder job");
        if let Err(err) = reminder_service::send_reminders(&state).await {
            warn!(error = %err, "reminder job failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_daily_schedule() {
        let schedule = parse_schedule("0 0 9 * * *").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let next = next_after(&schedule, now).unwrap();

        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn rejects_invalid_expression() {
        let err = parse_schedule("every morning").unwrap_err();
        assert!(err.to_string().contains("every morning"));
    }
}
