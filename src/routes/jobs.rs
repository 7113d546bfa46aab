use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::{common::StringMessage, jobs::ReminderReport},
    error::AppError,
    services::{reminder_service, stats_service},
    state::SharedState,
};

/// Endpoints triggering background jobs on demand.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/crons/send_reminder", get(send_reminder))
        .route(
            "/tasks/cache_average_attempts",
            post(cache_average_attempts),
        )
}

/// Email every user that has unfinished games.
#[utoipa::path(
    get,
    path = "/crons/send_reminder",
    tag = "jobs",
    responses(
        (status = 200, description = "Reminder run report", body = ReminderReport),
        (status = 503, description = "Storage unavailable", body = StringMessage)
    )
)]
pub async fn send_reminder(
    State(state): State<SharedState>,
) -> Result<Json<ReminderReport>, AppError> {
    let report = reminder_service::send_reminders(&state).await?;
    Ok(Json(report))
}

/// Recompute the cached average of attempts remaining.
#[utoipa::path(
    post,
    path = "/tasks/cache_average_attempts",
    tag = "jobs",
    responses(
        (status = 204, description = "Cache refreshed, or left untouched without active games"),
        (status = 503, description = "Storage unavailable", body = StringMessage)
    )
)]
pub async fn cache_average_attempts(
    State(state): State<SharedState>,
) -> Result<StatusCode, AppError> {
    stats_service::cache_average_attempts(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}
