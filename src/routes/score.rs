use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use validator::Validate;

use crate::{
    dto::{
        common::StringMessage,
        score::{HighScoresQuery, ScoreSummary},
    },
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Routes exposing recorded scores.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/scores", get(get_scores))
        .route("/scores/user/{user_name}", get(get_user_scores))
        .route("/scores/high_scores", get(get_high_scores))
}

/// List every recorded score.
#[utoipa::path(
    get,
    path = "/scores",
    tag = "score",
    responses((status = 200, description = "All scores", body = [ScoreSummary]))
)]
pub async fn get_scores(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ScoreSummary>>, AppError> {
    Ok(Json(score_service::get_scores(&state).await?))
}

/// List the scores of one user.
#[utoipa::path(
    get,
    path = "/scores/user/{user_name}",
    tag = "score",
    params(("user_name" = String, Path, description = "Name of the user")),
    responses(
        (status = 200, description = "Scores of the user", body = [ScoreSummary]),
        (status = 404, description = "Unknown user", body = StringMessage)
    )
)]
pub async fn get_user_scores(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
) -> Result<Json<Vec<ScoreSummary>>, AppError> {
    Ok(Json(
        score_service::get_user_scores(&state, &user_name).await?,
    ))
}

/// Leaderboard of winning games, fewest attempts used first.
#[utoipa::path(
    get,
    path = "/scores/high_scores",
    tag = "score",
    params(HighScoresQuery),
    responses(
        (status = 200, description = "Ranked winning scores", body = [ScoreSummary]),
        (status = 400, description = "Invalid number_of_results", body = StringMessage),
        (status = 404, description = "No winning scores yet", body = StringMessage)
    )
)]
pub async fn get_high_scores(
    State(state): State<SharedState>,
    query: Result<Query<HighScoresQuery>, QueryRejection>,
) -> Result<Json<Vec<ScoreSummary>>, AppError> {
    let Query(query) = query?;
    query.validate()?;
    Ok(Json(
        score_service::get_high_scores(&state, query.number_of_results).await?,
    ))
}
