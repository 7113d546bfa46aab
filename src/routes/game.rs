use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{delete, get, post},
};

use crate::{
    dto::{
        common::StringMessage,
        game::{GameHistoryResponse, GameSummary, MakeMoveRequest, NewGameRequest},
    },
    error::AppError,
    services::{game_service, stats_service},
    state::SharedState,
};

/// Routes handling the game lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", post(new_game))
        .route("/game/{game_key}", get(get_game).put(make_move))
        .route("/game/{game_key}/cancel", delete(cancel_game))
        .route("/game/{game_key}/history", get(get_game_history))
        .route("/games/average_attempts", get(get_average_attempts))
}

/// Start a new game for an existing user.
#[utoipa::path(
    post,
    path = "/game",
    tag = "game",
    request_body = NewGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameSummary),
        (status = 400, description = "Malformed body, missing user name or answer, or invalid attempts", body = StringMessage),
        (status = 404, description = "Unknown user", body = StringMessage)
    )
)]
pub async fn new_game(
    State(state): State<SharedState>,
    payload: Result<Json<NewGameRequest>, JsonRejection>,
) -> Result<Json<GameSummary>, AppError> {
    let Json(payload) = payload?;
    let summary = game_service::new_game(&state, payload).await?;
    Ok(Json(summary))
}

/// Return the current state of a game.
#[utoipa::path(
    get,
    path = "/game/{game_key}",
    tag = "game",
    params(("game_key" = String, Path, description = "Key of the game")),
    responses(
        (status = 200, description = "Game state", body = GameSummary),
        (status = 404, description = "Game not found", body = StringMessage)
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(game_key): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::get_game(&state, &game_key).await?;
    Ok(Json(summary))
}

/// Guess a letter.
#[utoipa::path(
    put,
    path = "/game/{game_key}",
    tag = "game",
    params(("game_key" = String, Path, description = "Key of the game")),
    request_body = MakeMoveRequest,
    responses(
        (status = 200, description = "Outcome of the move", body = GameSummary),
        (status = 400, description = "Malformed body or move is not a single letter", body = StringMessage),
        (status = 404, description = "Game not found", body = StringMessage)
    )
)]
pub async fn make_move(
    State(state): State<SharedState>,
    Path(game_key): Path<String>,
    payload: Result<Json<MakeMoveRequest>, JsonRejection>,
) -> Result<Json<GameSummary>, AppError> {
    let Json(payload) = payload?;
    let summary = game_service::make_move(&state, &game_key, payload).await?;
    Ok(Json(summary))
}

/// Delete a game that is still in progress.
#[utoipa::path(
    delete,
    path = "/game/{game_key}/cancel",
    tag = "game",
    params(("game_key" = String, Path, description = "Key of the game")),
    responses(
        (status = 200, description = "Game deleted", body = StringMessage),
        (status = 403, description = "Game is already over", body = StringMessage),
        (status = 404, description = "Game not found", body = StringMessage)
    )
)]
pub async fn cancel_game(
    State(state): State<SharedState>,
    Path(game_key): Path<String>,
) -> Result<Json<StringMessage>, AppError> {
    let message = game_service::cancel_game(&state, &game_key).await?;
    Ok(Json(message))
}

/// Return the moves played in a game.
#[utoipa::path(
    get,
    path = "/game/{game_key}/history",
    tag = "game",
    params(("game_key" = String, Path, description = "Key of the game")),
    responses(
        (status = 200, description = "Move log", body = GameHistoryResponse),
        (status = 404, description = "Game not found", body = StringMessage)
    )
)]
pub async fn get_game_history(
    State(state): State<SharedState>,
    Path(game_key): Path<String>,
) -> Result<Json<GameHistoryResponse>, AppError> {
    let history = game_service::get_game_history(&state, &game_key).await?;
    Ok(Json(history))
}

/// Return the cached average of attempts remaining across active games.
#[utoipa::path(
    get,
    path = "/games/average_attempts",
    tag = "game",
    responses(
        (status = 200, description = "Cached average, empty message when not computed yet", body = StringMessage)
    )
)]
pub async fn get_average_attempts(State(state): State<SharedState>) -> Json<StringMessage> {
    Json(stats_service::get_average_attempts(&state).await)
}
