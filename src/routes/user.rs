use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{
        common::StringMessage,
        game::GameSummary,
        user::{CreateUserRequest, UserSummary},
    },
    error::AppError,
    services::{game_service, score_service, user_service},
    state::SharedState,
};

/// Routes for user registration and per-user listings.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/{user_name}/games", get(get_user_games))
        .route("/users/rankings", get(get_user_rankings))
}

/// Register a user with a unique name and email.
#[utoipa::path(
    post,
    path = "/user",
    tag = "user",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = StringMessage),
        (status = 400, description = "Malformed body, missing or invalid name or email", body = StringMessage),
        (status = 409, description = "Name or email already taken", body = StringMessage)
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<StringMessage>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let message = user_service::create_user(&state, payload).await?;
    Ok(Json(message))
}

/// List the unfinished games of a user.
#[utoipa::path(
    get,
    path = "/user/{user_name}/games",
    tag = "user",
    params(("user_name" = String, Path, description = "Name of the user")),
    responses(
        (status = 200, description = "Active games", body = [GameSummary]),
        (status = 404, description = "Unknown user", body = StringMessage)
    )
)]
pub async fn get_user_games(
    State(state): State<SharedState>,
    Path(user_name): Path<String>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    let games = game_service::get_user_games(&state, &user_name).await?;
    Ok(Json(games))
}

/// Rank users by win ratio.
#[utoipa::path(
    get,
    path = "/users/rankings",
    tag = "user",
    responses(
        (status = 200, description = "Users with at least one win, best first", body = [UserSummary]),
        (status = 404, description = "No ranked users", body = StringMessage)
    )
)]
pub async fn get_user_rankings(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = score_service::get_user_rankings(&state).await?;
    Ok(Json(users))
}
