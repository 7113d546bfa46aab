use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Hangman Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::user::create_user,
        crate::routes::user::get_user_games,
        crate::routes::user::get_user_rankings,
        crate::routes::game::new_game,
        crate::routes::game::get_game,
        crate::routes::game::make_move,
        crate::routes::game::cancel_game,
        crate::routes::game::get_game_history,
        crate::routes::game::get_average_attempts,
        crate::routes::score::get_scores,
        crate::routes::score::get_user_scores,
        crate::routes::score::get_high_scores,
        crate::routes::jobs::send_reminder,
        crate::routes::jobs::cache_average_attempts,
    ),
    components(
        schemas(
            crate::dto::common::StringMessage,
            crate::dto::health::HealthStatus,
            crate::dto::health::HealthResponse,
            crate::dto::user::CreateUserRequest,
            crate::dto::user::UserSummary,
            crate::dto::game::NewGameRequest,
            crate::dto::game::MakeMoveRequest,
            crate::dto::game::GameSummary,
            crate::dto::game::GameHistoryResponse,
            crate::dto::score::ScoreSummary,
            crate::dto::jobs::ReminderReport,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "user", description = "User registration and rankings"),
        (name = "game", description = "Hangman game lifecycle"),
        (name = "score", description = "Scores and leaderboard"),
        (name = "jobs", description = "Reminder job and cache refresh triggers"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/user",
            "/game",
            "/game/{game_key}",
            "/game/{game_key}/cancel",
            "/game/{game_key}/history",
            "/games/average_attempts",
            "/scores",
            "/scores/user/{user_name}",
            "/scores/high_scores",
            "/user/{user_name}/games",
            "/users/rankings",
            "/crons/send_reminder",
            "/tasks/cache_average_attempts",
            "/healthcheck",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
