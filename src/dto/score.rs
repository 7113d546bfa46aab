use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{dao::models::ScoreEntity, dto::format_system_date};

/// Outcome of a finished game.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreSummary {
    /// Player who finished the game.
    pub user_name: String,
    /// Day the game finished, `YYYY-MM-DD`.
    pub date: String,
    /// Whether the game was won.
    pub won: bool,
    /// Wrong guesses spent.
    pub attempts_used: u32,
    /// Wrong-guess budget of the game.
    pub attempts: u32,
}

impl ScoreSummary {
    /// Project a stored score with its owner name.
    pub fn new(score: &ScoreEntity, user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            date: format_system_date(score.date),
            won: score.won,
            attempts_used: score.attempts_used,
            attempts: score.attempts_allowed,
        }
    }
}

/// Query parameters of the leaderboard.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct HighScoresQuery {
    /// Maximum number of scores to return.
    #[validate(range(min = 1, max = 100))]
    pub number_of_results: Option<usize>,
}
