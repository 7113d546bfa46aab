use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Registered player persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEntity {
    /// Stable identifier for the user.
    pub id: Uuid,
    /// Unique display name, also used to address the user in the API.
    pub name: String,
    /// Unique contact address used by the reminder job.
    pub email: Option<String>,
    /// Number of finished games the user won.
    pub won: u32,
    /// Number of finished games, won or lost.
    pub total_played: u32,
    /// `won / total_played`, refreshed whenever a game finishes.
    pub win_ratio: f64,
}

/// Hangman game persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game, exposed to clients as the game key.
    pub id: Uuid,
    /// Owner of the game.
    pub user_id: Uuid,
    /// Secret answer, one entry per position.
    pub answer: Vec<char>,
    /// Letters found so far, aligned with `answer`.
    pub revealed: Vec<Option<char>>,
    /// Wrong-guess budget chosen at creation.
    pub attempts_allowed: u32,
    /// Wrong guesses still allowed.
    pub attempts_remaining: u32,
    /// Whether the game reached a win or a loss.
    pub is_over: bool,
    /// Human readable log of every state-changing move.
    pub move_log: Vec<String>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the game entity was updated.
    pub updated_at: SystemTime,
}

/// Outcome of a finished game. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Primary key of the score record.
    pub id: Uuid,
    /// Player who finished the game.
    pub user_id: Uuid,
    /// Game the score was recorded for.
    pub game_id: Uuid,
    /// When the game finished.
    pub date: SystemTime,
    /// Whether the player found the answer.
    pub won: bool,
    /// Wrong guesses consumed before the game finished.
    pub attempts_used: u32,
    /// Wrong-guess budget of the game.
    pub attempts_allowed: u32,
}

/// Criteria applied when listing games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFilter {
    /// Only games owned by this user.
    pub user_id: Option<Uuid>,
    /// Only games whose completion flag matches.
    pub is_over: Option<bool>,
}

impl GameFilter {
    /// Unfinished games of every user.
    pub fn active() -> Self {
        Self {
            user_id: None,
            is_over: Some(false),
        }
    }

    /// Unfinished games of a single user.
    pub fn active_for(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            is_over: Some(false),
        }
    }

    /// Whether `game` satisfies every criterion of the filter.
    pub fn matches(&self, game: &GameEntity) -> bool {
        self.user_id.is_none_or(|id| game.user_id == id)
            && self.is_over.is_none_or(|over| game.is_over == over)
    }
}

/// Criteria applied when listing scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreFilter {
    /// Only scores recorded for this user.
    pub user_id: Option<Uuid>,
    /// Only wins (`Some(true)`) or losses (`Some(false)`).
    pub won: Option<bool>,
}

impl ScoreFilter {
    /// Every score recorded for a single user.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            won: None,
        }
    }

    /// Winning scores of every user.
    pub fn wins() -> Self {
        Self {
            user_id: None,
            won: Some(true),
        }
    }

    /// Whether `score` satisfies every criterion of the filter.
    pub fn matches(&self, score: &ScoreEntity) -> bool {
        self.user_id.is_none_or(|id| score.user_id == id)
            && self.won.is_none_or(|won| score.won == won)
    }
}
