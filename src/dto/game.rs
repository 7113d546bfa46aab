use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dto::validation::validate_answer, state::game::HangmanGame};

/// Payload used to start a game for an existing user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct NewGameRequest {
    /// Name of the registered player starting the game.
    #[serde(default)]
    #[validate(length(min = 1, message = "You must enter a user name to create a new game"))]
    pub user_name: String,
    /// Secret word; only letters are accepted.
    #[serde(default)]
    #[validate(custom(function = "validate_answer"))]
    pub answer: String,
    /// Wrong-guess budget; the configured default applies when omitted.
    #[serde(default)]
    #[validate(range(min = 1, message = "Number of attempts must be greater than 0!"))]
    pub attempts: Option<i64>,
}

/// A single guess submitted for a game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MakeMoveRequest {
    /// Exactly one letter.
    #[serde(rename = "move", default)]
    pub guess: String,
}

/// Snapshot of a game returned after every game operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Key addressing the game in every `/game/{game_key}` route.
    pub urlsafe_key: String,
    /// Name of the player owning the game.
    pub user_name: String,
    /// Wrong-guess budget chosen at creation.
    pub attempts: u32,
    /// Wrong guesses left.
    pub attempts_remaining: u32,
    /// Whether the game is won or lost.
    pub game_over: bool,
    /// Reveal state with `_` for letters not found yet.
    pub revealed: String,
    /// Outcome of the last operation.
    pub message: String,
}

impl GameSummary {
    /// Snapshot `game` with the given owner name and message.
    pub fn from_game(game: &HangmanGame, user_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            urlsafe_key: game.id.to_string(),
            user_name: user_name.into(),
            attempts: game.attempts_allowed(),
            attempts_remaining: game.attempts_remaining(),
            game_over: game.is_over(),
            revealed: game.revealed_pattern(),
            message: message.into(),
        }
    }
}

/// Ordered log of the moves that changed a game.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameHistoryResponse {
    /// Key of the game.
    pub urlsafe_key: String,
    /// Entries formatted as `Guess: <letter>, Result: <message>`.
    pub moves: Vec<String>,
}

impl From<&HangmanGame> for GameHistoryResponse {
    fn from(game: &HangmanGame) -> Self {
        Self {
            urlsafe_key: game.id.to_string(),
            moves: game.move_log().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn request(answer: &str, attempts: Option<i64>) -> NewGameRequest {
        NewGameRequest {
            user_name: "ada".into(),
            answer: answer.into(),
            attempts,
        }
    }

    #[test]
    fn new_game_request_validation() {
        assert!(request("hangman", None).validate().is_ok());
        assert!(request("hangman", Some(3)).validate().is_ok());
        assert!(request("hangman", Some(0)).validate().is_err());
        assert!(request("hangman", Some(-2)).validate().is_err());
        assert!(request("", None).validate().is_err());
        assert!(request("hang man", None).validate().is_err());
    }

    #[test]
    fn move_request_reads_move_field() {
        let request: MakeMoveRequest = serde_json::from_str(r#"{ "move": "a" }"#).unwrap();
        assert_eq!(request.guess, "a");
    }

    #[test]
    fn summary_exposes_reveal_pattern() {
        let mut game = HangmanGame::new(Uuid::new_v4(), "rust", 5).unwrap();
        game.apply_move("u").unwrap();

        let summary = GameSummary::from_game(&game, "ada", "hello");

        assert_eq!(summary.urlsafe_key, game.id.to_string());
        assert_eq!(summary.revealed, "_u__");
        assert_eq!(summary.attempts, 5);
        assert_eq!(summary.attempts_remaining, 5);
        assert!(!summary.game_over);
    }
}
