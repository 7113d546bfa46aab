//! Runtime hangman game and the move evaluator applying guesses to it.

use std::{fmt, time::SystemTime};

use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{GameEntity, ScoreEntity};

/// Placeholder shown for letters that have not been guessed yet.
pub const HIDDEN_LETTER: char = '_';

/// Reasons a game cannot be created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Answer is blank after trimming.
    #[error("answer must not be empty")]
    EmptyAnswer,
    /// Answer contains a character that is not a letter.
    #[error("answer may only contain letters, found `{0}`")]
    InvalidAnswer(char),
    /// Wrong-guess budget is zero.
    #[error("number of attempts must be greater than 0")]
    NoAttempts,
}

/// Reasons a move is refused without touching the game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// Move is not exactly one letter.
    #[error("you must enter a single character, got `{0}`")]
    InvalidGuess(String),
    /// Game already finished.
    #[error("game is already over")]
    GameOver,
}

/// Result of applying a valid guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The letter was found earlier; nothing changed.
    AlreadyRevealed(char),
    /// The letter is not in the answer and attempts remain.
    Wrong { remaining: u32 },
    /// The letter is not in the answer and the budget is exhausted.
    Lost,
    /// The letter was revealed and blanks remain.
    Correct { revealed: String },
    /// The letter completed the answer.
    Won,
}

impl MoveOutcome {
    /// `Some(won)` when this move finished the game.
    pub fn finished(&self) -> Option<bool> {
        match self {
            MoveOutcome::Lost => Some(false),
            MoveOutcome::Won => Some(true),
            _ => None,
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::AlreadyRevealed(letter) => write!(f, "You already got the letter {letter}"),
            MoveOutcome::Wrong { remaining } => {
                write!(f, "Wrong! You have {remaining} attempts remaining!")
            }
            MoveOutcome::Lost => f.write_str("Game Over, You lose!"),
            MoveOutcome::Correct { revealed } => write!(f, "Correct! You got {revealed}"),
            MoveOutcome::Won => f.write_str("You win!"),
        }
    }
}

/// Accept exactly one alphabetic character.
pub fn parse_guess(input: &str) -> Result<char, MoveError> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_alphabetic() => Ok(letter),
        _ => Err(MoveError::InvalidGuess(input.to_owned())),
    }
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// A hangman game as manipulated by the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HangmanGame {
    /// Key of the game.
    pub id: Uuid,
    /// Owner of the game.
    pub user_id: Uuid,
    answer: Vec<char>,
    revealed: Vec<Option<char>>,
    attempts_allowed: u32,
    attempts_remaining: u32,
    is_over: bool,
    move_log: Vec<String>,
    /// Creation time.
    pub created_at: SystemTime,
    /// Time of the last state change.
    pub updated_at: SystemTime,
}

impl HangmanGame {
    /// Start a game for `user_id` with every position hidden.
    pub fn new(user_id: Uuid, answer: &str, attempts: u32) -> Result<Self, GameError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(GameError::EmptyAnswer);
        }
        if let Some(invalid) = answer.chars().find(|c| !c.is_alphabetic()) {
            return Err(GameError::InvalidAnswer(invalid));
        }
        if attempts == 0 {
            return Err(GameError::NoAttempts);
        }

        let answer: Vec<char> = answer.chars().collect();
        let now = SystemTime::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            revealed: vec![None; answer.len()],
            answer,
            attempts_allowed: attempts,
            attempts_remaining: attempts,
            is_over: false,
            move_log: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Wrong-guess budget chosen at creation.
    pub fn attempts_allowed(&self) -> u32 {
        self.attempts_allowed
    }

    /// Wrong guesses left.
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Wrong guesses spent.
    pub fn attempts_used(&self) -> u32 {
        self.attempts_allowed - self.attempts_remaining
    }

    /// Whether the game was won or lost.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Moves that changed the game, oldest first.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    /// Current reveal state, e.g. `h_ll_`.
    pub fn revealed_pattern(&self) -> String {
        self.revealed
            .iter()
            .map(|slot| slot.unwrap_or(HIDDEN_LETTER))
            .collect()
    }

    fn is_solved(&self) -> bool {
        self.revealed.iter().all(Option::is_some)
    }

    /// Apply one guess.
    ///
    /// Invalid input and moves against a finished game are rejected without any
    /// change. Re-guessing a revealed letter is a no-op. Every other move is
    /// appended to the move log, and the move that ends the game flips
    /// `is_over` for good.
    pub fn apply_move(&mut self, input: &str) -> Result<MoveOutcome, MoveError> {
        if self.is_over {
            return Err(MoveError::GameOver);
        }
        let guess = parse_guess(input)?;

        if self
            .revealed
            .iter()
            .flatten()
            .any(|found| same_letter(*found, guess))
        {
            return Ok(MoveOutcome::AlreadyRevealed(guess));
        }

        let mut hit = false;
        for (slot, letter) in self.revealed.iter_mut().zip(&self.answer) {
            if same_letter(*letter, guess) {
                *slot = Some(*letter);
                hit = true;
            }
        }

        let outcome = if !hit {
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            if self.attempts_remaining == 0 {
                self.is_over = true;
                MoveOutcome::Lost
            } else {
                MoveOutcome::Wrong {
                    remaining: self.attempts_remaining,
                }
            }
        } else if self.is_solved() {
            self.is_over = true;
            MoveOutcome::Won
        } else {
            MoveOutcome::Correct {
                revealed: self.revealed_pattern(),
            }
        };

        self.move_log
            .push(format!("Guess: {guess}, Result: {outcome}"));
        self.updated_at = SystemTime::now();
        Ok(outcome)
    }

    /// Score record for a game that just finished.
    pub fn final_score(&self, won: bool) -> ScoreEntity {
        ScoreEntity {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            game_id: self.id,
            date: self.updated_at,
            won,
            attempts_used: self.attempts_used(),
            attempts_allowed: self.attempts_allowed,
        }
    }
}

impl From<GameEntity> for HangmanGame {
    fn from(entity: GameEntity) -> Self {
        // Tolerate documents whose reveal state drifted from the answer length.
        let mut revealed = entity.revealed;
        revealed.resize(entity.answer.len(), None);

        Self {
            id: entity.id,
            user_id: entity.user_id,
            answer: entity.answer,
            revealed,
            attempts_allowed: entity.attempts_allowed,
            attempts_remaining: entity.attempts_remaining.min(entity.attempts_allowed),
            is_over: entity.is_over,
            move_log: entity.move_log,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<HangmanGame> for GameEntity {
    fn from(game: HangmanGame) -> Self {
        Self {
            id: game.id,
            user_id: game.user_id,
            answer: game.answer,
            revealed: game.revealed,
            attempts_allowed: game.attempts_allowed,
            attempts_remaining: game.attempts_remaining,
            is_over: game.is_over,
            move_log: game.move_log,
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}
