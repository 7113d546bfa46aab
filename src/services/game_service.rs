use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::{game_store::GameStore, models::GameFilter},
    dto::{
        common::StringMessage,
        game::{GameHistoryResponse, GameSummary, MakeMoveRequest, NewGameRequest},
    },
    error::ServiceError,
    services::task_queue::Task,
    state::{
        SharedState,
        game::{HangmanGame, MoveOutcome},
        user::Player,
    },
};

const GAME_OVER: &str = "Game is over!";
const GAME_NOT_FOUND: &str = "Game not found!";

/// Start a game for an existing user.
pub async fn new_game(
    state: &SharedState,
    request: NewGameRequest,
) -> Result<GameSummary, ServiceError> {
    let user_name = request.user_name.trim();
    if user_name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "You must enter a user name to create a new game".into(),
        ));
    }

    let store = state.require_game_store().await?;
    let Some(user) = store.find_user_by_name(user_name.to_owned()).await? else {
        return Err(ServiceError::NotFound(format!(
            "A User with name {user_name} does not exist!"
        )));
    };

    request.validate()?;
    let attempts = match request.attempts {
        Some(value) => u32::try_from(value).map_err(|_| {
            ServiceError::InvalidInput(format!("Number of attempts must not exceed {}!", u32::MAX))
        })?,
        None => state.config().default_attempts,
    };

    let game = HangmanGame::new(user.id, &request.answer, attempts)?;
    store.save_game(game.clone().into()).await?;
    state.enqueue(Task::CacheAverageAttempts);

    info!(game_id = %game.id, user_name = %user.name, attempts, "game created");
    Ok(GameSummary::from_game(
        &game,
        user.name,
        "Good luck playing Hangman!",
    ))
}

/// Current state of a game.
pub async fn get_game(state: &SharedState, game_key: &str) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let game = load_game(&store, game_key).await?;
    let owner = owner_name(&store, &game).await?;

    let message = if game.is_over() {
        GAME_OVER.to_owned()
    } else {
        format!("You have {} attempts remaining", game.attempts_remaining())
    };
    Ok(GameSummary::from_game(&game, owner, message))
}

/// Apply a guess and persist its effects.
///
/// Finishing the game updates the owner's record and writes the score.
pub async fn make_move(
    state: &SharedState,
    game_key: &str,
    request: MakeMoveRequest,
) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let mut game = load_game(&store, game_key).await?;
    let Some(owner) = store.find_user(game.user_id).await? else {
        return Err(missing_owner(&game));
    };

    if game.is_over() {
        return Ok(GameSummary::from_game(&game, owner.name, GAME_OVER));
    }

    let outcome = game.apply_move(&request.guess)?;
    if let MoveOutcome::AlreadyRevealed(_) = outcome {
        debug!(game_id = %game.id, "letter already revealed; nothing to persist");
        return Ok(GameSummary::from_game(&game, owner.name, outcome.to_string()));
    }

    let mut player = Player::from(owner);
    let finished = outcome.finished();
    // Finalization is written before the game, so a failed write leaves the move replayable.
    if let Some(won) = finished {
        store.save_score(game.final_score(won)).await?;
        player.record_game(won);
        store
            .save_user(player.clone().into())
            .await
            .inspect_err(|err| {
                warn!(game_id = %game.id, error = %err, "score saved but player record not updated");
            })?;
    }

    store.save_game(game.clone().into()).await.inspect_err(|err| {
        if finished.is_some() {
            warn!(game_id = %game.id, error = %err, "game finalized but its final state not saved");
        }
    })?;

    if let Some(won) = finished {
        info!(
            game_id = %game.id,
            user_name = %player.name,
            won,
            attempts_used = game.attempts_used(),
            "game finished"
        );
    }
    state.enqueue(Task::CacheAverageAttempts);

    Ok(GameSummary::from_game(&game, player.name, outcome.to_string()))
}

/// Unfinished games of a user.
pub async fn get_user_games(
    state: &SharedState,
    user_name: &str,
) -> Result<Vec<GameSummary>, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(user) = store.find_user_by_name(user_name.to_owned()).await? else {
        return Err(ServiceError::NotFound(format!(
            "A User with name {user_name} does not exist!"
        )));
    };

    let games = store.list_games(GameFilter::active_for(user.id)).await?;
    Ok(games
        .into_iter()
        .map(|entity| GameSummary::from_game(&HangmanGame::from(entity), user.name.clone(), ""))
        .collect())
}

/// Delete a game that is still in progress.
pub async fn cancel_game(
    state: &SharedState,
    game_key: &str,
) -> Result<StringMessage, ServiceError> {
    let store = state.require_game_store().await?;
    let game = load_game(&store, game_key).await?;
    if game.is_over() {
        return Err(ServiceError::Forbidden("Game is already over!".into()));
    }

    if !store.delete_game(game.id).await? {
        return Err(ServiceError::NotFound(GAME_NOT_FOUND.into()));
    }
    state.enqueue(Task::CacheAverageAttempts);

    info!(game_id = %game.id, "game cancelled");
    Ok(StringMessage::new(format!("Game with key {game_key} deleted.")))
}

/// Moves that changed a game, oldest first.
pub async fn get_game_history(
    state: &SharedState,
    game_key: &str,
) -> Result<GameHistoryResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let game = load_game(&store, game_key).await?;
    Ok(GameHistoryResponse::from(&game))
}

async fn load_game(store: &Arc<dyn GameStore>, game_key: &str) -> Result<HangmanGame, ServiceError> {
    let Ok(id) = Uuid::parse_str(game_key) else {
        return Err(ServiceError::NotFound(GAME_NOT_FOUND.into()));
    };

    store
        .find_game(id)
        .await?
        .map(HangmanGame::from)
        .ok_or_else(|| ServiceError::NotFound(GAME_NOT_FOUND.into()))
}

async fn owner_name(store: &Arc<dyn GameStore>, game: &HangmanGame) -> Result<String, ServiceError> {
    store
        .find_user(game.user_id)
        .await?
        .map(|user| user.name)
        .ok_or_else(|| missing_owner(game))
}

fn missing_owner(game: &HangmanGame) -> ServiceError {
    ServiceError::Internal(format!(
        "owner `{}` of game `{}` not found",
        game.user_id, game.id
    ))
}
