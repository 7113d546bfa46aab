use tracing::{debug, info};

use crate::{
    dao::models::{GameEntity, GameFilter},
    dto::common::StringMessage,
    error::ServiceError,
    state::SharedState,
};

/// Mean of `attempts_remaining` over `games`, `None` when there are none.
pub fn average_attempts_remaining(games: &[GameEntity]) -> Option<f64> {
    if games.is_empty() {
        return None;
    }
    let total: u64 = games
        .iter()
        .map(|game| u64::from(game.attempts_remaining))
        .sum();
    Some(total as f64 / games.len() as f64)
}

/// Message served by the average endpoint.
pub fn format_average(average: f64) -> String {
    format!("The average moves remaining is {average:.2}")
}

/// Recompute the average over unfinished games and overwrite the cache.
///
/// The cache keeps its previous value when no game is in progress.
pub async fn cache_average_attempts(state: &SharedState) -> Result<Option<f64>, ServiceError> {
    let store = state.require_game_store().await?;
    let games = store.list_games(GameFilter::active()).await?;

    let Some(average) = average_attempts_remaining(&games) else {
        debug!("no active games; average cache left untouched");
        return Ok(None);
    };

    state.set_average_attempts(average).await;
    info!(average, active_games = games.len(), "cached average attempts remaining");
    Ok(Some(average))
}

/// Cached average rendered for clients; empty when nothing has been cached yet.
pub async fn get_average_attempts(state: &SharedState) -> StringMessage {
    let message = state
        .average_attempts()
        .await
        .map(format_average)
        .unwrap_or_default();
    StringMessage::new(message)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::state::game::HangmanGame;

    fn game_with_remaining(remaining: u32) -> GameEntity {
        let mut entity: GameEntity = HangmanGame::new(Uuid::new_v4(), "word", 6).unwrap().into();
        entity.attempts_remaining = remaining;
        entity
    }

    #[test]
    fn averages_remaining_attempts() {
        let games = [3, 5, 4].map(game_with_remaining);

        let average = average_attempts_remaining(&games).unwrap();

        assert_eq!(average, 4.0);
        assert_eq!(format_average(average), "The average moves remaining is 4.00");
    }

    #[test]
    fn no_games_has_no_average() {
        assert_eq!(average_attempts_remaining(&[]), None);
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_average(10.0 / 3.0), "The average moves remaining is 3.33");
    }
}
