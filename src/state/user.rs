use uuid::Uuid;

use crate::dao::models::UserEntity;

/// Registered player with the counters updated when a game finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Stable player identifier.
    pub id: Uuid,
    /// Unique player name.
    pub name: String,
    /// Contact address for reminders.
    pub email: Option<String>,
    won: u32,
    total_played: u32,
    win_ratio: f64,
}

impl Player {
    /// Register a player with an empty record.
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            won: 0,
            total_played: 0,
            win_ratio: 0.0,
        }
    }

    /// Games won.
    pub fn won(&self) -> u32 {
        self.won
    }

    /// Games finished.
    pub fn total_played(&self) -> u32 {
        self.total_played
    }

    /// `won / total_played`.
    pub fn win_ratio(&self) -> f64 {
        self.win_ratio
    }

    /// Count a finished game and refresh the win ratio.
    pub fn record_game(&mut self, won: bool) {
        self.total_played += 1;
        if won {
            self.won += 1;
        }
        self.win_ratio = f64::from(self.won) / f64::from(self.total_played);
    }
}

impl From<UserEntity> for Player {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            won: entity.won,
            total_played: entity.total_played,
            win_ratio: entity.win_ratio,
        }
    }
}

impl From<Player> for UserEntity {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            email: player.email,
            won: player.won,
            total_played: player.total_played,
            win_ratio: player.win_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_game_updates_counters_and_ratio() {
        let mut player = Player::new("ada", None);

        player.record_game(true);
        player.record_game(false);
        player.record_game(false);
        player.record_game(true);

        assert_eq!(player.won(), 2);
        assert_eq!(player.total_played(), 4);
        assert_eq!(player.win_ratio(), 0.5);
    }

    #[test]
    fn new_player_has_zero_ratio() {
        let player = Player::new("bob", Some("bob@example.com".into()));
        let entity: UserEntity = player.into();

        assert_eq!(entity.total_played, 0);
        assert_eq!(entity.win_ratio, 0.0);
    }
}
