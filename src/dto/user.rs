use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::UserEntity;

/// Payload used to register a new player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 64,
        message = "You must enter a user name to create a new user!"
    ))]
    /// Unique player name.
    pub user_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "You must enter an email id to create a new user!"),
        email(message = "The email address is not valid!")
    )]
    /// Unique contact address.
    pub email: String,
}

/// Public view of a player and their record.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    /// Player name.
    pub name: String,
    /// Contact address, if any.
    pub email: Option<String>,
    /// Games won.
    pub won: u32,
    /// Games finished.
    pub total_played: u32,
    /// `won / total_played`, `0.0` before the first finished game.
    pub win_ratio: f64,
}

impl From<UserEntity> for UserSummary {
    fn from(user: UserEntity) -> Self {
        Self {
            name: user.name,
            email: user.email,
            won: user.won,
            total_played: user.total_played,
            win_ratio: user.win_ratio,
        }
    }
}
