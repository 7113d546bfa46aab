use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::models::{GameEntity, ScoreEntity, UserEntity};

/// User as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    // Omitted rather than null so the sparse unique index skips it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    won: i64,
    total_played: i64,
    win_ratio: f64,
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
            won: i64::from(value.won),
            total_played: i64::from(value.total_played),
            win_ratio: value.win_ratio,
        }
    }
}

impl TryFrom<MongoUserDocument> for UserEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoUserDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id)?,
            name: value.name,
            email: value.email,
            won: clamp_count(value.won),
            total_played: clamp_count(value.total_played),
            win_ratio: value.win_ratio,
        })
    }
}

/// Game as stored in the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    answer: String,
    revealed: Vec<Option<String>>,
    attempts_allowed: i64,
    attempts_remaining: i64,
    is_over: bool,
    #[serde(default)]
    move_log: Vec<String>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            answer: value.answer.into_iter().collect(),
            revealed: value
                .revealed
                .into_iter()
                .map(|slot| slot.map(String::from))
                .collect(),
            attempts_allowed: i64::from(value.attempts_allowed),
            attempts_remaining: i64::from(value.attempts_remaining),
            is_over: value.is_over,
            move_log: value.move_log,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoGameDocument> for GameEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoGameDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id)?,
            user_id: parse_id(&value.user_id)?,
            answer: value.answer.chars().collect(),
            revealed: value
                .revealed
                .into_iter()
                .map(|slot| slot.and_then(|letter| letter.chars().next()))
                .collect(),
            attempts_allowed: clamp_count(value.attempts_allowed),
            attempts_remaining: clamp_count(value.attempts_remaining),
            is_over: value.is_over,
            move_log: value.move_log,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

/// Score as stored in the `scores` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    game_id: String,
    date: DateTime,
    won: bool,
    attempts_used: i64,
    attempts_allowed: i64,
}

impl From<ScoreEntity> for MongoScoreDocument {
    fn from(value: ScoreEntity) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            game_id: value.game_id.to_string(),
            date: DateTime::from_system_time(value.date),
            won: value.won,
            attempts_used: i64::from(value.attempts_used),
            attempts_allowed: i64::from(value.attempts_allowed),
        }
    }
}

impl TryFrom<MongoScoreDocument> for ScoreEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoScoreDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&value.id)?,
            user_id: parse_id(&value.user_id)?,
            game_id: parse_id(&value.game_id)?,
            date: value.date.to_system_time(),
            won: value.won,
            attempts_used: clamp_count(value.attempts_used),
            attempts_allowed: clamp_count(value.attempts_allowed),
        })
    }
}

/// Filter matching a document by id.
pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

fn parse_id(raw: &str) -> Result<Uuid, MongoDaoError> {
    Uuid::parse_str(raw).map_err(|_| MongoDaoError::InvalidDocument { id: raw.to_owned() })
}

fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
