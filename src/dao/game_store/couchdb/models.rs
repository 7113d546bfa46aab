use std::time::SystemTime;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::{
    game_store::couchdb::error::CouchDaoError,
    models::{GameEntity, ScoreEntity, UserEntity},
};

/// Upper bound appended to a prefix for `_all_docs` range queries.
pub const END_SUFFIX: &str = "\u{ffff}";

/// Body of an `_all_docs` response.
#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    /// Matching rows in key order.
    pub rows: Vec<AllDocsRow>,
}

/// One `_all_docs` row.
#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    /// Document id.
    pub id: String,
    /// Full document when `include_docs` is set.
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Minimal projection used to read the revision of an existing document.
#[derive(Debug, Deserialize)]
pub struct RevisionOnly {
    /// Current revision.
    #[serde(rename = "_rev")]
    pub rev: String,
}

/// Envelope adding CouchDB's `_id`/`_rev` bookkeeping to an entity body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchDocument<T> {
    /// Prefixed document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Revision, absent on first write.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Entity fields stored at the top level.
    #[serde(flatten)]
    pub body: T,
}

/// Mapping between a storage entity and its CouchDB document.
pub trait CouchEntity: Sized {
    /// Prefix shared by every document of this kind, used for `_all_docs` ranges.
    const PREFIX: &'static str;
    type Body: Serialize + DeserializeOwned + Send;

    fn id(&self) -> Uuid;
    fn into_body(self) -> Self::Body;
    fn from_body(id: Uuid, body: Self::Body) -> Self;

    fn doc_id(id: Uuid) -> String {
        format!("{}{}", Self::PREFIX, id)
    }

    fn into_document(self, rev: Option<String>) -> CouchDocument<Self::Body> {
        CouchDocument {
            id: Self::doc_id(self.id()),
            rev,
            body: self.into_body(),
        }
    }

    fn try_from_document(doc: CouchDocument<Self::Body>) -> Result<Self, CouchDaoError> {
        let id = extract_uuid(&doc.id)?;
        Ok(Self::from_body(id, doc.body))
    }
}

/// Stored fields of a user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    /// Unique user name.
    pub name: String,
    /// Contact address for reminders.
    pub email: Option<String>,
    /// Games won.
    pub won: u32,
    /// Games finished.
    pub total_played: u32,
    /// `won / total_played`.
    pub win_ratio: f64,
}

impl CouchEntity for UserEntity {
    const PREFIX: &'static str = "user::";
    type Body = UserBody;

    fn id(&self) -> Uuid {
        self.id
    }

    fn into_body(self) -> UserBody {
        UserBody {
            name: self.name,
            email: self.email,
            won: self.won,
            total_played: self.total_played,
            win_ratio: self.win_ratio,
        }
    }

    fn from_body(id: Uuid, body: UserBody) -> Self {
        Self {
            id,
            name: body.name,
            email: body.email,
            won: body.won,
            total_played: body.total_played,
            win_ratio: body.win_ratio,
        }
    }
}

/// Stored fields of a game document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBody {
    /// Owner of the game.
    pub user_id: Uuid,
    /// Secret word.
    pub answer: String,
    /// Letters found so far, by position.
    pub revealed: Vec<Option<char>>,
    /// Wrong-guess budget.
    pub attempts_allowed: u32,
    /// Wrong guesses left.
    pub attempts_remaining: u32,
    /// Whether the game finished.
    pub is_over: bool,
    /// Moves that changed the game, oldest first.
    #[serde(default)]
    pub move_log: Vec<String>,
    /// Creation time.
    pub created_at: SystemTime,
    /// Time of the last move.
    pub updated_at: SystemTime,
}

impl CouchEntity for GameEntity {
    const PREFIX: &'static str = "game::";
    type Body = GameBody;

    fn id(&self) -> Uuid {
        self.id
    }

    fn into_body(self) -> GameBody {
        GameBody {
            user_id: self.user_id,
            answer: self.answer.into_iter().collect(),
            revealed: self.revealed,
            attempts_allowed: self.attempts_allowed,
            attempts_remaining: self.attempts_remaining,
            is_over: self.is_over,
            move_log: self.move_log,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn from_body(id: Uuid, body: GameBody) -> Self {
        Self {
            id,
            user_id: body.user_id,
            answer: body.answer.chars().collect(),
            revealed: body.revealed,
            attempts_allowed: body.attempts_allowed,
            attempts_remaining: body.attempts_remaining,
            is_over: body.is_over,
            move_log: body.move_log,
            created_at: body.created_at,
            updated_at: body.updated_at,
        }
    }
}

/// Stored fields of a score document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBody {
    /// Player who finished the game.
    pub user_id: Uuid,
    /// Game the score belongs to.
    pub game_id: Uuid,
    /// Time the game finished.
    pub date: SystemTime,
    /// Whether the game was won.
    pub won: bool,
    /// Wrong guesses spent.
    pub attempts_used: u32,
    /// Wrong-guess budget of the game.
    pub attempts_allowed: u32,
}

impl CouchEntity for ScoreEntity {
    const PREFIX: &'static str = "score::";
    type Body = ScoreBody;

    fn id(&self) -> Uuid {
        self.id
    }

    fn into_body(self) -> ScoreBody {
        ScoreBody {
            user_id: self.user_id,
            game_id: self.game_id,
            date: self.date,
            won: self.won,
            attempts_used: self.attempts_used,
            attempts_allowed: self.attempts_allowed,
        }
    }

    fn from_body(id: Uuid, body: ScoreBody) -> Self {
        Self {
            id,
            user_id: body.user_id,
            game_id: body.game_id,
            date: body.date,
            won: body.won,
            attempts_used: body.attempts_used,
            attempts_allowed: body.attempts_allowed,
        }
    }
}

/// Parse the uuid part of a `kind::uuid` document id.
pub fn extract_uuid(doc_id: &str) -> Result<Uuid, CouchDaoError> {
    let (_, id) = doc_id
        .split_once("::")
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing separator",
        })?;

    Uuid::parse_str(id).map_err(|_| CouchDaoError::InvalidDocId {
        doc_id: doc_id.to_string(),
        kind: "invalid UUID",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_document_round_trips_through_json() {
        let now = SystemTime::now();
        let game = GameEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            answer: "ruby".chars().collect(),
            revealed: vec![Some('r'), None, None, None],
            attempts_allowed: 6,
            attempts_remaining: 5,
            is_over: false,
            move_log: vec!["Guess: r, Result: Correct! You got r___".into()],
            created_at: now,
            updated_at: now,
        };

        let document = game.clone().into_document(Some("1-abc".into()));
        assert_eq!(document.id, format!("game::{}", game.id));

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["_rev"], "1-abc");
        assert_eq!(json["answer"], "ruby");

        let parsed: CouchDocument<GameBody> = serde_json::from_value(json).unwrap();
        assert_eq!(GameEntity::try_from_document(parsed).unwrap(), game);
    }

    #[test]
    fn rejects_document_ids_without_uuid() {
        assert!(extract_uuid("user::not-a-uuid").is_err());
        assert!(extract_uuid("missing-separator").is_err());
    }
}
