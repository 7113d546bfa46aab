/// CouchDB backend.
#[cfg(feature = "couch-store")]
pub mod couchdb;
/// In-memory backend.
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{GameEntity, GameFilter, ScoreEntity, ScoreFilter, UserEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for users, games and scores.
pub trait GameStore: Send + Sync {
    /// Insert or replace a user; name or email clashes yield a conflict.
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a user by id.
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Look up a user by exact name.
    fn find_user_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Look up a user by exact email.
    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Every registered user.
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    /// Insert or replace a game.
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a game by id.
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Games matching `filter`.
    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Remove a game, returning whether it existed.
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Record the outcome of a finished game.
    fn save_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Scores matching `filter`.
    fn list_scores(
        &self,
        filter: ScoreFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Rebuild the backend connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
