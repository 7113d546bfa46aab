//! Process-local [`GameStore`] used for local runs and tests.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameFilter, ScoreEntity, ScoreFilter, UserEntity},
    storage::{StorageError, StorageResult},
};

/// In-memory store keeping every entity in concurrent maps.
///
/// Unique user names and emails are enforced on write so the behaviour matches
/// the indexed backends.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: DashMap<Uuid, UserEntity>,
    games: DashMap<Uuid, GameEntity>,
    scores: DashMap<Uuid, ScoreEntity>,
}

impl MemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn save_user(&self, user: UserEntity) -> StorageResult<()> {
        let clash = self.inner.users.iter().find(|entry| {
            entry.id != user.id
                && (entry.name == user.name
                    || (entry.email.is_some() && entry.email == user.email))
        });
        if let Some(existing) = clash {
            return Err(StorageError::conflict(format!(
                "user `{}` clashes with existing user `{}`",
                user.name, existing.name
            )));
        }

        self.inner.users.insert(user.id, user);
        Ok(())
    }

    fn find_user_where(&self, predicate: impl Fn(&UserEntity) -> bool) -> Option<UserEntity> {
        self.inner
            .users
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    fn list_games(&self, filter: GameFilter) -> Vec<GameEntity> {
        let mut games = self
            .inner
            .games
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect::<Vec<_>>();
        games.sort_by_key(|game| game.created_at);
        games
    }

    fn list_scores(&self, filter: ScoreFilter) -> Vec<ScoreEntity> {
        let mut scores = self
            .inner
            .scores
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect::<Vec<_>>();
        scores.sort_by_key(|score| score.date);
        scores
    }
}

impl GameStore for MemoryGameStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_user(user) })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.users.get(&id).map(|entry| entry.value().clone())) })
    }

    fn find_user_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.find_user_where(|user| user.name == name)) })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store.find_user_where(|user| user.email.as_deref() == Some(email.as_str())))
        })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut users = store
                .inner
                .users
                .iter()
                .map(|entry| entry.value().clone())
                .collect::<Vec<_>>();
            users.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(users)
        })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.games.insert(game.id, game);
            Ok(())
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.get(&id).map(|entry| entry.value().clone())) })
    }

    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_games(filter)) })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.remove(&id).is_some()) })
    }

    fn save_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.scores.insert(score.id, score);
            Ok(())
        })
    }

    fn list_scores(
        &self,
        filter: ScoreFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_scores(filter)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;

    fn user(name: &str, email: &str) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            email: Some(email.into()),
            won: 0,
            total_played: 0,
            win_ratio: 0.0,
        }
    }

    fn game(user_id: Uuid, is_over: bool, offset_secs: u64) -> GameEntity {
        let created_at = SystemTime::UNIX_EPOCH + Duration::from_secs(offset_secs);
        GameEntity {
            id: Uuid::new_v4(),
            user_id,
            answer: vec!['a'],
            revealed: vec![None],
            attempts_allowed: 6,
            attempts_remaining: 6,
            is_over,
            move_log: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_name_and_email() {
        let store = MemoryGameStore::new();
        GameStore::save_user(&store, user("ada", "ada@example.com"))
            .await
            .unwrap();

        let same_name = GameStore::save_user(&store, user("ada", "other@example.com")).await;
        assert!(matches!(same_name, Err(StorageError::Conflict { .. })));

        let same_email = GameStore::save_user(&store, user("bob", "ada@example.com")).await;
        assert!(matches!(same_email, Err(StorageError::Conflict { .. })));
    }

    #[tokio::test]
    async fn updating_a_user_is_not_a_conflict() {
        let store = MemoryGameStore::new();
        let mut ada = user("ada", "ada@example.com");
        GameStore::save_user(&store, ada.clone()).await.unwrap();

        ada.won = 1;
        ada.total_played = 1;
        GameStore::save_user(&store, ada.clone()).await.unwrap();

        let found = store.find_user_by_name("ada".into()).await.unwrap();
        assert_eq!(found, Some(ada));
    }

    #[tokio::test]
    async fn lists_games_matching_filter_in_creation_order() {
        let store = MemoryGameStore::new();
        let ada = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let first = game(ada, false, 1);
        let second = game(ada, false, 2);
        GameStore::save_game(&store, second.clone()).await.unwrap();
        GameStore::save_game(&store, first.clone()).await.unwrap();
        GameStore::save_game(&store, game(ada, true, 3)).await.unwrap();
        GameStore::save_game(&store, game(bob, false, 4)).await.unwrap();

        let active = GameStore::list_games(&store, GameFilter::active_for(ada))
            .await
            .unwrap();
        assert_eq!(active, vec![first, second]);

        let all_active = GameStore::list_games(&store, GameFilter::active())
            .await
            .unwrap();
        assert_eq!(all_active.len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_whether_game_existed() {
        let store = MemoryGameStore::new();
        let entity = game(Uuid::new_v4(), false, 1);
        GameStore::save_game(&store, entity.clone()).await.unwrap();

        assert!(store.delete_game(entity.id).await.unwrap());
        assert!(!store.delete_game(entity.id).await.unwrap());
    }
}
