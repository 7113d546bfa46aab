use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult, is_duplicate_key},
    models::{MongoGameDocument, MongoScoreDocument, MongoUserDocument, doc_id},
};
use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameFilter, ScoreEntity, ScoreFilter, UserEntity},
    storage::StorageResult,
};

const USER_COLLECTION_NAME: &str = "users";
const GAME_COLLECTION_NAME: &str = "games";
const SCORE_COLLECTION_NAME: &str = "scores";

/// [`GameStore`] backed by MongoDB collections.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;
        info!(database = %config.database_name, "connected to MongoDB");

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let users = database.collection::<Document>(USER_COLLECTION_NAME);
        for (field, index_name) in [("name", "user_name_idx"), ("email", "user_email_idx")] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .name(Some(index_name.to_owned()))
                        .unique(Some(true))
                        .sparse(Some(true))
                        .build(),
                )
                .build();
            users
                .create_index(index)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: USER_COLLECTION_NAME,
                    index: index_name,
                    source,
                })?;
        }

        let games = database.collection::<Document>(GAME_COLLECTION_NAME);
        let game_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "is_over": 1 })
            .options(
                IndexOptions::builder()
                    .name(Some("game_owner_idx".to_owned()))
                    .build(),
            )
            .build();
        games
            .create_index(game_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "user_id,is_over",
                source,
            })?;

        let scores = database.collection::<Document>(SCORE_COLLECTION_NAME);
        let score_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "won": 1 })
            .options(
                IndexOptions::builder()
                    .name(Some("score_owner_idx".to_owned()))
                    .build(),
            )
            .build();
        scores
            .create_index(score_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SCORE_COLLECTION_NAME,
                index: "user_id,won",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn users(&self) -> Collection<MongoUserDocument> {
        self.database().await.collection(USER_COLLECTION_NAME)
    }

    async fn games(&self) -> Collection<MongoGameDocument> {
        self.database().await.collection(GAME_COLLECTION_NAME)
    }

    async fn scores(&self) -> Collection<MongoScoreDocument> {
        self.database().await.collection(SCORE_COLLECTION_NAME)
    }

    async fn save_user(&self, user: UserEntity) -> MongoResult<()> {
        let id = user.id;
        let name = user.name.clone();
        let document: MongoUserDocument = user.into();

        self.users()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| {
                if is_duplicate_key(&source) {
                    MongoDaoError::DuplicateUser { name }
                } else {
                    MongoDaoError::SaveUser { id, source }
                }
            })?;

        Ok(())
    }

    async fn find_user_by(&self, filter: Document) -> MongoResult<Option<UserEntity>> {
        let document = self
            .users()
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::LoadUsers { source })?;

        document.map(TryInto::try_into).transpose()
    }

    async fn list_users(&self) -> MongoResult<Vec<UserEntity>> {
        let documents: Vec<MongoUserDocument> = self
            .users()
            .await
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await
            .map_err(|source| MongoDaoError::LoadUsers { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadUsers { source })?;

        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn save_game(&self, game: GameEntity) -> MongoResult<()> {
        let id = game.id;
        let document: MongoGameDocument = game.into();

        self.games()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveGame { id, source })?;

        Ok(())
    }

    async fn find_game(&self, id: Uuid) -> MongoResult<Option<GameEntity>> {
        let document = self
            .games()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadGame { id, source })?;

        document.map(TryInto::try_into).transpose()
    }

    async fn list_games(&self, filter: GameFilter) -> MongoResult<Vec<GameEntity>> {
        let mut query = doc! {};
        if let Some(user_id) = filter.user_id {
            query.insert("user_id", user_id.to_string());
        }
        if let Some(is_over) = filter.is_over {
            query.insert("is_over", is_over);
        }

        let documents: Vec<MongoGameDocument> = self
            .games()
            .await
            .find(query)
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;

        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_game(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .games()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteGame { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn save_score(&self, score: ScoreEntity) -> MongoResult<()> {
        let id = score.id;
        let document: MongoScoreDocument = score.into();

        self.scores()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveScore { id, source })?;

        Ok(())
    }

    async fn list_scores(&self, filter: ScoreFilter) -> MongoResult<Vec<ScoreEntity>> {
        let mut query = doc! {};
        if let Some(user_id) = filter.user_id {
            query.insert("user_id", user_id.to_string());
        }
        if let Some(won) = filter.won {
            query.insert("won", won);
        }

        let documents: Vec<MongoScoreDocument> = self
            .scores()
            .await
            .find(query)
            .sort(doc! { "date": 1 })
            .await
            .map_err(|source| MongoDaoError::ListScores { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListScores { source })?;

        documents.into_iter().map(TryInto::try_into).collect()
    }
}

impl GameStore for MongoGameStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_user(user).await.map_err(Into::into) })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user_by(doc_id(id)).await.map_err(Into::into) })
    }

    fn find_user_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_user_by(doc! { "name": name })
                .await
                .map_err(Into::into)
        })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_user_by(doc! { "email": email })
                .await
                .map_err(Into::into)
        })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_users().await.map_err(Into::into) })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game(game).await.map_err(Into::into) })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games(filter).await.map_err(Into::into) })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn save_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_score(score).await.map_err(Into::into) })
    }

    fn list_scores(
        &self,
        filter: ScoreFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_scores(filter).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
