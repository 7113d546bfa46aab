use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use tracing::info;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameFilter, ScoreEntity, ScoreFilter, UserEntity},
    storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{AllDocsResponse, CouchDocument, CouchEntity, END_SUFFIX, RevisionOnly},
};

/// [`GameStore`] backed by a CouchDB database over HTTP.
#[derive(Clone)]
pub struct CouchGameStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchGameStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            database: Arc::from(config.database),
            auth: config
                .credentials
                .map(|(user, pass)| (Arc::from(user), Arc::from(pass))),
        };

        store.ensure_database().await?;
        info!(database = %store.database, "connected to CouchDB");
        Ok(store)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.database, path);
        self.authorize(self.client.request(method, url))
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    async fn send(&self, builder: reqwest::RequestBuilder, path: &str) -> CouchResult<reqwest::Response> {
        builder
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: path.to_string(),
                source,
            })
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let url = self.database_url();
        let response = self.send(self.authorize(self.client.get(&url)), &url).await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self.send(self.authorize(self.client.put(&url)), &url).await?;
                // 412 means a concurrent creator won the race.
                if create.status().is_success() || create.status() == StatusCode::PRECONDITION_FAILED
                {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database: self.database.to_string(),
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database: self.database.to_string(),
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::GET, doc_id), doc_id).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn current_revision(&self, doc_id: &str) -> CouchResult<Option<String>> {
        Ok(self
            .get_document::<RevisionOnly>(doc_id)
            .await?
            .map(|doc| doc.rev))
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .send(self.request(Method::PUT, doc_id).json(document), doc_id)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: response.status(),
            })
        }
    }

    async fn list_documents<T>(&self, prefix: &str) -> CouchResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .send(self.request(Method::GET, ALL_DOCS).query(&query), ALL_DOCS)
            .await?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        payload
            .rows
            .into_iter()
            .filter_map(|row| row.doc)
            .map(|doc| {
                from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                    path: ALL_DOCS.to_string(),
                    source,
                })
            })
            .collect()
    }

    async fn save<E: CouchEntity>(&self, entity: E) -> CouchResult<()> {
        let doc_id = E::doc_id(entity.id());
        let rev = self.current_revision(&doc_id).await?;
        self.put_document(&doc_id, &entity.into_document(rev)).await
    }

    async fn find<E: CouchEntity>(&self, id: Uuid) -> CouchResult<Option<E>> {
        self.get_document::<CouchDocument<E::Body>>(&E::doc_id(id))
            .await?
            .map(E::try_from_document)
            .transpose()
    }

    async fn list<E: CouchEntity>(&self) -> CouchResult<Vec<E>> {
        self.list_documents::<CouchDocument<E::Body>>(E::PREFIX)
            .await?
            .into_iter()
            .map(E::try_from_document)
            .collect()
    }

    async fn save_user(&self, user: UserEntity) -> CouchResult<()> {
        // CouchDB has no secondary unique index, so uniqueness is checked before writing.
        let clash = self.list::<UserEntity>().await?.into_iter().any(|existing| {
            existing.id != user.id
                && (existing.name == user.name
                    || (existing.email.is_some() && existing.email == user.email))
        });
        if clash {
            return Err(CouchDaoError::DuplicateUser { name: user.name });
        }
        self.save(user).await
    }

    async fn find_user_where(
        &self,
        predicate: impl Fn(&UserEntity) -> bool,
    ) -> CouchResult<Option<UserEntity>> {
        Ok(self
            .list::<UserEntity>()
            .await?
            .into_iter()
            .find(|user| predicate(user)))
    }

    async fn delete_game(&self, id: Uuid) -> CouchResult<bool> {
        let doc_id = GameEntity::doc_id(id);
        let Some(rev) = self.current_revision(&doc_id).await? else {
            return Ok(false);
        };

        let response = self
            .send(
                self.request(Method::DELETE, &doc_id).query(&[("rev", rev)]),
                &doc_id,
            )
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(CouchDaoError::RequestStatus {
                path: doc_id,
                status,
            }),
        }
    }

    async fn health_check(&self) -> CouchResult<()> {
        let url = self.database_url();
        let response = self.send(self.authorize(self.client.get(&url)), &url).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: url,
                status: response.status(),
            })
        }
    }
}

impl GameStore for CouchGameStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_user(user).await.map_err(Into::into) })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find::<UserEntity>(id).await.map_err(Into::into) })
    }

    fn find_user_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_user_where(|user| user.name == name)
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
                .find_user_where(|user| user.email.as_deref() == Some(email.as_str()))
                .await
                .map_err(Into::into)
        })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut users = store.list::<UserEntity>().await?;
            users.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(users)
        })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save(game).await.map_err(Into::into) })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find::<GameEntity>(id).await.map_err(Into::into) })
    }

    fn list_games(&self, filter: GameFilter) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut games = store
                .list::<GameEntity>()
                .await?
                .into_iter()
                .filter(|game| filter.matches(game))
                .collect::<Vec<_>>();
            games.sort_by_key(|game| game.created_at);
            Ok(games)
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn save_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save(score).await.map_err(Into::into) })
    }

    fn list_scores(
        &self,
        filter: ScoreFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut scores = store
                .list::<ScoreEntity>()
                .await?
                .into_iter()
                .filter(|score| filter.matches(score))
                .collect::<Vec<_>>();
            scores.sort_by_key(|score| score.date);
            Ok(scores)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.health_check().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
