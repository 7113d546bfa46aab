use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_DATABASE: &str = "hangman";
const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// Parsed MongoDB client options plus the database holding the hangman collections.
#[derive(Clone)]
pub struct MongoConfig {
    /// Driver options parsed from the URI.
    pub options: ClientOptions,
    /// Database name.
    pub database_name: String,
}

impl MongoConfig {
    /// Parse `uri`, defaulting the database name when none is given.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let database_name = db_name.unwrap_or(DEFAULT_DATABASE).to_owned();
        let mut options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;
        options.app_name.get_or_insert_with(|| "hangman-back".to_owned());

        Ok(Self {
            options,
            database_name,
        })
    }

    /// Build the configuration from `MONGO_URI` and `MONGO_DB`, both optional.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_URI.to_owned());
        let db = std::env::var("MONGO_DB").ok();
        Self::from_uri(&uri, db.as_deref()).await
    }
}
