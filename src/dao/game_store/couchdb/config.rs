use super::error::{CouchDaoError, CouchResult};

const DEFAULT_DATABASE: &str = "hangman";

/// Runtime configuration describing how to connect to CouchDB.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server URL without trailing slash.
    pub base_url: String,
    /// Database holding users, games and scores.
    pub database: String,
    /// Basic auth user and password.
    pub credentials: Option<(String, String)>,
}

impl CouchConfig {
    /// Construct a configuration from explicit base URL and database name.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            credentials: None,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Build a configuration from `COUCH_BASE_URL` (required), `COUCH_DB` and
    /// the optional `COUCH_USERNAME`/`COUCH_PASSWORD` pair.
    pub fn from_env() -> CouchResult<Self> {
        let base_url =
            std::env::var("COUCH_BASE_URL").map_err(|_| CouchDaoError::MissingEnvVar {
                var: "COUCH_BASE_URL",
            })?;
        let database = std::env::var("COUCH_DB").unwrap_or_else(|_| DEFAULT_DATABASE.into());

        let config = Self::new(base_url, database);
        match (
            std::env::var("COUCH_USERNAME").ok(),
            std::env::var("COUCH_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Ok(config.with_credentials(username, password)),
            _ => Ok(config),
        }
    }
}
