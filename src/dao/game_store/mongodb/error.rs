use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB backend operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Failures raised by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    /// Client could not be built.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    /// Server unreachable at startup.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    /// Periodic ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    /// Name or email already taken.
    #[error("user `{name}` violates a unique index")]
    DuplicateUser { name: String },
    /// User write failed.
    #[error("failed to save user `{id}`")]
    SaveUser {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    /// User query failed.
    #[error("failed to load users")]
    LoadUsers {
        #[source]
        source: MongoError,
    },
    /// Game write failed.
    #[error("failed to save game `{id}`")]
    SaveGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    /// Game read failed.
    #[error("failed to load game `{id}`")]
    LoadGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    /// Game query failed.
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: MongoError,
    },
    /// Game delete failed.
    #[error("failed to delete game `{id}`")]
    DeleteGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    /// Score write failed.
    #[error("failed to save score `{id}`")]
    SaveScore {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    /// Score query failed.
    #[error("failed to list scores")]
    ListScores {
        #[source]
        source: MongoError,
    },
    /// Stored id is not a uuid.
    #[error("stored document `{id}` has an invalid identifier")]
    InvalidDocument { id: String },
}

/// Whether `err` was raised by a unique index rejecting the write.
pub fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
