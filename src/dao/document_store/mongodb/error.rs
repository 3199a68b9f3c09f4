use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::storage::StorageError;

/// Result alias for MongoDB backend operations.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Errors raised by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A required environment variable was absent.
    #[error("missing environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// The client could not be built from the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The deployment never answered the initial ping.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Driver error of the last attempt.
        #[source]
        source: MongoError,
    },
    /// Index creation failed during connect.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Indexed field(s).
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A game document could not be written.
    #[error("failed to save game `{id}`")]
    SavePbf {
        /// Game id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A game document could not be read.
    #[error("failed to load game `{id}`")]
    LoadPbf {
        /// Game id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A draw record could not be inserted.
    #[error("failed to insert draw for game `{pbf_id}`")]
    InsertDraw {
        /// Game the draw belongs to.
        pbf_id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A draw record could not be deleted.
    #[error("failed to delete draw `{id}`")]
    DeleteDraw {
        /// Draw id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A player document could not be read.
    #[error("failed to load player `{id}`")]
    LoadPlayer {
        /// Player id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A log entry could not be inserted.
    #[error("failed to insert log entry into `{collection}`")]
    InsertLog {
        /// Target log collection.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A log entry could not be deleted.
    #[error("failed to delete log entry `{id}` from `{collection}`")]
    DeleteLog {
        /// Log entry id.
        id: Uuid,
        /// Target log collection.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
