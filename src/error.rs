use thiserror::Error;
use uuid::Uuid;

use crate::dao::{models::SheetName, storage::StorageError};

/// Errors that can occur in service layer operations.
///
/// Every variant aborts the whole operation before any mutation becomes
/// externally visible; see [`crate::services::draw_service::draw`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable. Not retried here; the caller decides.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The referenced game does not exist.
    #[error("game `{0}` not found")]
    GameNotFound(Uuid),
    /// The referenced player does not exist.
    #[error("player `{0}` not found")]
    PlayerNotFound(Uuid),
    /// The requested deck has no items left.
    #[error("the {sheet} deck of game `{pbf_id}` is exhausted")]
    DeckExhausted {
        /// Game whose deck ran dry.
        pbf_id: Uuid,
        /// Category of the exhausted deck.
        sheet: SheetName,
    },
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}
