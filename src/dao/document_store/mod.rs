/// In-process backend for tests and embedded use.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{DrawEntity, PbfEntity, PlayerEntity, PrivateLogEntity, PublicLogEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for games, draws, players, and logs.
///
/// Inserts return the store-assigned id of the new document.
pub trait DocumentStore: Send + Sync {
    /// Fetch a game document by id.
    fn find_pbf(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PbfEntity>>>;
    /// Write a game document back, keyed by its id.
    fn save_pbf(&self, pbf: PbfEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Insert a draw record and return its generated id.
    fn insert_draw(&self, draw: DrawEntity) -> BoxFuture<'static, StorageResult<Uuid>>;
    /// Remove a draw record; used to compensate a failed draw operation.
    fn delete_draw(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Fetch a player by id.
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Insert a public log entry and return its generated id.
    fn insert_public_log(
        &self,
        entry: PublicLogEntity,
    ) -> BoxFuture<'static, StorageResult<Uuid>>;
    /// Insert a private log entry and return its generated id.
    fn insert_private_log(
        &self,
        entry: PrivateLogEntity,
    ) -> BoxFuture<'static, StorageResult<Uuid>>;
    /// Remove a public log entry; used to compensate a failed draw operation
    /// whose private half was never recorded.
    fn delete_public_log(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
}
