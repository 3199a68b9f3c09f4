use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::document_store::DocumentStore;
use crate::dao::models::{DrawEntity, PbfEntity, PlayerEntity, PrivateLogEntity, PublicLogEntity};
use crate::dao::storage::StorageResult;

/// In-process [`DocumentStore`] backend.
///
/// Holds every collection in a [`DashMap`]; insert ids are generated here the
/// same way the database backends assign them. Used by unit tests and by
/// callers embedding the core without a database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

#[derive(Default)]
struct Collections {
    pbfs: DashMap<Uuid, PbfEntity>,
    draws: DashMap<Uuid, DrawEntity>,
    players: DashMap<Uuid, PlayerEntity>,
    public_logs: DashMap<Uuid, PublicLogEntity>,
    private_logs: DashMap<Uuid, PrivateLogEntity>,
}

impl MemoryStore {
    /// Fresh store with empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a game document. Setup flows live outside this crate, so the
    /// memory backend exposes direct upserts for fixtures.
    pub fn put_pbf(&self, pbf: PbfEntity) {
        self.inner.pbfs.insert(pbf.id, pbf);
    }

    /// Seed a player document.
    pub fn put_player(&self, player: PlayerEntity) {
        self.inner.players.insert(player.id, player);
    }

    /// Current state of a game document, if present.
    pub fn pbf(&self, id: Uuid) -> Option<PbfEntity> {
        self.inner.pbfs.get(&id).map(|entry| entry.clone())
    }

    /// Number of persisted draw records.
    pub fn draw_count(&self) -> usize {
        self.inner.draws.len()
    }

    /// All public log entries, in no particular order.
    pub fn public_logs(&self) -> Vec<PublicLogEntity> {
        self.inner
            .public_logs
            .iter()
            .map(|entry| entry.clone())
            .collect()
    }

    /// All private log entries, in no particular order.
    pub fn private_logs(&self) -> Vec<PrivateLogEntity> {
        self.inner
            .private_logs
            .iter()
            .map(|entry| entry.clone())
            .collect()
    }
}

impl DocumentStore for MemoryStore {
    fn find_pbf(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PbfEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.pbfs.get(&id).map(|entry| entry.clone())) })
    }

    fn save_pbf(&self, pbf: PbfEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.pbfs.insert(pbf.id, pbf);
            Ok(())
        })
    }

    fn insert_draw(&self, draw: DrawEntity) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move {
            let id = Uuid::new_v4();
            store.inner.draws.insert(id, DrawEntity { id: Some(id), ..draw });
            Ok(id)
        })
    }

    fn delete_draw(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.draws.remove(&id).is_some()) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.players.get(&id).map(|entry| entry.clone())) })
    }

    fn insert_public_log(
        &self,
        entry: PublicLogEntity,
    ) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move {
            let id = Uuid::new_v4();
            store
                .inner
                .public_logs
                .insert(id, PublicLogEntity { id: Some(id), ..entry });
            Ok(id)
        })
    }

    fn insert_private_log(
        &self,
        entry: PrivateLogEntity,
    ) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move {
            let id = Uuid::new_v4();
            store
                .inner
                .private_logs
                .insert(id, PrivateLogEntity { id: Some(id), ..entry });
            Ok(id)
        })
    }

    fn delete_public_log(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.public_logs.remove(&id).is_some()) })
    }
}
