use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::{
        document_store::DocumentStore,
        models::{DrawEntity, PbfEntity, SheetName},
    },
    error::ServiceError,
    services::log_service,
    state::SharedState,
};

/// Draw the front item of one category deck and log it.
///
/// One operation covers all categories; `sheet` selects the deck. The
/// protocol is: load the game, pop the deck front, insert the draw record,
/// write the shortened game back, record the public and private log entries,
/// then back-fill the generated draw id and return the draw.
///
/// Draws on the same game are serialized through [`crate::state::AppState::draw_gate`],
/// so two concurrent callers cannot both pop the same item within this
/// process. Instances sharing one database still race each other; the store
/// contract has no conditional update to lean on.
///
/// On failure nothing stays externally visible: errors before the draw
/// insert have no side effect at all, and later failures roll the already
/// persisted pieces back best-effort before the error is returned.
pub async fn draw(
    state: &SharedState,
    pbf_id: Uuid,
    player_id: Uuid,
    sheet: SheetName,
) -> Result<DrawEntity, ServiceError> {
    if pbf_id.is_nil() {
        return Err(ServiceError::InvalidInput("game id must not be nil".into()));
    }
    if player_id.is_nil() {
        return Err(ServiceError::InvalidInput(
            "player id must not be nil".into(),
        ));
    }

    let gate = state.draw_gate(pbf_id);
    let _guard = gate.lock().await;

    let store = state.store();
    let Some(mut pbf) = store.find_pbf(pbf_id).await? else {
        return Err(ServiceError::GameNotFound(pbf_id));
    };
    let before_draw = pbf.clone();

    let Some(item) = pbf.draw_from_deck(sheet) else {
        return Err(ServiceError::DeckExhausted { pbf_id, sheet });
    };

    let mut draw = DrawEntity::new(pbf_id, player_id, item);
    let draw_id = store.insert_draw(draw.clone()).await?;

    if let Err(err) = store.save_pbf(pbf).await {
        undo_draw_insert(&store, draw_id).await;
        return Err(err.into());
    }

    debug!(%pbf_id, %player_id, sheet = %sheet, "drew item and updated game document");

    if let Err(err) = log_service::record_draw(state, &draw).await {
        undo_draw_insert(&store, draw_id).await;
        restore_pbf(&store, before_draw).await;
        return Err(err);
    }

    draw.id = Some(draw_id);
    Ok(draw)
}

/// Best-effort removal of a draw record that belongs to a failed operation.
async fn undo_draw_insert(store: &Arc<dyn DocumentStore>, draw_id: Uuid) {
    if let Err(err) = store.delete_draw(draw_id).await {
        warn!(%draw_id, error = %err, "failed to roll back draw record");
    }
}

/// Best-effort restore of the pre-draw game document.
async fn restore_pbf(store: &Arc<dyn DocumentStore>, pbf: PbfEntity) {
    let pbf_id = pbf.id;
    if let Err(err) = store.save_pbf(pbf).await {
        warn!(%pbf_id, error = %err, "failed to restore game document after aborted draw");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::SystemTime;

    use futures::future::BoxFuture;
    use indexmap::IndexMap;

    use super::*;
    use crate::cache::{CacheConfig, UsernameCache};
    use crate::dao::document_store::memory::MemoryStore;
    use crate::dao::models::{
        GameType, ItemEntity, PlayerEntity, PrivateLogEntity, PublicLogEntity,
    };
    use crate::dao::storage::{StorageError, StorageResult};
    use crate::state::AppState;

    struct Fixture {
        state: SharedState,
        memory: MemoryStore,
        pbf_id: Uuid,
        player_id: Uuid,
    }

    fn fixture(decks: IndexMap<SheetName, Vec<ItemEntity>>) -> Fixture {
        let memory = MemoryStore::new();
        let pbf_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();

        memory.put_player(PlayerEntity {
            id: player_id,
            username: "alice".into(),
        });
        memory.put_pbf(PbfEntity {
            id: pbf_id,
            name: "forum game".into(),
            game_type: GameType::Base,
            created_at: SystemTime::now(),
            player_ids: vec![player_id],
            decks,
        });

        let store: Arc<dyn DocumentStore> = Arc::new(memory.clone());
        let cache = UsernameCache::new(store.clone(), CacheConfig::default());
        Fixture {
            state: AppState::new(store, cache),
            memory,
            pbf_id,
            player_id,
        }
    }

    fn deck(sheet: SheetName, names: &[&str]) -> IndexMap<SheetName, Vec<ItemEntity>> {
        let mut decks = IndexMap::new();
        decks.insert(
            sheet,
            names
                .iter()
                .map(|name| ItemEntity::new(sheet, *name))
                .collect(),
        );
        decks
    }

    #[tokio::test]
    async fn draw_pops_front_and_persists_everything() {
        let f = fixture(deck(
            SheetName::GreatPersons,
            &["Leonardo da Vinci", "Marie Curie", "Plato"],
        ));

        let drawn = draw(&f.state, f.pbf_id, f.player_id, SheetName::GreatPersons)
            .await
            .unwrap();

        assert!(drawn.id.is_some());
        assert_eq!(drawn.item.name, "Leonardo da Vinci");
        assert_eq!(drawn.pbf_id, f.pbf_id);
        assert_eq!(drawn.player_id, f.player_id);

        let pbf = f.memory.pbf(f.pbf_id).unwrap();
        let rest: Vec<_> = pbf
            .deck(SheetName::GreatPersons)
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(rest, ["Marie Curie", "Plato"]);

        assert_eq!(f.memory.draw_count(), 1);
        assert_eq!(f.memory.public_logs().len(), 1);
        assert_eq!(f.memory.private_logs().len(), 1);

        let public = f.memory.public_logs().remove(0);
        let private = f.memory.private_logs().remove(0);
        assert_eq!(public.pbf_id, f.pbf_id);
        assert_eq!(private.pbf_id, f.pbf_id);
        assert_eq!(public.draw.player_id, f.player_id);
        assert!(!public.message.contains("Leonardo"));
        assert!(private.message.contains("Leonardo da Vinci"));
    }

    #[tokio::test]
    async fn every_category_draws_through_the_same_operation() {
        for sheet in SheetName::ALL {
            let f = fixture(deck(sheet, &["front", "back"]));
            let drawn = draw(&f.state, f.pbf_id, f.player_id, sheet).await.unwrap();
            assert_eq!(drawn.item.sheet, sheet);
            assert_eq!(drawn.item.name, "front");
            assert_eq!(f.memory.pbf(f.pbf_id).unwrap().deck(sheet).len(), 1);
        }
    }

    #[tokio::test]
    async fn empty_deck_fails_without_side_effects() {
        let f = fixture(deck(SheetName::Huts, &[]));
        let before = f.memory.pbf(f.pbf_id).unwrap();

        let err = draw(&f.state, f.pbf_id, f.player_id, SheetName::Huts)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::DeckExhausted { sheet, .. } if sheet == SheetName::Huts));
        assert_eq!(f.memory.pbf(f.pbf_id).unwrap(), before);
        assert_eq!(f.memory.draw_count(), 0);
        assert!(f.memory.public_logs().is_empty());
        assert!(f.memory.private_logs().is_empty());
    }

    #[tokio::test]
    async fn unknown_game_fails_without_records() {
        let f = fixture(deck(SheetName::Tiles, &["Desert"]));

        let err = draw(&f.state, Uuid::new_v4(), f.player_id, SheetName::Tiles)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::GameNotFound(_)));
        assert_eq!(f.memory.draw_count(), 0);
        assert!(f.memory.public_logs().is_empty());
    }

    #[tokio::test]
    async fn nil_ids_are_rejected_before_any_effect() {
        let f = fixture(deck(SheetName::Civs, &["Rome"]));

        let err = draw(&f.state, Uuid::nil(), f.player_id, SheetName::Civs)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = draw(&f.state, f.pbf_id, Uuid::nil(), SheetName::Civs)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        assert_eq!(f.memory.pbf(f.pbf_id).unwrap().deck(SheetName::Civs).len(), 1);
        assert_eq!(f.memory.draw_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_draws_never_duplicate_an_item() {
        let f = fixture(deck(SheetName::Infantry, &["Spearmen", "Pikemen", "Riflemen"]));

        let state_a = f.state.clone();
        let state_b = f.state.clone();
        let (pbf_id, player_id) = (f.pbf_id, f.player_id);

        let a = tokio::spawn(async move {
            draw(&state_a, pbf_id, player_id, SheetName::Infantry).await
        });
        let b = tokio::spawn(async move {
            draw(&state_b, pbf_id, player_id, SheetName::Infantry).await
        });

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert_ne!(first.item.name, second.item.name);
        let pbf = f.memory.pbf(f.pbf_id).unwrap();
        assert_eq!(pbf.deck(SheetName::Infantry).len(), 1);
        assert_eq!(f.memory.draw_count(), 2);
        assert_eq!(f.memory.public_logs().len(), 2);
        assert_eq!(f.memory.private_logs().len(), 2);
    }

    /// Store with switchable failure points, to exercise the rollback paths
    /// after the draw record has already been inserted.
    struct FlakyStore {
        inner: MemoryStore,
        fail_saves: AtomicBool,
        fail_private_logs: AtomicBool,
    }

    impl FlakyStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                fail_saves: AtomicBool::new(false),
                fail_private_logs: AtomicBool::new(false),
            }
        }

        fn broken() -> BoxFuture<'static, StorageResult<Uuid>> {
            Box::pin(async {
                Err(StorageError::unavailable(
                    "write failed".into(),
                    std::io::Error::other("write timeout"),
                ))
            })
        }
    }

    impl DocumentStore for FlakyStore {
        fn find_pbf(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PbfEntity>>> {
            self.inner.find_pbf(id)
        }

        fn save_pbf(&self, pbf: PbfEntity) -> BoxFuture<'static, StorageResult<()>> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(StorageError::unavailable(
                        "game save failed".into(),
                        std::io::Error::other("write timeout"),
                    ))
                });
            }
            self.inner.save_pbf(pbf)
        }

        fn insert_draw(&self, draw: DrawEntity) -> BoxFuture<'static, StorageResult<Uuid>> {
            self.inner.insert_draw(draw)
        }

        fn delete_draw(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
            self.inner.delete_draw(id)
        }

        fn find_player(
            &self,
            id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
            self.inner.find_player(id)
        }

        fn insert_public_log(
            &self,
            entry: PublicLogEntity,
        ) -> BoxFuture<'static, StorageResult<Uuid>> {
            self.inner.insert_public_log(entry)
        }

        fn insert_private_log(
            &self,
            entry: PrivateLogEntity,
        ) -> BoxFuture<'static, StorageResult<Uuid>> {
            if self.fail_private_logs.load(Ordering::SeqCst) {
                return Self::broken();
            }
            self.inner.insert_private_log(entry)
        }

        fn delete_public_log(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
            self.inner.delete_public_log(id)
        }
    }

    fn flaky_fixture(store: FlakyStore, pbf_id: Uuid, player_id: Uuid) -> SharedState {
        store.inner.put_player(PlayerEntity {
            id: player_id,
            username: "dave".into(),
        });
        store.inner.put_pbf(PbfEntity {
            id: pbf_id,
            name: "flaky game".into(),
            game_type: GameType::FameAndFortune,
            created_at: SystemTime::now(),
            player_ids: vec![player_id],
            decks: deck(SheetName::Villages, &["Ruins"]),
        });

        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let cache = UsernameCache::new(store.clone(), CacheConfig::default());
        AppState::new(store, cache)
    }

    #[tokio::test]
    async fn failed_game_save_rolls_the_draw_record_back() {
        let memory = MemoryStore::new();
        let flaky = FlakyStore::new(memory.clone());
        flaky.fail_saves.store(true, Ordering::SeqCst);
        let pbf_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let state = flaky_fixture(flaky, pbf_id, player_id);

        let err = draw(&state, pbf_id, player_id, SheetName::Villages)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Unavailable(_)));
        // The draw insert was compensated and the stored game still holds
        // its full deck.
        assert_eq!(memory.draw_count(), 0);
        assert_eq!(
            memory.pbf(pbf_id).unwrap().deck(SheetName::Villages).len(),
            1
        );
        assert!(memory.public_logs().is_empty());
        assert!(memory.private_logs().is_empty());
    }

    #[tokio::test]
    async fn failed_private_log_leaves_no_trace_of_the_draw() {
        let memory = MemoryStore::new();
        let flaky = FlakyStore::new(memory.clone());
        flaky.fail_private_logs.store(true, Ordering::SeqCst);
        let pbf_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let state = flaky_fixture(flaky, pbf_id, player_id);

        let err = draw(&state, pbf_id, player_id, SheetName::Villages)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Unavailable(_)));
        // Draw record, game document, and the already written public log
        // entry are all rolled back.
        assert_eq!(memory.draw_count(), 0);
        assert_eq!(
            memory.pbf(pbf_id).unwrap().deck(SheetName::Villages).len(),
            1
        );
        assert!(memory.public_logs().is_empty());
        assert!(memory.private_logs().is_empty());
    }
}
