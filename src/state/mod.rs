//! Shared dependency container handed to the service functions.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::cache::UsernameCache;
use crate::dao::document_store::DocumentStore;

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the document store handle, the username cache,
/// and one draw gate per game.
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    username_cache: UsernameCache,
    draw_gates: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The cache is injected rather than built here so callers control its
    /// bounds and, in tests, its backing store.
    pub fn new(store: Arc<dyn DocumentStore>, username_cache: UsernameCache) -> SharedState {
        Arc::new(Self {
            store,
            username_cache,
            draw_gates: DashMap::new(),
        })
    }

    /// Handle to the document store.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    /// The username resolver cache.
    pub fn username_cache(&self) -> &UsernameCache {
        &self.username_cache
    }

    /// Mutex serializing draw read-modify-write cycles on one game.
    ///
    /// Gates are created on first use; while a gate is held out, the same
    /// game id maps to the same gate on every call. Entries nobody holds a
    /// handle to anymore are pruned on access, so the registry stays
    /// proportional to the games drawing right now rather than every game
    /// ever seen.
    pub fn draw_gate(&self, pbf_id: Uuid) -> Arc<Mutex<()>> {
        self.draw_gates
            .retain(|_, gate| Arc::strong_count(gate) > 1);
        self.draw_gates
            .entry(pbf_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::{CacheConfig, UsernameCache};
    use crate::dao::document_store::memory::MemoryStore;

    fn state() -> SharedState {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let cache = UsernameCache::new(
            store.clone(),
            CacheConfig {
                capacity: 10,
                ttl: Duration::from_secs(60),
            },
        );
        AppState::new(store, cache)
    }

    #[test]
    fn held_gates_are_stable_across_calls() {
        let state = state();
        let game_a = Uuid::new_v4();
        let game_b = Uuid::new_v4();

        let gate_a = state.draw_gate(game_a);
        let _gate_b = state.draw_gate(game_b);

        assert_eq!(state.draw_gates.len(), 2);
        assert!(Arc::ptr_eq(&gate_a, &state.draw_gate(game_a)));
    }

    #[test]
    fn released_gates_are_pruned_on_access() {
        let state = state();

        drop(state.draw_gate(Uuid::new_v4()));
        drop(state.draw_gate(Uuid::new_v4()));

        let _live = state.draw_gate(Uuid::new_v4());
        assert_eq!(state.draw_gates.len(), 1);
    }
}
