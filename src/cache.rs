//! Username resolution backed by a size- and TTL-bounded cache.
//!
//! The cache is constructed explicitly and handed to the components that
//! need it; there is no process-wide access point. On a miss it loads
//! through the player store. Callers that cannot tolerate a cache failure
//! fall back to a direct player lookup instead of propagating [`CacheError`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::dao::{document_store::DocumentStore, storage::StorageError};

/// Construction-time cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached usernames.
    pub capacity: usize,
    /// How long an entry stays valid after it was written.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl: Duration::from_secs(2 * 60 * 60),
        }
    }
}

/// Failure local to the resolver; never surfaced past the Log Recorder.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Loading through the player store failed.
    #[error("username cache load failed")]
    Load(#[source] StorageError),
    /// The player store has no document for this id.
    #[error("no player found for id `{0}`")]
    UnknownPlayer(Uuid),
}

struct CacheEntry {
    username: String,
    written_at: Instant,
}

/// Maps player ids to usernames, loading through the player store on miss.
pub struct UsernameCache {
    store: Arc<dyn DocumentStore>,
    entries: DashMap<Uuid, CacheEntry>,
    config: CacheConfig,
}

impl UsernameCache {
    /// Build a cache loading through `store` with the given bounds.
    pub fn new(store: Arc<dyn DocumentStore>, config: CacheConfig) -> Self {
        Self {
            store,
            entries: DashMap::new(),
            config,
        }
    }

    /// Resolve a username, serving fresh entries without touching the store.
    pub async fn get(&self, player_id: Uuid) -> Result<String, CacheError> {
        if let Some(entry) = self.entries.get(&player_id)
            && entry.written_at.elapsed() < self.config.ttl
        {
            return Ok(entry.username.clone());
        }

        let player = self
            .store
            .find_player(player_id)
            .await
            .map_err(CacheError::Load)?
            .ok_or(CacheError::UnknownPlayer(player_id))?;

        debug!(%player_id, "username cache miss; loaded from player store");
        self.insert(player_id, player.username.clone());
        Ok(player.username)
    }

    /// Write an entry, evicting stale then oldest entries past capacity.
    pub fn insert(&self, player_id: Uuid, username: String) {
        if self.entries.len() >= self.config.capacity && !self.entries.contains_key(&player_id) {
            self.evict_one();
        }

        self.entries.insert(
            player_id,
            CacheEntry {
                username,
                written_at: Instant::now(),
            },
        );
    }

    /// Number of currently cached entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_one(&self) {
        let mut victim: Option<(Uuid, Instant)> = None;
        for entry in self.entries.iter() {
            if entry.written_at.elapsed() >= self.config.ttl {
                victim = Some((*entry.key(), entry.written_at));
                break;
            }
            match victim {
                Some((_, oldest)) if oldest <= entry.written_at => {}
                _ => victim = Some((*entry.key(), entry.written_at)),
            }
        }

        if let Some((key, _)) = victim {
            self.entries.remove(&key);
        }
    }
}
