//! Draw-and-log core for the civilization play-by-forum backend.
//!
//! Players draw cards and tiles from shared per-game decks; every successful
//! draw is persisted and mirrored into a public (redacted) and a private
//! (revealed) log entry. The HTTP resource layer, authentication, and game
//! onboarding live in the outer crate and consume this one through
//! [`state::AppState`].

pub mod cache;
/// Persistence layer: entities, store abstraction, and backends.
pub mod dao;
/// Service-layer error taxonomy.
pub mod error;
/// Draw engine and log recorder.
pub mod services;
pub mod state;
