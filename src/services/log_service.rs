use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{DrawEntity, PrivateLogEntity, PublicLogEntity},
    error::ServiceError,
    state::SharedState,
};

/// Record the paired log entries for a completed draw.
///
/// The public entry names only the item's category; the private entry names
/// the item and starts with `reveal` unset. Both reference the same game and
/// carry the acting player's resolved username. Returns the persisted
/// entries with their generated ids attached.
///
/// The entries are written as a pair or not at all: when the private insert
/// fails, the already persisted public entry is removed again before the
/// error is returned, so no log ever announces a draw that did not complete.
pub async fn record_draw(
    state: &SharedState,
    draw: &DrawEntity,
) -> Result<(PublicLogEntity, PrivateLogEntity), ServiceError> {
    let username = resolve_username(state, draw.player_id).await?;

    let mut public = PublicLogEntity::for_draw(draw, username.clone());
    let public_id = state.store().insert_public_log(public.clone()).await?;
    public.id = Some(public_id);

    let mut private = PrivateLogEntity::for_draw(draw, username);
    match state.store().insert_private_log(private.clone()).await {
        Ok(id) => private.id = Some(id),
        Err(err) => {
            undo_public_log_insert(state, public_id).await;
            return Err(err.into());
        }
    }

    Ok((public, private))
}

/// Best-effort removal of a public log entry whose private half was never
/// recorded.
async fn undo_public_log_insert(state: &SharedState, public_id: Uuid) {
    if let Err(err) = state.store().delete_public_log(public_id).await {
        warn!(%public_id, error = %err, "failed to roll back public log entry");
    }
}

/// Resolve a username through the cache, falling back to a direct player
/// lookup when the cache fails for any reason. The cache failure itself is
/// recovered here and never reaches the caller.
async fn resolve_username(state: &SharedState, player_id: Uuid) -> Result<String, ServiceError> {
    match state.username_cache().get(player_id).await {
        Ok(username) => Ok(username),
        Err(err) => {
            warn!(
                %player_id,
                error = %err,
                "could not resolve username from cache; falling back to player store"
            );
            let player = state
                .store()
                .find_player(player_id)
                .await?
                .ok_or(ServiceError::PlayerNotFound(player_id))?;
            Ok(player.username)
        }
    }
}
