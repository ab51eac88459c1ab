use tracing::{info, warn};

use crate::{
    config::AppConfig,
    dao::{
        models::{PersistedGames, PersistedState, SNAPSHOT_VERSION},
        snapshot::SnapshotStore,
        storage::StorageError,
    },
    state::{SessionRegistry, SharedState, game::GameSession},
};

/// Rebuild the registry from the local snapshot.
///
/// A missing snapshot yields an empty registry. A corrupt one is moved aside through
/// [`SnapshotStore::set_aside`] and the registry starts empty; other read failures also start
/// empty and leave the file untouched.
pub async fn restore(config: &AppConfig, store: &dyn SnapshotStore) -> SessionRegistry {
    let limits = config.limits();
    match store.load().await {
        Ok(Some(snapshot)) => {
            if snapshot.version > SNAPSHOT_VERSION {
                warn!(
                    version = snapshot.version,
                    supported = SNAPSHOT_VERSION,
                    "snapshot written by a newer version; reading it anyway"
                );
            }
            let PersistedGames {
                games,
                current_game_id,
            } = snapshot.state;
            let sessions: Vec<GameSession> = games
                .into_iter()
                .map(GameSession::from)
                .filter_map(sanitize)
                .collect();
            let registry = SessionRegistry::restore(limits, sessions, current_game_id);
            info!(
                sessions = registry.len(),
                current = ?registry.current_id(),
                "restored sessions from snapshot"
            );
            registry
        }
        Ok(None) => {
            info!("no snapshot found; starting with an empty session collection");
            SessionRegistry::new(limits)
        }
        Err(err @ StorageError::Corrupt { .. }) => {
            warn!(error = %err, "snapshot is corrupt; starting with an empty session collection");
            match store.set_aside().await {
                Ok(Some(location)) => warn!(%location, "corrupt snapshot moved aside"),
                Ok(None) => {}
                Err(err) => warn!(
                    error = %err,
                    "could not move corrupt snapshot aside; the next save will replace it"
                ),
            }
            SessionRegistry::new(limits)
        }
        Err(err) => {
            warn!(error = %err, "failed to load snapshot; starting with an empty session collection");
            SessionRegistry::new(limits)
        }
    }
}

fn sanitize(mut session: GameSession) -> Option<GameSession> {
    if session.course.is_empty() || session.players.is_empty() {
        warn!(
            session_id = %session.id,
            "dropping persisted session without course or players"
        );
        return None;
    }
    if session.current_hole_index > session.last_hole_index() {
        warn!(
            session_id = %session.id,
            index = session.current_hole_index,
            "persisted hole pointer out of range; clamping to the last hole"
        );
        session.current_hole_index = session.last_hole_index();
    }
    Some(session)
}

/// Image of the registry as written to the snapshot.
pub fn snapshot_of(registry: &SessionRegistry) -> PersistedState {
    PersistedState {
        state: PersistedGames {
            games: registry.sessions().cloned().map(Into::into).collect(),
            current_game_id: registry.current_id(),
        },
        version: SNAPSHOT_VERSION,
    }
}

/// Write the current registry to the snapshot store, if one is configured.
///
/// Failures are logged and flagged on the state; the in-memory registry is never rolled back.
pub async fn persist(state: &SharedState) {
    let Some(store) = state.snapshots() else {
        return;
    };

    let _gate = state.persist_gate().lock().await;
    let snapshot = {
        let registry = state.sessions().read().await;
        snapshot_of(&registry)
    };

    match store.save(snapshot).await {
        Ok(()) => {
            if state.is_snapshot_failing() {
                info!("snapshot writes recovered");
            }
            state.set_snapshot_failing(false);
        }
        Err(err) => {
            warn!(error = %err, "failed to persist sessions; keeping in-memory state");
            state.set_snapshot_failing(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;
    use uuid::Uuid;

    use super::*;
    use crate::{
        dao::snapshot::FileSnapshotStore,
        state::{
            AppState,
            game::{Bar, Player},
        },
    };

    fn bar(id: &str) -> Bar {
        Bar {
            id: id.into(),
            name: id.into(),
            neighborhood: String::new(),
            address: String::new(),
            par: 3,
            latitude: None,
            longitude: None,
            bonus_task: None,
        }
    }

    fn player() -> Player {
        Player {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            color: "#FF6B35".into(),
        }
    }

    #[tokio::test]
    async fn persist_then_restore_keeps_sessions_and_pointer() {
        let dir = tempdir().unwrap();
        let config = AppConfig::default().with_data_root(dir.path());
        let store = Arc::new(FileSnapshotStore::new(config.snapshot_path().clone()));
        let state = AppState::builder(config.clone())
            .snapshot_store(store.clone())
            .build();

        let id = state
            .sessions()
            .write()
            .await
            .create_session("Crawl", vec![bar("bar-1"), bar("bar-2")], vec![player()])
            .unwrap();
        state.sessions().write().await.advance_hole(id).unwrap();
        persist(&state).await;
        assert!(!state.is_snapshot_failing());

        let restored = restore(&config, store.as_ref()).await;
        assert_eq!(restored.current_id(), Some(id));
        assert_eq!(restored.get(id).unwrap().current_hole_index, 1);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_kept_aside_and_not_overwritten() {
        let dir = tempdir().unwrap();
        let config = AppConfig::default().with_data_root(dir.path());
        tokio::fs::write(config.snapshot_path(), b"{ not json")
            .await
            .unwrap();
        let store = Arc::new(FileSnapshotStore::new(config.snapshot_path().clone()));

        let restored = restore(&config, store.as_ref()).await;
        assert!(restored.is_empty());

        let state = AppState::builder(config.clone())
            .registry(restored)
            .snapshot_store(store.clone())
            .build();
        state
            .sessions()
            .write()
            .await
            .create_session("Crawl", vec![bar("bar-1")], vec![player()])
            .unwrap();
        persist(&state).await;

        assert_eq!(
            tokio::fs::read(store.quarantine_path()).await.unwrap(),
            b"{ not json"
        );
        assert_eq!(restore(&config, store.as_ref()).await.len(), 1);
    }

    #[test]
    fn sanitize_clamps_pointer_and_drops_empty_sessions() {
        let mut session = GameSession::new("Crawl".into(), vec![bar("bar-1")], vec![player()]);
        session.current_hole_index = 7;
        assert_eq!(sanitize(session).unwrap().current_hole_index, 0);

        let empty = GameSession::new("Empty".into(), Vec::new(), vec![player()]);
        assert!(sanitize(empty).is_none());
    }
}
