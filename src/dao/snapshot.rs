use std::{ffi::OsString, io::ErrorKind, path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::{
    models::PersistedState,
    storage::{StorageError, StorageResult},
};

/// Persistence of the whole local state as a single blob.
pub trait SnapshotStore: Send + Sync {
    /// Read the blob back. `None` when nothing was ever saved.
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<PersistedState>>>;
    /// Replace the blob.
    fn save(&self, snapshot: PersistedState) -> BoxFuture<'static, StorageResult<()>>;
    /// Move an undecodable blob out of the way so the next save cannot overwrite it.
    ///
    /// Returns where the blob now lives, or `None` when the store keeps nothing to move.
    fn set_aside(&self) -> BoxFuture<'static, StorageResult<Option<String>>> {
        Box::pin(async { Ok(None) })
    }
}

/// [`SnapshotStore`] writing pretty JSON to a file on local disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: Arc<PathBuf>,
}

impl FileSnapshotStore {
    /// Store the blob at `path`; parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Location of the blob.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Where [`SnapshotStore::set_aside`] moves a corrupt blob: the path with `.corrupt` appended.
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<PersistedState>>> {
        let path = self.path.clone();
        Box::pin(async move {
            let bytes = match fs::read(path.as_ref()).await {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => {
                    return Err(StorageError::unavailable(
                        format!("failed to read `{}`", path.display()),
                        err,
                    ));
                }
            };

            serde_json::from_slice(&bytes).map(Some).map_err(|err| {
                StorageError::corrupt(format!("failed to decode `{}`", path.display()), err)
            })
        })
    }

    fn save(&self, snapshot: PersistedState) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|err| {
                    StorageError::unavailable(
                        format!("failed to create `{}`", parent.display()),
                        err,
                    )
                })?;
            }

            let bytes = serde_json::to_vec_pretty(&snapshot).map_err(|err| {
                StorageError::corrupt("failed to encode snapshot".into(), err)
            })?;

            // Write beside the target then rename so a crash never leaves half a blob.
            let staging = path.with_extension("json.tmp");
            fs::write(&staging, bytes).await.map_err(|err| {
                StorageError::unavailable(format!("failed to write `{}`", staging.display()), err)
            })?;
            fs::rename(&staging, path.as_ref()).await.map_err(|err| {
                StorageError::unavailable(format!("failed to replace `{}`", path.display()), err)
            })
        })
    }

    fn set_aside(&self) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let path = self.path.clone();
        let target = self.quarantine_path();
        Box::pin(async move {
            match fs::rename(path.as_ref(), &target).await {
                Ok(()) => Ok(Some(target.display().to_string())),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(StorageError::unavailable(
                    format!("failed to move `{}` aside", path.display()),
                    err,
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::dao::models::{PersistedGames, SNAPSHOT_VERSION};

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/state.json"));
        let snapshot = PersistedState {
            state: PersistedGames {
                games: Vec::new(),
                current_game_id: Some(Uuid::new_v4()),
            },
            version: SNAPSHOT_VERSION,
        };

        store.save(snapshot.clone()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let err = FileSnapshotStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn set_aside_keeps_the_bytes_next_to_the_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pub-golf-storage.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = FileSnapshotStore::new(path.clone());

        let moved = store.set_aside().await.unwrap();
        let target = dir.path().join("pub-golf-storage.json.corrupt");
        assert_eq!(moved, Some(target.display().to_string()));
        assert!(!path.exists());
        assert_eq!(std::fs::read(&target).unwrap(), b"{ not json");

        assert_eq!(store.set_aside().await.unwrap(), None);
    }
}
