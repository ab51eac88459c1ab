use std::{path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::storage::{StorageError, StorageResult};

/// Binary object handed to a [`PhotoStore`].
#[derive(Debug, Clone)]
pub struct PhotoObject {
    /// Object key relative to the store root (may contain `/` separated segments).
    pub key: String,
    /// MIME type reported by the uploader.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Destination for team photos. Returns the URL the photo can be fetched from.
pub trait PhotoStore: Send + Sync {
    /// Store the object and return its public URL.
    fn put(&self, object: PhotoObject) -> BoxFuture<'static, StorageResult<String>>;
}

/// [`PhotoStore`] writing into a directory that the router serves statically.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: Arc<PathBuf>,
    url_prefix: Arc<str>,
}

impl LocalPhotoStore {
    /// Store files under `root`, exposed publicly under `url_prefix`.
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl AsRef<str>) -> Self {
        Self {
            root: Arc::new(root.into()),
            url_prefix: Arc::from(url_prefix.as_ref().trim_end_matches('/')),
        }
    }
}

impl PhotoStore for LocalPhotoStore {
    fn put(&self, object: PhotoObject) -> BoxFuture<'static, StorageResult<String>> {
        let root = self.root.clone();
        let url_prefix = self.url_prefix.clone();
        Box::pin(async move {
            if !is_safe_key(&object.key) {
                return Err(StorageError::InvalidKey(object.key));
            }

            let target = root.join(&object.key);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await.map_err(|err| {
                    StorageError::unavailable(
                        format!("failed to create `{}`", parent.display()),
                        err,
                    )
                })?;
            }
            fs::write(&target, &object.bytes).await.map_err(|err| {
                StorageError::unavailable(format!("failed to write `{}`", target.display()), err)
            })?;

            Ok(format!("{url_prefix}/{}", object.key))
        })
    }
}

fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
        && !key.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file_and_returns_prefixed_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(dir.path(), "/uploads/");

        let url = store
            .put(PhotoObject {
                key: "game_bar-1_1.jpeg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap();

        assert_eq!(url, "/uploads/game_bar-1_1.jpeg");
        let written = std::fs::read(dir.path().join("game_bar-1_1.jpeg")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn refuses_keys_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(dir.path(), "/uploads");
        for key in ["../evil.png", "/abs.png", "a//b.png", ""] {
            let err = store
                .put(PhotoObject {
                    key: key.into(),
                    content_type: "image/png".into(),
                    bytes: Vec::new(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "{key}");
        }
    }
}
