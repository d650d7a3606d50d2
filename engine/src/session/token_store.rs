// Persistent storage for the session token
use std::path::PathBuf;

use async_trait::async_trait;
use shared::models::SessionToken;
use tokio::sync::RwLock;

use crate::error::Result;

/// Storage for the single opaque session token.
///
/// `load` only fails on storage I/O errors; an absent token is `Ok(None)`.
/// `clear` is a no-op when nothing is stored.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<SessionToken>>;
    async fn save(&self, token: &SessionToken) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Token kept in a plain file under the client's data directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(SessionToken::new(raw.trim())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to read token file");
                Err(e.into())
            }
        }
    }

    async fn save(&self, token: &SessionToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, token.as_str()).await?;
        tracing::debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process token store, used by tests and short-lived embeddings.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        MemoryTokenStore { token: RwLock::new(Some(token)) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &SessionToken) -> Result<()> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_absent() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("userToken"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_save_load_overwrite() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/userToken"));
        store.save(&token("first")).await.unwrap();
        store.save(&token("second")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(token("second")));
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("userToken"));
        store.clear().await.unwrap();
        store.save(&token("abc")).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_blank_file_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("userToken");
        std::fs::write(&path, "  \n").unwrap();
        let store = FileTokenStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_read_error_propagates() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the read fail with something other than NotFound.
        let store = FileTokenStore::new(dir.path());
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_none());
        store.save(&token("t")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(token("t")));
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
