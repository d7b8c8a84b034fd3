//! JSON-file session storage implementation.
//!
//! The session is persisted as pretty-printed JSON in the platform
//! configuration directory: `~/.config/foliogate/session.json` on
//! Linux/macOS and `%APPDATA%\foliogate\session.json` on Windows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use super::{SessionStore, StoreError};
use crate::model::Session;

/// On-disk storage format for the persisted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    /// Version of the file format (for future migrations).
    version: u32,

    /// The persisted session.
    session: Session,
}

impl SessionFile {
    fn new(session: Session) -> Self {
        Self {
            version: 1,
            session,
        }
    }
}

/// Disk-backed session store.
///
/// Stores the token pair as a JSON file so that the session survives a
/// process restart. Token values land on disk in the clear; use the
/// keyring backend where the platform provides one.
#[derive(Debug)]
pub struct FileStore {
    /// Path to the session JSON file.
    path: PathBuf,
}

impl FileStore {
    /// Create a file store at a specific path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a file store at the default platform location.
    pub fn default_location() -> Result<Self, StoreError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Get the default storage path for the session file.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dirs = directories::ProjectDirs::from("com", "foliogate", "foliogate")
            .ok_or(StoreError::ConfigDirUnavailable)?;

        Ok(dirs.config_dir().join("session.json"))
    }

    /// Path this store reads and writes.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: SessionFile = serde_json::from_str(&contents)?;
        Ok(Some(file.session))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(&SessionFile::new(session.clone()))?;
        fs::write(&self.path, contents).await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("session.json"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_file_store_load_missing() {
        let (store, _temp) = test_store();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_load_missing_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("never/created/session.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let (store, _temp) = test_store();
        let session = Session::new("access-123").with_refresh_token("refresh-456");

        store.save(&session).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded.access_token.expose(), "access-123");
        assert_eq!(loaded.refresh_token.unwrap().expose(), "refresh-456");
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let (store, temp) = test_store();
        let session = Session::new("persisted");
        store.save(&session).await.unwrap();

        // A fresh store instance at the same path sees the session
        let reopened = FileStore::new(temp.path().join("session.json"));
        let loaded = reopened.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token.expose(), "persisted");
    }

    #[tokio::test]
    async fn test_file_store_clear_idempotent() {
        let (store, _temp) = test_store();
        let session = Session::new("access");
        store.save(&session).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());

        // Clearing an already-empty store succeeds
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested/dir/session.json"));

        store.save(&Session::new("access")).await.unwrap();
        assert!(store.load().await.unwrap().is_some());
    }
}
