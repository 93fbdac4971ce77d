//! JSON file backend: the whole snapshot lives in one file.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::persistence::{Snapshot, StoreChange, StorePersistence};
use crate::errors::WhisperError;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StorePersistence for JsonFileStore {
    async fn load(&self) -> Result<Snapshot, WhisperError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Snapshot::default()),
            Ok(raw) => {
                let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|e| {
                    WhisperError::StorageError(format!("{}: {e}", self.path.display()))
                })?;
                info!(
                    path = %self.path.display(),
                    users = snapshot.users.len(),
                    whispers = snapshot.whispers.len(),
                    "Loaded whisper store"
                );
                Ok(snapshot)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No store file yet, starting empty");
                Ok(Snapshot::default())
            }
            Err(e) => Err(WhisperError::StorageError(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn persist(
        &self,
        snapshot: &Snapshot,
        change: &StoreChange,
    ) -> Result<(), WhisperError> {
        let body = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.temp_path();

        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), ?change, "Wrote whisper store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{User, UserId};

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("users.json"));

        assert_eq!(store.load().await.unwrap(), Snapshot::default());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, WhisperError::StorageError(_)));
    }

    #[tokio::test]
    async fn persist_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = JsonFileStore::new(&path);

        let mut snapshot = Snapshot::default();
        snapshot.users.insert(
            UserId::new("U1"),
            User {
                saved_message: Some("first".into()),
            },
        );
        store
            .persist(&snapshot, &StoreChange::User(UserId::new("U1")))
            .await
            .unwrap();

        snapshot.users.insert(
            UserId::new("U1"),
            User {
                saved_message: Some("second".into()),
            },
        );
        store
            .persist(&snapshot, &StoreChange::User(UserId::new("U1")))
            .await
            .unwrap();

        assert_eq!(store.load().await.unwrap(), snapshot);
        assert!(!dir.path().join("users.json.tmp").exists());
    }
}
