//! Persistence port for the whisper store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::core::models::{MessageId, User, UserId, Whisper};
use crate::errors::WhisperError;

/// Full state of the store, as written to and read from a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: HashMap<UserId, User>,
    #[serde(default)]
    pub whispers: HashMap<MessageId, Whisper>,
}

/// The record touched by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    User(UserId),
    Whisper(MessageId),
    WhisperRemoved(MessageId),
}

#[async_trait]
pub trait StorePersistence: Send + Sync {
    /// Loads the last persisted snapshot; an empty one if nothing was saved yet.
    async fn load(&self) -> Result<Snapshot, WhisperError>;

    /// Writes the mutation described by `change`. `snapshot` is the state
    /// after the mutation.
    async fn persist(&self, snapshot: &Snapshot, change: &StoreChange)
    -> Result<(), WhisperError>;
}

/// Keeps the last persisted snapshot in memory only.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Snapshot>,
    writes: Mutex<Vec<StoreChange>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(snapshot),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every change persisted so far, oldest first.
    pub async fn writes(&self) -> Vec<StoreChange> {
        self.writes.lock().await.clone()
    }

    pub async fn saved(&self) -> Snapshot {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl StorePersistence for MemoryPersistence {
    async fn load(&self) -> Result<Snapshot, WhisperError> {
        Ok(self.saved.lock().await.clone())
    }

    async fn persist(
        &self,
        snapshot: &Snapshot,
        change: &StoreChange,
    ) -> Result<(), WhisperError> {
        *self.saved.lock().await = snapshot.clone();
        self.writes.lock().await.push(change.clone());
        Ok(())
    }
}
