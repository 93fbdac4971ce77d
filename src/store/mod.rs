//! In-memory whisper store with pluggable persistence.
//!
//! The store owns every [`User`] and [`Whisper`] record. All operations go
//! through one async mutex, and a mutation is persisted before the lock is
//! released, so handlers running on different tasks observe the store as if
//! events were processed one at a time.

pub mod file;
pub mod persistence;
pub mod ssm;

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub use file::JsonFileStore;
pub use persistence::{MemoryPersistence, Snapshot, StoreChange, StorePersistence};
pub use ssm::SsmStore;

use crate::core::models::{MessageId, RevealOutcome, User, UserId, Whisper};
use crate::errors::WhisperError;

pub struct WhisperStore {
    state: Mutex<Snapshot>,
    persistence: Arc<dyn StorePersistence>,
}

impl WhisperStore {
    /// Loads the persisted state and returns a ready store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub async fn open(persistence: Arc<dyn StorePersistence>) -> Result<Self, WhisperError> {
        let snapshot = persistence.load().await?;
        Ok(Self {
            state: Mutex::new(snapshot),
            persistence,
        })
    }

    async fn persist(&self, state: &Snapshot, change: StoreChange) -> Result<(), WhisperError> {
        self.persistence
            .persist(state, &change)
            .await
            .inspect_err(|e| error!(?change, "Failed to persist whisper store: {}", e))
    }

    /// Returns the user's record, creating a default one on first lookup.
    pub async fn get_user(&self, id: &UserId) -> User {
        let mut state = self.state.lock().await;
        state.users.entry(id.clone()).or_default().clone()
    }

    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted. The in-memory
    /// state keeps the new text either way.
    pub async fn save_text(&self, id: &UserId, text: &str) -> Result<(), WhisperError> {
        let mut state = self.state.lock().await;
        state.users.entry(id.clone()).or_default().saved_message = Some(text.to_string());
        self.persist(&state, StoreChange::User(id.clone())).await
    }

    /// Clears the user's saved text. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    pub async fn unsave_text(&self, id: &UserId) -> Result<(), WhisperError> {
        let mut state = self.state.lock().await;
        let user = state.users.entry(id.clone()).or_default();
        if user.saved_message.take().is_none() {
            return Ok(());
        }
        self.persist(&state, StoreChange::User(id.clone())).await
    }

    pub async fn get_whisper(&self, id: &MessageId) -> Option<Whisper> {
        self.state.lock().await.whispers.get(id).cloned()
    }

    /// Registers a whisper under the message that carries its button,
    /// replacing any previous record for that message.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    pub async fn send_whisper(
        &self,
        id: &MessageId,
        owner: &UserId,
        viewer: &UserId,
        text: &str,
        once: bool,
    ) -> Result<(), WhisperError> {
        let whisper = Whisper {
            owner: owner.clone(),
            viewer: viewer.clone(),
            text: text.to_string(),
            once,
            created_at: chrono::Utc::now().timestamp(),
        };

        let mut state = self.state.lock().await;
        state.whispers.insert(id.clone(), whisper);
        self.persist(&state, StoreChange::Whisper(id.clone())).await
    }

    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    pub async fn remove_whisper(&self, id: &MessageId) -> Result<(), WhisperError> {
        let mut state = self.state.lock().await;
        if state.whispers.remove(id).is_none() {
            return Ok(());
        }
        self.persist(&state, StoreChange::WhisperRemoved(id.clone()))
            .await
    }

    /// Looks up the whisper for `user`, consuming it when the intended viewer
    /// opens a one-time whisper.
    ///
    /// A consumed whisper is gone from memory even if persisting the removal
    /// fails; the failure is logged and the text is still revealed.
    pub async fn reveal_whisper(&self, id: &MessageId, user: &UserId) -> RevealOutcome {
        let mut state = self.state.lock().await;

        let Some(whisper) = state.whispers.get(id).cloned() else {
            return RevealOutcome::NotFound;
        };
        if !whisper.can_view(user) {
            return RevealOutcome::Unauthorized;
        }

        let consumed = whisper.once && *user == whisper.viewer;
        if consumed {
            info!(message_id = %id, "Removing one-time whisper");
            state.whispers.remove(id);
            if self
                .persist(&state, StoreChange::WhisperRemoved(id.clone()))
                .await
                .is_err()
            {
                warn!(message_id = %id, "One-time whisper removal was not persisted");
            }
        }

        RevealOutcome::Revealed { whisper, consumed }
    }
}
