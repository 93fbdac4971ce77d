//! `view-text`, `save-text` and `remove-text`.

use tracing::info;

use crate::core::models::{MAX_SAVED_TEXT_CHARS, UserId};
use crate::errors::WhisperError;
use crate::replies::{self, Reply};
use crate::store::WhisperStore;

pub async fn view_text(store: &WhisperStore, prefix: &str, user: &UserId) -> Reply {
    match store.get_user(user).await.saved_message {
        Some(text) => replies::saved_text(&text),
        None => replies::no_saved_text(prefix),
    }
}

/// # Errors
///
/// Returns an error if the new text cannot be persisted.
pub async fn save_text(
    store: &WhisperStore,
    user: &UserId,
    text: &str,
) -> Result<Reply, WhisperError> {
    let len = text.chars().count();
    if len > MAX_SAVED_TEXT_CHARS {
        info!(%user, len, "Rejected saved text over the length limit");
        return Ok(replies::text_too_long());
    }

    store.save_text(user, text).await?;
    info!(%user, len, "Saved text");
    Ok(replies::text_saved())
}

/// # Errors
///
/// Returns an error if the removal cannot be persisted.
pub async fn remove_text(store: &WhisperStore, user: &UserId) -> Result<Reply, WhisperError> {
    if store.get_user(user).await.saved_message.is_none() {
        return Ok(replies::nothing_to_remove());
    }

    store.unsave_text(user).await?;
    info!(%user, "Removed saved text");
    Ok(replies::text_removed())
}
