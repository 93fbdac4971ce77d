//! Handler for Slack interactive components.
//!
//! Only `block_actions` payloads matter here: a press on a whisper's
//! "Read whisper" button. The reply goes back through the payload's
//! `response_url` as an ephemeral message.

use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers::ok_empty;
use super::parsing::{v_array, v_str};
use crate::app::App;
use crate::core::models::{MessageId, RevealOutcome, UserId};
use crate::replies::{self, Reply};
use crate::slack::response_builder::{LOADING_ACTION, READ_WHISPER_ACTION};
use crate::store::WhisperStore;

// ============================================================================
// Whisper reveal
// ============================================================================

/// Decides what `user` sees after pressing the button that carries
/// `button_value`, consuming one-time whispers opened by their viewer.
pub async fn read_whisper(store: &WhisperStore, user: &UserId, button_value: &str) -> Reply {
    let Ok(message_id) = button_value.parse::<MessageId>() else {
        warn!(%user, value = %button_value, "Button value is not a message id");
        return replies::whisper_not_found();
    };

    info!(%user, %message_id, "User pressed on whisper");

    match store.reveal_whisper(&message_id, user).await {
        RevealOutcome::NotFound => replies::whisper_not_found(),
        RevealOutcome::Unauthorized => {
            info!(%user, %message_id, "Refused whisper to non-participant");
            replies::not_whisper_participant()
        }
        RevealOutcome::Revealed { whisper, .. } => {
            replies::revealed_whisper(&whisper.text, whisper.once)
        }
    }
}

// ============================================================================
// Block Action Handlers
// ============================================================================

/// Handle `block_actions` interactive type.
async fn handle_block_actions(app: &App, payload: &Value) -> Value {
    let actions = v_array(payload, &["actions"]).cloned().unwrap_or_default();

    let Some(action) = actions.iter().find(|a| {
        a.get("action_id")
            .and_then(Value::as_str)
            .is_some_and(|id| id == READ_WHISPER_ACTION || id == LOADING_ACTION)
    }) else {
        return ok_empty();
    };

    if action.get("action_id").and_then(Value::as_str) == Some(LOADING_ACTION) {
        return ok_empty();
    }

    let (Some(user_id), Some(response_url)) = (
        v_str(payload, &["user", "id"]),
        v_str(payload, &["response_url"]),
    ) else {
        error!("block_actions payload is missing user or response_url");
        return ok_empty();
    };

    let value = action.get("value").and_then(Value::as_str).unwrap_or("");
    let reply = read_whisper(&app.store, &UserId::new(user_id), value).await;

    if let Err(e) = app.gateway.respond(response_url, &reply).await {
        error!(user = %user_id, "Failed to deliver whisper reply: {}", e);
    }

    ok_empty()
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Handle an interactive payload from Slack.
///
/// Always acknowledges with an empty 200; replies travel via `response_url`.
pub async fn handle_interactive(app: &App, payload: &Value) -> Value {
    let payload_type = payload.get("type").and_then(|s| s.as_str()).unwrap_or("");

    match payload_type {
        "block_actions" => handle_block_actions(app, payload).await,
        _ => {
            info!("Unhandled interactive type: {}", payload_type);
            ok_empty()
        }
    }
}
