//! Renders [`Reply`] values into the JSON shapes Slack expects.
//!
//! Plain replies become a single coloured legacy attachment. Replies that
//! carry a button are rendered with Block Kit so the button can be attached.

use serde_json::{Value, json};

use crate::core::models::MessageId;
use crate::replies::{Button, ButtonAction, Embed, Reply};

/// `action_id` of the button that reveals a whisper.
pub const READ_WHISPER_ACTION: &str = "read_whisper";
/// `action_id` of the inert placeholder button.
pub const LOADING_ACTION: &str = "whisper_loading";

/// Escapes `&`, `<` and `>` so user text renders literally in mrkdwn.
#[must_use]
pub fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render an embed as a Slack attachment.
#[must_use]
pub fn render_attachment(embed: &Embed) -> Value {
    let mut attachment = json!({
        "color": embed.color.hex(),
        "text": embed.description,
        "fallback": embed.description,
        "mrkdwn_in": ["text"],
    });

    if let Some(author) = &embed.author {
        attachment["author_name"] = Value::String(author.clone());
    }

    attachment
}

/// Render a button element.
#[must_use]
pub fn render_button(button: &Button) -> Value {
    let (action_id, value) = match &button.action {
        ButtonAction::Loading => (LOADING_ACTION, "loading".to_string()),
        ButtonAction::Read(id) => (READ_WHISPER_ACTION, id.to_string()),
    };

    let mut element = json!({
        "type": "button",
        "text": { "type": "plain_text", "text": button.label },
        "action_id": action_id,
        "value": value,
    });

    if matches!(button.action, ButtonAction::Read(_)) {
        element["style"] = Value::String("primary".to_string());
    }

    element
}

/// Block Kit blocks for a reply that carries a button.
#[must_use]
pub fn render_blocks(reply: &Reply) -> Option<Value> {
    let button = reply.button.as_ref()?;
    Some(json!([
        {
            "type": "section",
            "text": { "type": "mrkdwn", "text": reply.embed.description },
        },
        {
            "type": "actions",
            "elements": [render_button(button)],
        },
    ]))
}

/// Message body shared by every rendering: fallback text plus either blocks
/// or a coloured attachment.
fn message_body(reply: &Reply) -> Value {
    let mut body = json!({ "text": reply.embed.description });

    if let Some(blocks) = render_blocks(reply) {
        body["blocks"] = blocks;
    } else {
        body["text"] = Value::String(String::new());
        body["attachments"] = json!([render_attachment(&reply.embed)]);
    }

    body
}

/// Payload for a slash-command HTTP response or a `response_url` post.
#[must_use]
pub fn create_response_payload(reply: &Reply) -> Value {
    let mut payload = message_body(reply);
    payload["response_type"] = Value::String(
        if reply.is_ephemeral() {
            "ephemeral"
        } else {
            "in_channel"
        }
        .to_string(),
    );
    payload["replace_original"] = Value::Bool(false);
    payload
}

/// Payload for `chat.postMessage`.
#[must_use]
pub fn create_post_payload(channel_id: &str, reply: &Reply) -> Value {
    let mut payload = message_body(reply);
    payload["channel"] = Value::String(channel_id.to_string());
    payload
}

/// Payload for `chat.update`. Blocks are always sent so a stale button is
/// cleared when the new reply has none.
#[must_use]
pub fn create_update_payload(message_id: &MessageId, reply: &Reply) -> Value {
    let mut payload = message_body(reply);
    payload["channel"] = Value::String(message_id.channel.clone());
    payload["ts"] = Value::String(message_id.ts.clone());
    if payload.get("blocks").is_none() {
        payload["blocks"] = json!([]);
    }
    payload
}
