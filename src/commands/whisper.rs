//! `whisper`: send the saved text to another user behind a reveal button.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info};

use crate::core::models::UserId;
use crate::errors::WhisperError;
use crate::replies::{self, Reply};
use crate::slack::ChatGateway;
use crate::store::WhisperStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhisperArgs {
    pub recipient: UserId,
    pub once: bool,
}

/// Parses `<@U123|name> [yes|no]` as sent by Slack with escaped mentions.
///
/// # Errors
///
/// Returns a user-facing description of what is wrong with the arguments.
pub fn parse_whisper_args(text: &str) -> Result<WhisperArgs, String> {
    static MENTION_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^<@([UW][A-Z0-9]+)(?:\|[^>]*)?>$").expect("static regex compile")
    });

    let mut parts = text.split_whitespace();

    let Some(target) = parts.next() else {
        return Err("Tell me who to whisper to.".to_string());
    };
    if target.starts_with('@') {
        return Err(format!(
            "`{target}` arrived as plain text. Enable \"Escape channels, users, and links\" for this command in the Slack app settings."
        ));
    }
    let recipient = MENTION_RE
        .captures(target)
        .map(|cap| UserId::new(&cap[1]))
        .ok_or_else(|| format!("`{target}` is not a user mention."))?;

    let once = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        None | Some("no" | "n" | "false") => false,
        Some("yes" | "y" | "once" | "true") => true,
        Some(other) => return Err(format!("`{other}` is not a valid self-destruct choice.")),
    };

    if parts.next().is_some() {
        return Err("Too many arguments.".to_string());
    }

    Ok(WhisperArgs { recipient, once })
}

/// Sends a whisper from `sender` in `channel_id`.
///
/// Returns `Some(reply)` with an ephemeral refusal when validation fails and
/// `None` once the public whisper message is in place.
///
/// # Errors
///
/// Returns an error if posting, registering, or enabling the whisper fails.
/// A placeholder that could not be registered is turned into a failure
/// notice; a record whose button could not be enabled is removed again.
pub async fn send_whisper(
    store: &WhisperStore,
    gateway: &dyn ChatGateway,
    prefix: &str,
    sender: &UserId,
    channel_id: &str,
    args: &WhisperArgs,
) -> Result<Option<Reply>, WhisperError> {
    let recipient = &args.recipient;

    if recipient == sender {
        return Ok(Some(replies::cannot_whisper_to_self()));
    }

    let Some(text) = store.get_user(sender).await.saved_message else {
        return Ok(Some(replies::nothing_to_whisper(prefix)));
    };

    let placeholder = replies::whisper_placeholder(sender, recipient);
    let message_id = gateway.send_message(channel_id, &placeholder).await?;

    #[cfg(feature = "debug-logs")]
    info!(%sender, %recipient, %message_id, once = args.once, %text, "Registering whisper");
    #[cfg(not(feature = "debug-logs"))]
    info!(
        %sender,
        %recipient,
        %message_id,
        once = args.once,
        len = text.chars().count(),
        "Registering whisper"
    );

    if let Err(e) = store
        .send_whisper(&message_id, sender, recipient, &text, args.once)
        .await
    {
        let notice = replies::whisper_failed(sender, recipient);
        if let Err(edit_err) = gateway.edit_message(&message_id, &notice).await {
            error!(%message_id, "Failed to mark whisper as undelivered: {}", edit_err);
        }
        return Err(e);
    }

    let ready = replies::whisper_ready(sender, recipient, &message_id);
    if let Err(e) = gateway.edit_message(&message_id, &ready).await {
        if let Err(remove_err) = store.remove_whisper(&message_id).await {
            error!(%message_id, "Failed to drop unreachable whisper: {}", remove_err);
        }
        return Err(e);
    }

    Ok(None)
}
