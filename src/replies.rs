//! Every message the bot sends, as Slack mrkdwn.

use crate::core::models::{MAX_SAVED_TEXT_CHARS, MessageId, UserId};
use crate::slack::response_builder::escape_mrkdwn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only the interacting user sees the reply.
    Ephemeral,
    /// Posted to the channel for everyone.
    InChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedColor {
    Error,
    Info,
}

impl EmbedColor {
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            EmbedColor::Error => "#ED4245",
            EmbedColor::Info => "#5865F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub color: EmbedColor,
    pub author: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Shown while the whisper is being registered; pressing it does nothing.
    Loading,
    /// Reveals the whisper stored under this message.
    Read(MessageId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub visibility: Visibility,
    pub embed: Embed,
    pub button: Option<Button>,
}

impl Reply {
    fn ephemeral(color: EmbedColor, description: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Ephemeral,
            embed: Embed {
                color,
                author: None,
                description: description.into(),
            },
            button: None,
        }
    }

    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self::ephemeral(EmbedColor::Error, description)
    }

    #[must_use]
    pub fn info(description: impl Into<String>) -> Self {
        Self::ephemeral(EmbedColor::Info, description)
    }

    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.visibility == Visibility::Ephemeral
    }
}

fn command(prefix: &str, name: &str) -> String {
    format!("`/{prefix}{name}`")
}

// ============================================================================
// Interaction replies
// ============================================================================

#[must_use]
pub fn whisper_not_found() -> Reply {
    Reply::error("*Whisper not found!*\n\nIf it was a one-time whisper, it probably expired.")
}

#[must_use]
pub fn not_whisper_participant() -> Reply {
    Reply::error("*You are not meant to view this whisper!*")
}

#[must_use]
pub fn revealed_whisper(text: &str, once: bool) -> Reply {
    let mut reply = Reply::info(escape_mrkdwn(text));
    if once {
        reply.embed.author = Some("🔥 One-time whisper!".to_string());
    }
    reply
}

// ============================================================================
// Saved text replies
// ============================================================================

#[must_use]
pub fn no_saved_text(prefix: &str) -> Reply {
    Reply::error(format!(
        "*No saved text!*\n\nUse {} to save your text.",
        command(prefix, "save-text")
    ))
}

#[must_use]
pub fn saved_text(text: &str) -> Reply {
    Reply::info(format!("*Saved text:*\n\n{}", escape_mrkdwn(text)))
}

#[must_use]
pub fn text_too_long() -> Reply {
    Reply::error(format!(
        "Your text must not be longer than {MAX_SAVED_TEXT_CHARS} characters!"
    ))
}

#[must_use]
pub fn text_saved() -> Reply {
    Reply::info("*Success!*")
}

#[must_use]
pub fn nothing_to_remove() -> Reply {
    Reply::error("*You don't have any text saved!*")
}

#[must_use]
pub fn text_removed() -> Reply {
    Reply::info("*Text removed!*")
}

// ============================================================================
// Whisper replies
// ============================================================================

#[must_use]
pub fn cannot_whisper_to_self() -> Reply {
    Reply::error("*You can't whisper to yourself!*")
}

#[must_use]
pub fn nothing_to_whisper(prefix: &str) -> Reply {
    Reply::error(format!(
        "*You don't have any text saved!*\n\nUse {} to save your text and try again.",
        command(prefix, "save-text")
    ))
}

#[must_use]
pub fn whisper_usage(prefix: &str, problem: &str) -> Reply {
    Reply::error(format!(
        "{problem}\n\nUsage: `/{prefix}whisper @user [yes|no]` (answer `yes` to make the whisper viewable only once)."
    ))
}

fn whisper_announcement(sender: &UserId, recipient: &UserId, button: Button) -> Reply {
    Reply {
        visibility: Visibility::InChannel,
        embed: Embed {
            color: EmbedColor::Info,
            author: None,
            description: format!(
                "{} whispers to {}...\n\nClick on the button to read the whisper.",
                sender.mention(),
                recipient.mention()
            ),
        },
        button: Some(button),
    }
}

/// Public message posted before the whisper is registered.
#[must_use]
pub fn whisper_placeholder(sender: &UserId, recipient: &UserId) -> Reply {
    whisper_announcement(
        sender,
        recipient,
        Button {
            label: "Loading...".to_string(),
            action: ButtonAction::Loading,
        },
    )
}

/// The same public message once the whisper can be read.
#[must_use]
pub fn whisper_ready(sender: &UserId, recipient: &UserId, message_id: &MessageId) -> Reply {
    whisper_announcement(
        sender,
        recipient,
        Button {
            label: "Read whisper".to_string(),
            action: ButtonAction::Read(message_id.clone()),
        },
    )
}

/// Replaces the public message when the whisper could not be registered.
#[must_use]
pub fn whisper_failed(sender: &UserId, recipient: &UserId) -> Reply {
    Reply {
        visibility: Visibility::InChannel,
        embed: Embed {
            color: EmbedColor::Error,
            author: None,
            description: format!(
                "{} tried to whisper to {}...\n\nThis whisper could not be delivered.",
                sender.mention(),
                recipient.mention()
            ),
        },
        button: None,
    }
}

// ============================================================================
// Misc
// ============================================================================

#[must_use]
pub fn unknown_command(name: &str) -> Reply {
    Reply::error(format!("Unknown command `{name}`."))
}

#[must_use]
pub fn internal_failure(reference: &str) -> Reply {
    Reply::error(format!(
        "Something went wrong. Please try again. (ref: {reference})"
    ))
}
