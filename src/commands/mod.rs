//! Slash command handlers.

pub mod text;
pub mod whisper;

use tracing::info;

use crate::core::models::UserId;
use crate::errors::WhisperError;
use crate::replies::{self, Reply};
use crate::slack::ChatGateway;
use crate::store::WhisperStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ViewText,
    SaveText,
    RemoveText,
    Whisper,
}

impl Command {
    /// Resolves a slash command name such as `/w-save-text` given the
    /// configured prefix (`w-`).
    #[must_use]
    pub fn parse(name: &str, prefix: &str) -> Option<Self> {
        let bare = name.trim().trim_start_matches('/').strip_prefix(prefix)?;
        match bare {
            "view-text" => Some(Command::ViewText),
            "save-text" => Some(Command::SaveText),
            "remove-text" => Some(Command::RemoveText),
            "whisper" => Some(Command::Whisper),
            _ => None,
        }
    }
}

/// A slash command invocation, as far as the handlers care.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub user_id: UserId,
    pub channel_id: String,
    pub command: String,
    pub text: String,
}

/// Runs the command named by `invocation`.
///
/// Returns the ephemeral reply to send back, or `None` when the command has
/// already answered publicly.
///
/// # Errors
///
/// Returns an error if the store cannot be persisted or a Slack call fails.
pub async fn dispatch(
    store: &WhisperStore,
    gateway: &dyn ChatGateway,
    prefix: &str,
    invocation: &Invocation,
) -> Result<Option<Reply>, WhisperError> {
    let Some(command) = Command::parse(&invocation.command, prefix) else {
        return Ok(Some(replies::unknown_command(&invocation.command)));
    };
    let user = &invocation.user_id;
    info!(%user, ?command, "Command invoked");

    match command {
        Command::ViewText => Ok(Some(text::view_text(store, prefix, user).await)),
        Command::SaveText => text::save_text(store, user, &invocation.text).await.map(Some),
        Command::RemoveText => text::remove_text(store, user).await.map(Some),
        Command::Whisper => match whisper::parse_whisper_args(&invocation.text) {
            Ok(args) => {
                whisper::send_whisper(store, gateway, prefix, user, &invocation.channel_id, &args)
                    .await
            }
            Err(problem) => Ok(Some(replies::whisper_usage(prefix, &problem))),
        },
    }
}
