//! Handler for the bot's slash commands.

use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use super::helpers::{ok_empty, ok_reply};
use super::parsing::parse_invocation;
use crate::app::App;
use crate::commands;
use crate::errors::WhisperError;
use crate::replies;

/// Handle a slash command from Slack.
///
/// # Arguments
/// - `app`: Shared application state
/// - `body`: The raw form-encoded body of the slash command
///
/// # Returns
/// A JSON response carrying the ephemeral reply, or an empty acknowledgement
/// when the command already answered publicly.
///
/// # Errors
/// Returns an error if the body cannot be parsed.
pub async fn handle_slash_command(app: &App, body: &str) -> Result<Value, WhisperError> {
    let invocation = parse_invocation(body)?;

    match commands::dispatch(
        &app.store,
        app.gateway.as_ref(),
        &app.config.command_prefix,
        &invocation,
    )
    .await
    {
        Ok(Some(reply)) => Ok(ok_reply(&reply)),
        Ok(None) => Ok(ok_empty()),
        Err(e) => {
            let correlation_id = Uuid::new_v4().to_string();
            error!(
                command = %invocation.command,
                user = %invocation.user_id,
                "Command failed (correlation_id={}): {}",
                correlation_id,
                e
            );
            Ok(ok_reply(&replies::internal_failure(&correlation_id[..8])))
        }
    }
}
