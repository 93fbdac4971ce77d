//! The platform operations handlers rely on.

use async_trait::async_trait;

use crate::core::models::MessageId;
use crate::errors::WhisperError;
use crate::replies::Reply;

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Answer an interaction through its `response_url`.
    async fn respond(&self, response_url: &str, reply: &Reply) -> Result<(), WhisperError>;

    /// Post a new message and return the identifier Slack assigned to it.
    async fn send_message(&self, channel_id: &str, reply: &Reply)
    -> Result<MessageId, WhisperError>;

    /// Replace the content of a message posted earlier.
    async fn edit_message(&self, message_id: &MessageId, reply: &Reply)
    -> Result<(), WhisperError>;
}
