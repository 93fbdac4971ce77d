//! Slack API client module
//!
//! Encapsulates the Slack Web API and `response_url` calls the bot makes,
//! with retry logic and error handling.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::{SlackApiToken, SlackApiTokenValue};
use std::time::Duration;
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{debug, warn};

use super::gateway::ChatGateway;
use super::response_builder::{
    create_post_payload, create_response_payload, create_update_payload,
};
use crate::core::models::MessageId;
use crate::errors::WhisperError;
use crate::replies::Reply;

const CHAT_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";
const CHAT_UPDATE_URL: &str = "https://slack.com/api/chat.update";

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a WhisperError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Envelope returned by `chat.postMessage` and `chat.update`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub channel: Option<String>,
    pub ts: Option<String>,
    pub error: Option<String>,
}

impl ChatResponse {
    /// Turns a Slack envelope into the identifier of the affected message.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` when Slack reported a failure or left out the
    /// channel or timestamp.
    pub fn into_message_id(self, method: &str) -> Result<MessageId, WhisperError> {
        if !self.ok {
            return Err(WhisperError::ApiError(format!(
                "{method} error: {}",
                self.error.as_deref().unwrap_or("unknown")
            )));
        }
        match (self.channel, self.ts) {
            (Some(channel), Some(ts)) => Ok(MessageId::new(channel, ts)),
            _ => Err(WhisperError::ApiError(format!(
                "{method} response is missing channel or ts"
            ))),
        }
    }
}

/// Slack API client with retry logic and error handling
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, WhisperError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, WhisperError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(3);

        Retry::spawn(strategy, operation).await
    }

    /// Resolves the bot's own user ID via `auth.test`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is unavailable or the call fails.
    pub async fn get_bot_user_id(&self) -> Result<String, WhisperError> {
        self.with_retry(|| async {
            let session = SLACK_CLIENT
                .as_ref()
                .ok_or_else(|| {
                    WhisperError::GeneralError("Slack HTTP connector not initialized".to_string())
                })?
                .open_session(&self.token);

            let test_resp = session.auth_test().await?;
            Ok(test_resp.user_id.0)
        })
        .await
    }

    async fn call_chat_api(&self, url: &str, payload: &Value) -> Result<ChatResponse, WhisperError> {
        let resp = HTTP_CLIENT
            .post(url)
            .bearer_auth(&self.token.token_value.0)
            .json(payload)
            .send()
            .await
            .map_err(|e| WhisperError::HttpError(format!("{url}: {e}")))?;

        if !resp.status().is_success() {
            return Err(WhisperError::ApiError(format!("{url} HTTP {}", resp.status())));
        }

        resp.json::<ChatResponse>()
            .await
            .map_err(|e| WhisperError::ApiError(format!("{url} JSON parse error: {e}")))
    }

    /// Post a message built from `reply` and return its identifier.
    ///
    /// Not retried: a retry after a lost response would post the message twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack returns an error.
    pub async fn post_message(
        &self,
        channel_id: &str,
        reply: &Reply,
    ) -> Result<MessageId, WhisperError> {
        let payload = create_post_payload(channel_id, reply);
        self.call_chat_api(CHAT_POST_MESSAGE_URL, &payload)
            .await?
            .into_message_id("chat.postMessage")
    }

    /// Update an existing message via Slack's `chat.update` API.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API request or response parsing fails.
    pub async fn update_message(
        &self,
        message_id: &MessageId,
        reply: &Reply,
    ) -> Result<(), WhisperError> {
        let payload = create_update_payload(message_id, reply);

        self.with_retry(|| async {
            self.call_chat_api(CHAT_UPDATE_URL, &payload)
                .await?
                .into_message_id("chat.update")
                .map(|_| ())
        })
        .await
    }

    /// Send a reply to an interaction's `response_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP call fails or returns a non-success status.
    pub async fn send_response_url(
        &self,
        response_url: &str,
        reply: &Reply,
    ) -> Result<(), WhisperError> {
        let payload = create_response_payload(reply);

        self.with_retry(|| async {
            let resp = HTTP_CLIENT
                .post(response_url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| WhisperError::HttpError(format!("response_url: {e}")))?;

            if resp.status().is_success() {
                debug!("Replied through response_url");
                Ok(())
            } else {
                Err(WhisperError::HttpError(format!(
                    "response_url HTTP {}",
                    resp.status()
                )))
            }
        })
        .await
    }
}

#[async_trait]
impl ChatGateway for SlackClient {
    async fn respond(&self, response_url: &str, reply: &Reply) -> Result<(), WhisperError> {
        self.send_response_url(response_url, reply).await
    }

    async fn send_message(
        &self,
        channel_id: &str,
        reply: &Reply,
    ) -> Result<MessageId, WhisperError> {
        self.post_message(channel_id, reply).await
    }

    async fn edit_message(
        &self,
        message_id: &MessageId,
        reply: &Reply,
    ) -> Result<(), WhisperError> {
        self.update_message(message_id, reply).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_success_yields_message_id() {
        let json_str = r#"{"ok": true, "channel": "C123ABC456", "ts": "1503435956.000247"}"#;
        let resp: ChatResponse = serde_json::from_str(json_str).unwrap();

        let id = resp.into_message_id("chat.postMessage").unwrap();
        assert_eq!(id, MessageId::new("C123ABC456", "1503435956.000247"));
    }

    #[test]
    fn chat_response_error_is_api_error() {
        let json_str = r#"{"ok": false, "error": "not_in_channel"}"#;
        let resp: ChatResponse = serde_json::from_str(json_str).unwrap();

        match resp.into_message_id("chat.postMessage") {
            Err(WhisperError::ApiError(msg)) => assert!(msg.contains("not_in_channel")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn chat_response_missing_ts_is_rejected() {
        let json_str = r#"{"ok": true, "channel": "C123ABC456"}"#;
        let resp: ChatResponse = serde_json::from_str(json_str).unwrap();

        assert!(resp.into_message_id("chat.update").is_err());
    }
}
