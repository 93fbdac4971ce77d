#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use whisperbot::App;
use whisperbot::core::config::{AppConfig, StoreBackend};
use whisperbot::core::models::MessageId;
use whisperbot::errors::WhisperError;
use whisperbot::replies::Reply;
use whisperbot::slack::ChatGateway;
use whisperbot::store::{MemoryPersistence, WhisperStore};

pub const SIGNING_SECRET: &str = "test-signing-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Respond { response_url: String, reply: Reply },
    Send { channel_id: String, reply: Reply, assigned: MessageId },
    Edit { message_id: MessageId, reply: Reply },
}

/// Records every platform call and hands out predictable message ids.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    next_ts: AtomicU64,
    pub fail_send: AtomicBool,
    pub fail_edit: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn responses(&self) -> Vec<Reply> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::Respond { reply, .. } => Some(reply),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn respond(&self, response_url: &str, reply: &Reply) -> Result<(), WhisperError> {
        self.calls.lock().unwrap().push(GatewayCall::Respond {
            response_url: response_url.to_string(),
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: &str,
        reply: &Reply,
    ) -> Result<MessageId, WhisperError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(WhisperError::ApiError("chat.postMessage error: not_in_channel".into()));
        }
        let n = self.next_ts.fetch_add(1, Ordering::SeqCst) + 1;
        let assigned = MessageId::new(channel_id, format!("1700000000.{n:06}"));
        self.calls.lock().unwrap().push(GatewayCall::Send {
            channel_id: channel_id.to_string(),
            reply: reply.clone(),
            assigned: assigned.clone(),
        });
        Ok(assigned)
    }

    async fn edit_message(
        &self,
        message_id: &MessageId,
        reply: &Reply,
    ) -> Result<(), WhisperError> {
        self.calls.lock().unwrap().push(GatewayCall::Edit {
            message_id: message_id.clone(),
            reply: reply.clone(),
        });
        if self.fail_edit.load(Ordering::SeqCst) {
            return Err(WhisperError::ApiError("chat.update error: message_not_found".into()));
        }
        Ok(())
    }
}

pub async fn memory_store() -> (WhisperStore, Arc<MemoryPersistence>) {
    let persistence = Arc::new(MemoryPersistence::new());
    let store = WhisperStore::open(persistence.clone()).await.unwrap();
    (store, persistence)
}

pub fn test_config(prefix: &str) -> AppConfig {
    AppConfig {
        slack_signing_secret: SIGNING_SECRET.to_string(),
        slack_bot_token: "xoxb-test".to_string(),
        command_prefix: prefix.to_string(),
        store: StoreBackend::Memory,
    }
}

pub async fn test_app() -> (App, Arc<RecordingGateway>) {
    let (store, _) = memory_store().await;
    let gateway = RecordingGateway::new();
    let app = App::new(test_config(""), store, gateway.clone());
    (app, gateway)
}
