//! Process-wide state shared by every request a warm Lambda handles.

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::{AppConfig, StoreBackend};
use crate::errors::WhisperError;
use crate::slack::{ChatGateway, SlackClient};
use crate::store::{JsonFileStore, MemoryPersistence, SsmStore, StorePersistence, WhisperStore};

pub struct App {
    pub config: AppConfig,
    pub store: WhisperStore,
    pub gateway: Arc<dyn ChatGateway>,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig, store: WhisperStore, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            config,
            store,
            gateway,
        }
    }

    /// Opens the configured store and connects to Slack.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted store cannot be loaded.
    pub async fn from_config(config: AppConfig) -> Result<Self, WhisperError> {
        let persistence: Arc<dyn StorePersistence> = match &config.store {
            StoreBackend::File(path) => Arc::new(JsonFileStore::new(path.clone())),
            StoreBackend::Ssm { prefix } => Arc::new(SsmStore::connect(prefix).await),
            StoreBackend::Memory => {
                warn!("Using in-memory store; whispers are lost on cold start");
                Arc::new(MemoryPersistence::new())
            }
        };
        let store = WhisperStore::open(persistence).await?;

        let slack = SlackClient::new(config.slack_bot_token.clone());
        match slack.get_bot_user_id().await {
            Ok(bot_user) => info!("Ready as {}!", bot_user),
            Err(e) => warn!("Could not resolve bot identity: {}", e),
        }

        Ok(Self::new(config, store, Arc::new(slack)))
    }
}
