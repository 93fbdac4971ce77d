//! SSM Parameter Store backend: one `SecureString` parameter per record.
//!
//! Layout under the configured prefix:
//! - `users/<user_id>` holds a serialized [`User`]
//! - `whispers/<channel>/<ts>` holds a serialized [`Whisper`]

use async_trait::async_trait;
use aws_sdk_ssm::{
    Client as SsmClient,
    types::{ParameterTier, ParameterType},
};
use tracing::{debug, info, warn};

use super::persistence::{Snapshot, StoreChange, StorePersistence};
use crate::core::models::{MessageId, User, UserId, Whisper};
use crate::errors::WhisperError;

const USERS_DIR: &str = "users/";
const WHISPERS_DIR: &str = "whispers/";

pub struct SsmStore {
    client: SsmClient,
    prefix: String,
}

fn normalize_prefix(prefix: &str) -> String {
    let mut p = prefix.to_string();
    if !p.starts_with('/') {
        p.insert(0, '/');
    }
    if !p.ends_with('/') {
        p.push('/');
    }
    p
}

fn user_key(prefix: &str, id: &UserId) -> String {
    format!("{prefix}{USERS_DIR}{id}")
}

fn whisper_key(prefix: &str, id: &MessageId) -> String {
    format!("{prefix}{WHISPERS_DIR}{}/{}", id.channel, id.ts)
}

/// Where a loaded parameter belongs, judged by its name.
enum ParamKind {
    User(UserId),
    Whisper(MessageId),
}

fn classify(prefix: &str, name: &str) -> Option<ParamKind> {
    let rest = name.strip_prefix(prefix)?;
    if let Some(user) = rest.strip_prefix(USERS_DIR) {
        return (!user.is_empty() && !user.contains('/'))
            .then(|| ParamKind::User(UserId::new(user)));
    }
    rest.strip_prefix(WHISPERS_DIR)
        .and_then(|id| id.parse::<MessageId>().ok())
        .map(ParamKind::Whisper)
}

impl SsmStore {
    /// Connects using the ambient AWS configuration.
    pub async fn connect(prefix: &str) -> Self {
        let shared = aws_config::from_env().load().await;
        Self::with_client(SsmClient::new(&shared), prefix)
    }

    #[must_use]
    pub fn with_client(client: SsmClient, prefix: &str) -> Self {
        Self {
            client,
            prefix: normalize_prefix(prefix),
        }
    }

    async fn put(&self, name: String, value: String) -> Result<(), WhisperError> {
        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::SecureString)
            .tier(ParameterTier::IntelligentTiering)
            .overwrite(true)
            .send()
            .await
            .map_err(|e| WhisperError::AwsError(format!("ssm put_parameter: {e}")))?;
        Ok(())
    }

    async fn delete(&self, name: String) -> Result<(), WhisperError> {
        match self.client.delete_parameter().name(&name).send().await {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found()) =>
            {
                debug!(%name, "Parameter already absent");
                Ok(())
            }
            Err(e) => Err(WhisperError::AwsError(format!("ssm delete_parameter: {e}"))),
        }
    }
}

#[async_trait]
impl StorePersistence for SsmStore {
    async fn load(&self) -> Result<Snapshot, WhisperError> {
        let mut snapshot = Snapshot::default();
        let mut next_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .get_parameters_by_path()
                .path(&self.prefix)
                .recursive(true)
                .with_decryption(true)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| WhisperError::AwsError(format!("ssm get_parameters_by_path: {e}")))?;

            for param in resp.parameters() {
                let (Some(name), Some(value)) = (param.name(), param.value()) else {
                    continue;
                };
                match classify(&self.prefix, name) {
                    Some(ParamKind::User(id)) => {
                        let user: User = serde_json::from_str(value)?;
                        snapshot.users.insert(id, user);
                    }
                    Some(ParamKind::Whisper(id)) => {
                        let whisper: Whisper = serde_json::from_str(value)?;
                        snapshot.whispers.insert(id, whisper);
                    }
                    None => warn!(%name, "Ignoring unrecognized store parameter"),
                }
            }

            match resp.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        info!(
            prefix = %self.prefix,
            users = snapshot.users.len(),
            whispers = snapshot.whispers.len(),
            "Loaded whisper store from SSM"
        );
        Ok(snapshot)
    }

    async fn persist(
        &self,
        snapshot: &Snapshot,
        change: &StoreChange,
    ) -> Result<(), WhisperError> {
        match change {
            StoreChange::User(id) => match snapshot.users.get(id) {
                Some(user) if user.saved_message.is_some() => {
                    self.put(user_key(&self.prefix, id), serde_json::to_string(user)?)
                        .await
                }
                _ => self.delete(user_key(&self.prefix, id)).await,
            },
            StoreChange::Whisper(id) => match snapshot.whispers.get(id) {
                Some(whisper) => {
                    self.put(
                        whisper_key(&self.prefix, id),
                        serde_json::to_string(whisper)?,
                    )
                    .await
                }
                None => self.delete(whisper_key(&self.prefix, id)).await,
            },
            StoreChange::WhisperRemoved(id) => self.delete(whisper_key(&self.prefix, id)).await,
        }
    }
}
