use std::env;
use std::path::PathBuf;

use crate::errors::WhisperError;

const DEFAULT_BACKEND: &str = "ssm";
// `/var/task` is read-only on Lambda; `/tmp` is the only writable path.
const DEFAULT_USERS_FILE: &str = "/tmp/users.json";
const DEFAULT_PARAM_PREFIX: &str = "/whisperbot/";

/// Where the whisper store keeps its state between cold starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    File(PathBuf),
    Ssm { prefix: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_signing_secret: String,
    pub slack_bot_token: String,
    pub command_prefix: String,
    pub store: StoreBackend,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns a `ConfigError` when a required variable is missing or
    /// `STORE_BACKEND` names an unknown backend.
    pub fn from_env() -> Result<Self, WhisperError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WhisperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| WhisperError::ConfigError(format!("{key}: not set")))
        };

        let store = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "file" => StoreBackend::File(PathBuf::from(
                lookup("USERS_FILE").unwrap_or_else(|| DEFAULT_USERS_FILE.to_string()),
            )),
            "ssm" => StoreBackend::Ssm {
                prefix: lookup("STORE_PARAM_PREFIX")
                    .unwrap_or_else(|| DEFAULT_PARAM_PREFIX.to_string()),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(WhisperError::ConfigError(format!(
                    "STORE_BACKEND: unknown backend '{other}'"
                )));
            }
        };

        Ok(Self {
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            command_prefix: lookup("COMMAND_PREFIX").unwrap_or_default(),
            store,
        })
    }
}
