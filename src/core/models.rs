use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest text a user may save, in characters.
pub const MAX_SAVED_TEXT_CHARS: usize = 1024;

/// Slack user ID (`U012AB3CD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slack mention markup for this user.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a posted Slack message: its channel plus its `ts`.
///
/// The text form `<channel>/<ts>` is what the reveal button carries and what
/// the store is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MessageId {
    pub channel: String,
    pub ts: String,
}

impl MessageId {
    #[must_use]
    pub fn new(channel: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ts: ts.into(),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.ts)
    }
}

impl FromStr for MessageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (channel, ts) = s
            .split_once('/')
            .ok_or_else(|| format!("message id '{s}' is missing '/'"))?;

        let valid_channel =
            !channel.is_empty() && channel.chars().all(|c| c.is_ascii_alphanumeric());
        let valid_ts = !ts.is_empty() && ts.chars().all(|c| c.is_ascii_digit() || c == '.');
        if !valid_channel || !valid_ts {
            return Err(format!("malformed message id '{s}'"));
        }

        Ok(Self::new(channel, ts))
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for MessageId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub saved_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whisper {
    pub owner: UserId,
    pub viewer: UserId,
    pub text: String,
    pub once: bool,
    #[serde(default)]
    pub created_at: i64,
}

impl Whisper {
    #[must_use]
    pub fn can_view(&self, user: &UserId) -> bool {
        *user == self.owner || *user == self.viewer
    }
}

/// Result of a viewer pressing the reveal button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    NotFound,
    Unauthorized,
    /// `consumed` is true when the press destroyed a one-time whisper.
    Revealed { whisper: Whisper, consumed: bool },
}
