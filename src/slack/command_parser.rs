use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structure representing a Slack slash command event.
/// This contains the fields Slack sends when a user invokes a slash command.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlackCommandEvent {
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// Decodes a URL-encoded form component, treating `+` as a space.
///
/// # Errors
///
/// Returns an error message if the decoded bytes are not valid UTF-8.
///
/// # Examples
///
/// ```
/// use whisperbot::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("1%2B1").unwrap(), "1+1");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, String> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Undoes the HTML escaping Slack applies to user-typed `&`, `<` and `>` in
/// slash command text.
///
/// # Examples
///
/// ```
/// use whisperbot::slack::command_parser::unescape_slack_text;
///
/// assert_eq!(unescape_slack_text("a &amp; b &lt;3 &gt;_&lt;"), "a & b <3 >_<");
/// assert_eq!(unescape_slack_text("&amp;lt;"), "&lt;");
/// ```
#[must_use]
pub fn unescape_slack_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Parses URL-encoded form data into a `SlackCommandEvent`.
///
/// Missing fields default to empty strings.
///
/// # Errors
///
/// Returns an error message if a key or value cannot be decoded.
///
/// # Examples
///
/// ```
/// use whisperbot::slack::command_parser::parse_form_data;
///
/// let form_data = "team_id=T123&channel_id=C123&user_id=U123&\
///                  user_name=alice&command=%2Fsave-text&text=hello+there&\
///                  response_url=https%3A%2F%2Fhooks.slack.com%2F&\
///                  trigger_id=123.456";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/save-text");
/// assert_eq!(event.text, "hello there");
/// ```
pub fn parse_form_data(form_data: &str) -> Result<SlackCommandEvent, String> {
    let mut map: HashMap<String, String> = HashMap::new();

    for pair in form_data.split('&') {
        if let Some(idx) = pair.find('=') {
            let key = decode_url_component(&pair[..idx])
                .map_err(|e| format!("Failed to decode key: {e}"))?;

            let value = decode_url_component(&pair[idx + 1..])
                .map_err(|e| format!("Failed to decode value: {e}"))?;

            map.insert(key, value);
        }
    }

    let mut field = |name: &str| map.remove(name).unwrap_or_default();

    Ok(SlackCommandEvent {
        team_id: field("team_id"),
        channel_id: field("channel_id"),
        user_id: field("user_id"),
        user_name: field("user_name"),
        command: field("command"),
        text: field("text"),
        response_url: field("response_url"),
        trigger_id: field("trigger_id"),
    })
}
