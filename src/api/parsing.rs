use serde_json::Value;

use crate::commands::Invocation;
use crate::core::models::UserId;
use crate::errors::WhisperError;
use crate::slack::command_parser::{decode_url_component, parse_form_data, unescape_slack_text};

pub fn is_interactive_body(body: &str) -> bool {
    body.starts_with("payload=") || body.contains("&payload=")
}

/// # Errors
///
/// Returns a `ParseError` if the `payload` field is missing or not JSON.
pub fn parse_interactive_payload(form_body: &str) -> Result<Value, WhisperError> {
    for pair in form_body.split('&') {
        if let Some((key, raw_val)) = pair.split_once('=')
            && key == "payload"
        {
            let decoded = decode_url_component(raw_val)
                .map_err(|e| WhisperError::ParseError(format!("Failed to decode payload: {e}")))?;
            let v: Value = serde_json::from_str(&decoded)
                .map_err(|e| WhisperError::ParseError(format!("Invalid JSON payload: {e}")))?;
            return Ok(v);
        }
    }
    Err(WhisperError::ParseError("Missing payload field".to_string()))
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn v_array<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    v_path(root, path).and_then(|v| v.as_array())
}

/// Parses a slash command body into an [`Invocation`]. The command text is
/// returned as the user typed it, with Slack's entity escaping undone.
///
/// # Errors
///
/// Returns a `ParseError` if the form cannot be decoded or lacks the user or
/// command name.
pub fn parse_invocation(body: &str) -> Result<Invocation, WhisperError> {
    let event = parse_form_data(body)
        .map_err(|e| WhisperError::ParseError(format!("Failed to parse form data: {e}")))?;

    if event.user_id.is_empty() || event.command.is_empty() {
        return Err(WhisperError::ParseError(
            "Slash command is missing user_id or command".to_string(),
        ));
    }

    Ok(Invocation {
        user_id: UserId::new(event.user_id),
        channel_id: event.channel_id,
        command: event.command,
        text: unescape_slack_text(&event.text),
    })
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_interactive_bodies() {
        assert!(is_interactive_body("payload=%7B%7D"));
        assert!(is_interactive_body("token=x&payload=%7B%7D"));
        assert!(!is_interactive_body("command=%2Fwhisper&text="));
    }

    #[test]
    fn decodes_interactive_payload() {
        let body = "payload=%7B%22type%22%3A%22block_actions%22%7D";
        let payload = parse_interactive_payload(body).unwrap();
        assert_eq!(v_str(&payload, &["type"]), Some("block_actions"));
    }

    #[test]
    fn missing_payload_is_parse_error() {
        assert!(matches!(
            parse_interactive_payload("foo=bar"),
            Err(WhisperError::ParseError(_))
        ));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = json!({ "x-slack-signature": "v0=abc" });
        assert_eq!(
            get_header_value(&headers, "X-Slack-Signature"),
            Some("v0=abc")
        );
    }

    #[test]
    fn invocation_requires_user_and_command() {
        assert!(parse_invocation("text=hello").is_err());

        let inv =
            parse_invocation("user_id=U1&channel_id=C1&command=%2Fsave-text&text=hi+there")
                .unwrap();
        assert_eq!(inv.user_id, UserId::new("U1"));
        assert_eq!(inv.command, "/save-text");
        assert_eq!(inv.text, "hi there");
    }

    #[test]
    fn invocation_text_is_unescaped() {
        let inv = parse_invocation(
            "user_id=U1&command=%2Fsave-text&text=fish+%26amp%3B+chips+%26lt%3B3+%26gt%3B",
        )
        .unwrap();
        assert_eq!(inv.text, "fish & chips <3 >");
    }
}
