//! Response builders shared by the API handlers.

use serde_json::{Value, json};

use crate::replies::Reply;
use crate::slack::response_builder::create_response_payload;

/// Returns a 200 OK response with an empty body, acknowledging the request.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "body": "" })
}

/// Returns a 200 OK response whose body is the rendered reply.
#[must_use]
pub fn ok_reply(reply: &Reply) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "application/json" },
        "body": create_response_payload(reply).to_string()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}
