//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Request validation (headers, body, signature)
//! - Interactive components (delegated to `interactive_handler` module)
//! - Slash commands (delegated to `slash_handler` module)

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::{helpers, interactive_handler, parsing, signature, slash_handler};
use crate::app::App;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails for a malformed request; those are answered with a 4xx
/// payload. The `Result` is what `lambda_runtime` expects.
#[tracing::instrument(level = "info", skip(app, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(app: &App, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(handle_request(app, &event.payload).await)
}

/// Routes one API Gateway request and returns the response payload.
pub async fn handle_request(app: &App, payload: &Value) -> Value {
    // ========================================================================
    // Extract and validate headers and body
    // ========================================================================

    let Some(headers) = payload.get("headers") else {
        error!("Request missing headers");
        return helpers::err_response(400, "Missing headers");
    };

    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return response,
    };

    // ========================================================================
    // Verify Slack signature
    // ========================================================================

    if let Err(response) = verify_signature(body, headers, &app.config.slack_signing_secret) {
        return response;
    }

    info!("Slack signature verified successfully");

    // ========================================================================
    // Route to specialized handlers
    // ========================================================================

    if parsing::is_interactive_body(body) {
        let payload = match parsing::parse_interactive_payload(body) {
            Ok(v) => v,
            Err(e) => {
                error!("Interactive payload parse error: {}", e);
                return helpers::err_response(400, &format!("Parse Error: {e}"));
            }
        };

        return interactive_handler::handle_interactive(app, &payload).await;
    }

    match slash_handler::handle_slash_command(app, body).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to parse Slack event: {}", e);
            helpers::err_response(400, &format!("Parse Error: {e}"))
        }
    }
}

// ============================================================================
// Request Validation Helpers
// ============================================================================

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}

fn verify_signature(body: &str, headers: &Value, signing_secret: &str) -> Result<(), Value> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    if !signature::verify_slack_signature(body, timestamp, sig, signing_secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}
