/// Whisperbot - a Slack bot that lets users save a piece of text and whisper
/// it privately to someone else behind a "Read whisper" button.
///
/// # Architecture
///
/// A single API Lambda receives Slack slash commands and button presses:
/// - `api` verifies Slack signatures and routes requests
/// - `commands` implements `/view-text`, `/save-text`, `/remove-text` and `/whisper`
/// - `api::interactive_handler` reveals whispers when their button is pressed
/// - `store` keeps saved text and pending whispers, persisted to a JSON file
///   or SSM Parameter Store
/// - `slack` talks to the Slack Web API through slack-morphism and reqwest
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use whisperbot::store::{MemoryPersistence, WhisperStore};
/// use whisperbot::core::models::UserId;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     whisperbot::setup_logging();
///
///     let store = WhisperStore::open(Arc::new(MemoryPersistence::new())).await?;
///     let alice = UserId::new("U0ALICE");
///     store.save_text(&alice, "meet me at noon").await?;
///
///     let reply = whisperbot::commands::text::view_text(&store, "", &alice).await;
///     println!("{}", reply.embed.description);
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod app;
pub mod commands;
pub mod core;
pub mod errors;
pub mod replies;
pub mod slack;
pub mod store;

pub use app::App;
pub use errors::WhisperError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called once at cold start.
/// Calling it again is harmless.
///
/// # Example
///
/// ```
/// whisperbot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
