use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::error;
use whisperbot::core::config::AppConfig;
use whisperbot::{App, api};

#[tokio::main]
async fn main() -> Result<(), Error> {
    whisperbot::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let app = Arc::new(App::from_config(config).await.map_err(|e| {
        error!("Failed to start: {}", e);
        Error::from(e)
    })?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let app = Arc::clone(&app);
        async move { api::function_handler(&app, event).await }
    }))
    .await
}
