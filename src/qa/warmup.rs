use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::llm::LlmProvider;

const WARMUP_PROMPT: &str = "Ready?";

/// Fire one throwaway prompt in the background so the model is loaded before
/// the first real question. Failures are logged at debug and dropped.
pub fn spawn_warmup(llm: Arc<dyn LlmProvider>, model: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        match llm.generate(WARMUP_PROMPT, &model).await {
            Ok(_) => tracing::info!("Model '{}' warmed up in {:?}", model, started.elapsed()),
            Err(err) => tracing::debug!("Model warm-up failed: {}", err),
        }
    })
}

/// Start the warm-up and give it `grace` to get going; never waits for it
/// to finish.
pub async fn warm_model(llm: Arc<dyn LlmProvider>, model: &str, grace: Duration) {
    let _handle = spawn_warmup(llm, model.to_string());
    tokio::time::sleep(grace).await;
}
