use std::sync::Arc;

use crate::core::config::{AppConfig, AppPaths, ConfigService, LoadedConfig};
use crate::llm::{LlmProvider, OllamaProvider};
use crate::qa::{PromptRunner, QaSession, QueryCache};
use crate::rag::{get_or_build_retriever, ContextBuilder, Retriever, StoreParams};

pub mod error;

use error::InitializationError;

/// Objects built once at startup and handed to the question loop.
///
/// Contains:
/// - Configuration and paths
/// - The model provider (shared with the warm-up task)
/// - The retriever over the persisted review collection
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub llm: Arc<dyn LlmProvider>,
    pub retriever: Arc<dyn Retriever>,
}

impl AppState {
    /// Loads configuration only; logging needs the paths before anything
    /// else runs. Load warnings are returned for the caller to log once a
    /// subscriber is installed.
    pub fn load_config(
        paths: Arc<AppPaths>,
    ) -> Result<(Arc<AppPaths>, LoadedConfig<AppConfig>), InitializationError> {
        let loaded = ConfigService::new(paths.clone())
            .app_config()
            .map_err(InitializationError::Config)?;
        let paths = Arc::new(
            paths
                .as_ref()
                .clone()
                .with_log_dir(&loaded.config.logging.dir),
        );
        Ok((paths, loaded))
    }

    pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, InitializationError> {
        let provider = OllamaProvider::new(&config.llm.base_url, config.llm.request_timeout())
            .map_err(InitializationError::Llm)?;
        Ok(Arc::new(provider))
    }

    /// Initializes the application state.
    ///
    /// 1. Connects the model provider and checks it is reachable
    /// 2. Opens the vector store, building it from the dataset when missing
    pub async fn initialize(
        paths: Arc<AppPaths>,
        config: AppConfig,
    ) -> Result<Self, InitializationError> {
        let llm = Self::build_provider(&config)?;

        match llm.health_check().await {
            Ok(true) => tracing::info!("{} reachable at {}", llm.name(), config.llm.base_url),
            _ => tracing::warn!(
                "{} not reachable at {}; questions will fail until it is",
                llm.name(),
                config.llm.base_url
            ),
        }

        let params = StoreParams::from_config(&config, &paths);
        let retriever = get_or_build_retriever(&params, config.retrieval.k, llm.clone())
            .await
            .map_err(InitializationError::Store)?;

        Ok(AppState {
            paths,
            config,
            llm,
            retriever: Arc::new(retriever),
        })
    }

    pub fn session(&self) -> QaSession {
        QaSession::new(
            self.retriever.clone(),
            QueryCache::new(self.config.cache.max_entries),
            ContextBuilder::new(self.config.retrieval.max_context_chars),
            PromptRunner::new(self.llm.clone(), self.config.llm.model.clone()),
        )
    }
}
