use std::time::Duration;

use serde::Deserialize;

use super::defaults::*;

/// Typed view over the merged YAML configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetSettings,
    pub vector_store: VectorStoreSettings,
    pub retrieval: RetrievalSettings,
    pub cache: CacheSettings,
    pub llm: LlmSettings,
    pub warmup: WarmupSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    pub csv_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreSettings {
    pub db_location: String,
    pub collection_name: String,
    pub embed_model: String,
    pub embed_batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    pub k: usize,
    pub max_context_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

impl LlmSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarmupSettings {
    pub enabled: bool,
    pub grace_ms: u64,
}

impl WarmupSettings {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetSettings {
                csv_path: DEFAULT_CSV_PATH.to_string(),
            },
            vector_store: VectorStoreSettings {
                db_location: DEFAULT_DB_LOCATION.to_string(),
                collection_name: DEFAULT_COLLECTION_NAME.to_string(),
                embed_model: DEFAULT_EMBED_MODEL.to_string(),
                embed_batch_size: 64,
            },
            retrieval: RetrievalSettings {
                k: DEFAULT_K,
                max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            },
            cache: CacheSettings {
                max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            },
            llm: LlmSettings {
                base_url: DEFAULT_OLLAMA_URL.to_string(),
                model: DEFAULT_LLM_MODEL.to_string(),
                request_timeout_secs: 120,
            },
            warmup: WarmupSettings {
                enabled: true,
                grace_ms: 50,
            },
            logging: LoggingSettings {
                dir: "logs".to_string(),
            },
        }
    }
}
