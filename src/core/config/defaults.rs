use serde_json::{json, Value};

pub const DEFAULT_CSV_PATH: &str = "data/realistic_restaurant_reviews.csv";
pub const DEFAULT_DB_LOCATION: &str = "./chrome_langchain_db";
pub const DEFAULT_COLLECTION_NAME: &str = "restaurant_reviews";
pub const DEFAULT_EMBED_MODEL: &str = "mxbai-embed-large";
pub const DEFAULT_LLM_MODEL: &str = "llama3.2";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_K: usize = 3;
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 1500;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 100;

pub fn generate_default_config() -> Value {
    json!({
        "dataset": {
            "csv_path": DEFAULT_CSV_PATH,
        },
        "vector_store": {
            "db_location": DEFAULT_DB_LOCATION,
            "collection_name": DEFAULT_COLLECTION_NAME,
            "embed_model": DEFAULT_EMBED_MODEL,
            "embed_batch_size": 64,
        },
        "retrieval": {
            "k": DEFAULT_K,
            "max_context_chars": DEFAULT_MAX_CONTEXT_CHARS,
        },
        "cache": {
            "max_entries": DEFAULT_CACHE_MAX_ENTRIES,
        },
        "llm": {
            "base_url": DEFAULT_OLLAMA_URL,
            "model": DEFAULT_LLM_MODEL,
            "request_timeout_secs": 120,
        },
        "warmup": {
            "enabled": true,
            "grace_ms": 50,
        },
        "logging": {
            "dir": "logs",
        },
    })
}
