use serde_json::{Map, Value};

use crate::core::errors::QaError;

pub fn validate_config(config: &Value) -> Result<(), QaError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(dataset) = expect_optional_object(root, "dataset")? {
        validate_non_empty_string_field(dataset, "dataset.csv_path", "csv_path")?;
    }

    if let Some(store) = expect_optional_object(root, "vector_store")? {
        validate_non_empty_string_field(store, "vector_store.db_location", "db_location")?;
        validate_non_empty_string_field(
            store,
            "vector_store.collection_name",
            "collection_name",
        )?;
        validate_non_empty_string_field(store, "vector_store.embed_model", "embed_model")?;
        validate_u64_field(store, "vector_store.embed_batch_size", "embed_batch_size", 1, 4096)?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_u64_field(retrieval, "retrieval.k", "k", 1, 100)?;
        validate_u64_field(
            retrieval,
            "retrieval.max_context_chars",
            "max_context_chars",
            1,
            1_000_000,
        )?;
    }

    if let Some(cache) = expect_optional_object(root, "cache")? {
        validate_u64_field(cache, "cache.max_entries", "max_entries", 1, 100_000)?;
    }

    if let Some(llm) = expect_optional_object(root, "llm")? {
        validate_non_empty_string_field(llm, "llm.base_url", "base_url")?;
        validate_non_empty_string_field(llm, "llm.model", "model")?;
        validate_u64_field(
            llm,
            "llm.request_timeout_secs",
            "request_timeout_secs",
            1,
            86_400,
        )?;
    }

    if let Some(warmup) = expect_optional_object(root, "warmup")? {
        validate_bool_field(warmup, "warmup.enabled", "enabled")?;
        validate_u64_field(warmup, "warmup.grace_ms", "grace_ms", 0, 60_000)?;
    }

    if let Some(logging) = expect_optional_object(root, "logging")? {
        validate_non_empty_string_field(logging, "logging.dir", "dir")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, QaError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(config_type_error(key, "object")),
        None => Ok(None),
    }
}

fn validate_bool_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), QaError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.as_bool().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "boolean"))
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), QaError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(QaError::Config(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}

fn validate_non_empty_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), QaError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(QaError::Config(format!(
            "Invalid config at '{}': value cannot be empty",
            path
        )));
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> QaError {
    QaError::Config(format!(
        "Invalid config at '{}': expected {}",
        path, expected
    ))
}
