use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::defaults::generate_default_config;
use super::paths::AppPaths;
use super::settings::AppConfig;
use super::validation::validate_config;
use crate::core::errors::QaError;

/// Merged configuration plus anything worth warning about while loading it.
///
/// Config is read before logging exists, so warnings are handed back to the
/// caller instead of being emitted here.
#[derive(Debug, Clone)]
pub struct LoadedConfig<T> {
    pub config: T,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    /// Built-in defaults overlaid with the YAML file, validated.
    pub fn load_config(&self) -> Result<LoadedConfig<Value>, QaError> {
        let mut warnings = Vec::new();
        let file_config = match load_yaml_file(&self.paths.config_path) {
            Ok(value) => value,
            Err(warning) => {
                warnings.push(warning);
                Value::Object(Map::new())
            }
        };
        validate_config(&file_config)?;
        Ok(LoadedConfig {
            config: deep_merge(&generate_default_config(), &file_config),
            warnings,
        })
    }

    pub fn app_config(&self) -> Result<LoadedConfig<AppConfig>, QaError> {
        let loaded = self.load_config()?;
        let config =
            serde_json::from_value(loaded.config).map_err(|e| QaError::Config(e.to_string()))?;
        Ok(LoadedConfig {
            config,
            warnings: loaded.warnings,
        })
    }
}

/// The file's mapping, an empty mapping when absent, or the reason it was
/// ignored.
fn load_yaml_file(path: &Path) -> Result<Value, String> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config {}: {}", path.display(), err))?;
    match serde_yaml::from_str::<Value>(&contents) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(Value::Null) => Ok(Value::Object(Map::new())),
        Ok(_) => Err(format!(
            "Ignoring {}: top level is not a mapping",
            path.display()
        )),
        Err(err) => Err(format!(
            "Ignoring unparsable config {}: {}",
            path.display(),
            err
        )),
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}
