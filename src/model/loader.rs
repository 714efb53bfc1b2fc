use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::types::ModelRecord;
use super::validation::validate_record;
use crate::config::ScoringConfig;

/// Locate the JSON file for a model in the models directory.
///
/// Tries an exact `<name>.json` match first, then falls back to a
/// case-insensitive search. Returns None when no file matches.
pub fn find_model_file(model_name: &str, models_directory: &Path) -> Option<PathBuf> {
    if !models_directory.exists() {
        error!(
            "Models directory '{}' not found",
            models_directory.display()
        );
        return None;
    }

    let target_exact = format!("{}.json", model_name);
    let target_lower = target_exact.to_lowercase();

    let entries: Vec<PathBuf> = match fs::read_dir(models_directory) {
        Ok(read_dir) => read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect(),
        Err(e) => {
            error!(
                "Could not read models directory '{}': {}",
                models_directory.display(),
                e
            );
            return None;
        }
    };

    let file_name = |path: &Path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
    };

    // Exact (case-sensitive) match wins
    if let Some(path) = entries
        .iter()
        .find(|path| file_name(path).as_deref() == Some(target_exact.as_str()))
    {
        return Some(path.clone());
    }

    // Fallback: case-insensitive match
    if let Some(path) = entries.iter().find(|path| {
        file_name(path)
            .map(|name| name.to_lowercase() == target_lower)
            .unwrap_or(false)
    }) {
        return Some(path.clone());
    }

    error!("No JSON file found for model '{}'", model_name);
    None
}

/// Load and parse a JSON file into a raw value.
pub fn load_json_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file at {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON format in '{}'", path.display()))
}

/// Find, load and validate the record for one model.
///
/// Runs the complete intake pipeline: locate the file, parse the JSON,
/// validate structure and bounds (normalizing benchmark scores in place),
/// then decode into the typed record.
pub fn load_model_record(
    model_name: &str,
    models_directory: &Path,
    config: &ScoringConfig,
) -> Result<ModelRecord> {
    let path = find_model_file(model_name, models_directory)
        .with_context(|| format!("No JSON file found for model '{}'", model_name))?;

    let mut data = load_json_file(&path)?;
    validate_record(&mut data, model_name, config)?;

    let record: ModelRecord = serde_json::from_value(data)
        .with_context(|| format!("Failed to decode validated record for '{}'", model_name))?;

    debug!("Successfully validated data for model '{}'", model_name);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::{REQUIRED_DEV_BENCHMARKS, REQUIRED_ENTITY_BENCHMARKS};
    use serde_json::json;
    use std::io::Write;

    fn write_model_file(dir: &Path, file_name: &str, data: &Value) {
        let mut file = fs::File::create(dir.join(file_name)).unwrap();
        write!(file, "{}", serde_json::to_string_pretty(data).unwrap()).unwrap();
    }

    fn full_record() -> Value {
        let mut entity = serde_json::Map::new();
        for name in REQUIRED_ENTITY_BENCHMARKS {
            entity.insert(name.to_string(), Value::Null);
        }
        entity.insert("OpenCompass".to_string(), json!(90));

        let mut dev = serde_json::Map::new();
        for name in REQUIRED_DEV_BENCHMARKS {
            dev.insert(name.to_string(), Value::Null);
        }
        dev.insert("MMLU".to_string(), json!(75));

        json!({
            "entity_benchmarks": entity,
            "dev_benchmarks": dev,
            "model_specs": {
                "price": 1.5,
                "context_window": 131072,
                "param_count": 7_000_000_000.0_f64,
                "architecture": "dense"
            },
            "community_score": {
                "lm_sys_arena_score": 1250,
                "hf_score": 8.5
            }
        })
    }

    #[test]
    fn test_find_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        write_model_file(dir.path(), "Command A.json", &full_record());

        let found = find_model_file("Command A", dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "Command A.json");
    }

    #[test]
    fn test_find_case_insensitive_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write_model_file(dir.path(), "Command A.json", &full_record());

        let found = find_model_file("command a", dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "Command A.json");
    }

    #[test]
    fn test_exact_match_beats_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_model_file(dir.path(), "gemma.json", &full_record());
        write_model_file(dir.path(), "Gemma.json", &full_record());

        let found = find_model_file("Gemma", dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "Gemma.json");
    }

    #[test]
    fn test_find_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_model_file("Nope", dir.path()).is_none());
    }

    #[test]
    fn test_load_model_record_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        write_model_file(dir.path(), "TestModel.json", &full_record());

        let record =
            load_model_record("TestModel", dir.path(), &ScoringConfig::default()).unwrap();
        assert_eq!(record.entity_benchmarks["OpenCompass"], Some(0.9));
        assert_eq!(record.dev_benchmarks["MMLU"], Some(0.75));
        assert_eq!(record.model_specs.architecture, "dense");
    }

    #[test]
    fn test_load_model_record_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("Broken.json")).unwrap();
        write!(file, "{{ not json").unwrap();

        let result = load_model_record("Broken", dir.path(), &ScoringConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_model_record_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = full_record();
        data["model_specs"]["price"] = json!(-1.0);
        write_model_file(dir.path(), "BadPrice.json", &data);

        let result = load_model_record("BadPrice", dir.path(), &ScoringConfig::default());
        assert!(result.is_err());
    }
}
