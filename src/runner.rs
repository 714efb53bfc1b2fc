//! Per-model scoring pipeline and the batch driver.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

use crate::config::ScoringConfig;
use crate::model::{load_model_record, ModelRecord};
use crate::output;
use crate::scoring::{ModelScorer, ScoreSet};

/// Everything produced by scoring one model: the sub-scores and the
/// validated input they were computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResults {
    pub model_name: String,
    pub scores: ScoreSet,
    pub input_data: ModelRecord,
}

/// Run the scoring pipeline for a single model: locate and load its record
/// from the models directory, validate and normalize it, then score it.
pub fn run_scoring(
    model_name: &str,
    models_directory: &Path,
    config: &ScoringConfig,
) -> Result<ScoringResults> {
    info!("Starting scoring process for model '{}'", model_name);

    let record = load_model_record(model_name, models_directory, config)?;

    let mut scorer = ModelScorer::new(model_name, config);
    let scores = scorer.score_record(&record);

    info!("Successfully completed scoring for model '{}'", model_name);
    Ok(ScoringResults {
        model_name: model_name.to_string(),
        scores,
        input_data: record,
    })
}

/// Persist one model's results as pretty-printed JSON, atomically so a
/// crash never leaves a truncated file behind.
pub fn save_results(results: &ScoringResults, results_directory: &Path) -> Result<()> {
    fs::create_dir_all(results_directory).with_context(|| {
        format!(
            "Failed to create results directory at {}",
            results_directory.display()
        )
    })?;

    let path = results_directory.join(format!("{}_results.json", results.model_name));
    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, results).context("Failed to serialize results")?;
    file.commit().context("Failed to save results")?;

    Ok(())
}

/// Process a batch of models sequentially.
///
/// A failure on one model is logged and does not abort the batch. Each
/// success is persisted to `<results_directory>/<name>_results.json` and
/// reported: a full breakdown per model normally, a bare `name: score` line
/// in quiet mode, followed by a ranked leaderboard across the batch.
pub fn batch_process_models(
    model_names: &[String],
    models_directory: &Path,
    results_directory: &Path,
    quiet: bool,
    config: &ScoringConfig,
) -> Vec<ScoringResults> {
    let start_time = Instant::now();
    let total_models = model_names.len();
    let use_colors = output::should_use_colors();
    let mut all_results = Vec::new();

    if total_models == 1 {
        info!("Processing single model");
    } else {
        info!("Batch processing {} models", total_models);
    }

    for (index, model_name) in model_names.iter().enumerate() {
        if total_models > 1 {
            info!("Model {}/{}: {}", index + 1, total_models, model_name);
        }

        match run_scoring(model_name, models_directory, config) {
            Ok(results) => {
                if let Err(e) = save_results(&results, results_directory) {
                    error!("Failed to save results for {}: {:#}", model_name, e);
                }
                if quiet {
                    println!("{}", output::format_final_line(&results));
                } else {
                    println!(
                        "{}",
                        output::format_breakdown(&results, &config.score_weights, use_colors)
                    );
                }
                all_results.push(results);
            }
            Err(e) => {
                error!("Failed to generate results for {}: {:#}", model_name, e);
            }
        }
    }

    if !quiet && all_results.len() > 1 {
        println!();
        println!(
            "{}",
            output::format_leaderboard(&all_results, use_colors)
        );
    }

    if !quiet {
        info!(
            "Processed {}/{} models in {:.2?}",
            all_results.len(),
            total_models,
            start_time.elapsed()
        );
    }

    all_results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::{REQUIRED_DEV_BENCHMARKS, REQUIRED_ENTITY_BENCHMARKS};
    use serde_json::{json, Value};
    use std::io::Write;

    fn full_record(arena: Option<f64>, hf: Option<f64>) -> Value {
        let mut entity = serde_json::Map::new();
        for name in REQUIRED_ENTITY_BENCHMARKS {
            entity.insert(name.to_string(), Value::Null);
        }
        entity.insert("artificial_analysis".to_string(), json!(85));
        entity.insert("OpenCompass".to_string(), json!(90));

        let mut dev = serde_json::Map::new();
        for name in REQUIRED_DEV_BENCHMARKS {
            dev.insert(name.to_string(), Value::Null);
        }

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
                "lm_sys_arena_score": arena,
                "hf_score": hf
            }
        })
    }

    fn write_model(dir: &Path, name: &str, data: &Value) {
        let mut file = fs::File::create(dir.join(format!("{}.json", name))).unwrap();
        write!(file, "{}", serde_json::to_string(data).unwrap()).unwrap();
    }

    #[test]
    fn test_run_scoring_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "TestModel", &full_record(Some(1300.0), Some(8.5)));

        let config = ScoringConfig::default();
        let results = run_scoring("TestModel", dir.path(), &config).unwrap();

        // Entity: (0.85*10 + 0.90*10)/20 * 30 = 26.25; dev: nothing evaluated
        assert_eq!(results.scores.entity_score, 26.25);
        assert_eq!(results.scores.dev_score, 0.0);
        assert_eq!(results.scores.community_score, 14.5);
        // Technical: 7.475 + 3.778 + (1 + 5 * 0.875 * 0.95) = 16.41
        assert_eq!(results.scores.technical_score, 16.41);
        let expected_final = 26.25 + 0.0 + 14.5 + 16.41;
        assert!((results.scores.final_score - expected_final).abs() < 1e-4);
    }

    #[test]
    fn test_run_scoring_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoringConfig::default();
        assert!(run_scoring("Nope", dir.path(), &config).is_err());
    }

    #[test]
    fn test_save_and_reload_results() {
        let models = tempfile::tempdir().unwrap();
        let results_dir = tempfile::tempdir().unwrap();
        write_model(models.path(), "TestModel", &full_record(None, None));

        let config = ScoringConfig::default();
        let results = run_scoring("TestModel", models.path(), &config).unwrap();
        save_results(&results, results_dir.path()).unwrap();

        let path = results_dir.path().join("TestModel_results.json");
        let loaded: ScoringResults =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded.model_name, "TestModel");
        assert_eq!(loaded.scores, results.scores);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let models = tempfile::tempdir().unwrap();
        let results_dir = tempfile::tempdir().unwrap();
        write_model(models.path(), "Good", &full_record(Some(1300.0), None));
        // "Bad" has no file at all; "Broken" fails validation
        let mut broken = full_record(None, None);
        broken["model_specs"]["price"] = json!(-1.0);
        write_model(models.path(), "Broken", &broken);

        let config = ScoringConfig::default();
        let names: Vec<String> = ["Good", "Bad", "Broken"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results =
            batch_process_models(&names, models.path(), results_dir.path(), true, &config);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].model_name, "Good");
        assert!(results_dir.path().join("Good_results.json").exists());
        assert!(!results_dir.path().join("Broken_results.json").exists());
    }
}
