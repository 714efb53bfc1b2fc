use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::schema::{
    ARCHITECTURE_FIELD, CONTEXT_WINDOW_FIELD, REQUIRED_COMMUNITY_FIELDS, REQUIRED_DEV_BENCHMARKS,
    REQUIRED_ENTITY_BENCHMARKS, REQUIRED_SECTIONS, REQUIRED_SPEC_FIELDS,
};
use crate::config::ScoringConfig;

/// Structural validation failures for a model record. All variants carry the
/// model name so the batch driver can log and move on.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required section '{section}' in model data for '{model}'")]
    MissingSection { model: String, section: String },

    #[error("{detail}")]
    BenchmarkScore { model: String, detail: String },

    #[error("{detail}")]
    Specification { model: String, detail: String },

    #[error("{detail}")]
    CommunityScore { model: String, detail: String },
}

impl ValidationError {
    /// Name of the model the violation was found in.
    pub fn model(&self) -> &str {
        match self {
            ValidationError::MissingSection { model, .. }
            | ValidationError::BenchmarkScore { model, .. }
            | ValidationError::Specification { model, .. }
            | ValidationError::CommunityScore { model, .. } => model,
        }
    }
}

/// Validate a raw model record against the required schema and normalize
/// benchmark scores in place.
///
/// Checks run in order and stop at the first violation. On success, every
/// present benchmark score has been divided by `score_scale` exactly once --
/// validation is a single terminal step per record, so callers must not run
/// it twice on the same value.
pub fn validate_record(
    data: &mut Value,
    model_name: &str,
    config: &ScoringConfig,
) -> Result<(), ValidationError> {
    for section in REQUIRED_SECTIONS {
        if data.get(section).is_none() {
            return Err(ValidationError::MissingSection {
                model: model_name.to_string(),
                section: section.to_string(),
            });
        }
    }

    validate_benchmarks(
        data,
        "entity_benchmarks",
        REQUIRED_ENTITY_BENCHMARKS,
        model_name,
        config,
    )?;
    validate_benchmarks(
        data,
        "dev_benchmarks",
        REQUIRED_DEV_BENCHMARKS,
        model_name,
        config,
    )?;
    validate_model_specs(data, model_name)?;
    validate_community_score(data, model_name, config)?;

    Ok(())
}

/// Validate one benchmark section: mapping shape, required keys, numeric
/// values within bounds. Valid scores are normalized in place. A null value
/// means "benchmark not run" and is left untouched; a *missing* key is a
/// violation, distinct from null.
fn validate_benchmarks(
    data: &mut Value,
    section: &str,
    required: &[&str],
    model_name: &str,
    config: &ScoringConfig,
) -> Result<(), ValidationError> {
    let benchmark_error = |detail: String| ValidationError::BenchmarkScore {
        model: model_name.to_string(),
        detail,
    };

    let scores = data
        .get_mut(section)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            benchmark_error(format!(
                "Section '{}' must be a mapping in model '{}'",
                section, model_name
            ))
        })?;

    for field in required {
        let value = scores.get(*field).ok_or_else(|| {
            benchmark_error(format!(
                "Missing benchmark '{}' in {} for model '{}'",
                field, section, model_name
            ))
        })?;

        if value.is_null() {
            continue;
        }

        let score = value.as_f64().ok_or_else(|| {
            benchmark_error(format!(
                "Invalid score type for '{}' in {}: expected number, got {}",
                field,
                section,
                json_type_name(value)
            ))
        })?;

        if !config.score_bounds.contains(score) {
            return Err(benchmark_error(format!(
                "Score for '{}' in {} must be between {} and {}, got {}",
                field, section, config.score_bounds.min, config.score_bounds.max, score
            )));
        }

        scores.insert(field.to_string(), Value::from(score / config.score_scale));
    }

    Ok(())
}

/// Validate the `model_specs` section: every required field present,
/// architecture a non-blank string, context window a positive integer,
/// remaining numerics strictly positive.
fn validate_model_specs(data: &Value, model_name: &str) -> Result<(), ValidationError> {
    let spec_error = |detail: String| ValidationError::Specification {
        model: model_name.to_string(),
        detail,
    };

    let specs = data
        .get("model_specs")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            spec_error(format!(
                "Section 'model_specs' must be a mapping in model '{}'",
                model_name
            ))
        })?;

    for field in REQUIRED_SPEC_FIELDS {
        let value = specs.get(*field).ok_or_else(|| {
            spec_error(format!(
                "Missing specification '{}' in model_specs for '{}'",
                field, model_name
            ))
        })?;

        if *field == ARCHITECTURE_FIELD {
            let architecture = value.as_str().ok_or_else(|| {
                spec_error(format!(
                    "Invalid type for 'architecture' in model_specs for '{}': expected string, got {}",
                    model_name,
                    json_type_name(value)
                ))
            })?;
            if architecture.trim().is_empty() {
                return Err(spec_error(format!(
                    "Specification 'architecture' cannot be blank in model_specs for '{}'",
                    model_name
                )));
            }
            continue;
        }

        let number = value.as_f64().ok_or_else(|| {
            spec_error(format!(
                "Invalid type for '{}' in model_specs for '{}': expected number, got {}",
                field,
                model_name,
                json_type_name(value)
            ))
        })?;

        if number <= 0.0 {
            return Err(spec_error(format!(
                "Specification '{}' must be positive for '{}', got {}",
                field, model_name, number
            )));
        }

        if *field == CONTEXT_WINDOW_FIELD && value.as_u64().is_none() {
            return Err(spec_error(format!(
                "Specification 'context_window' must be an integer for '{}', got {}",
                model_name, number
            )));
        }
    }

    Ok(())
}

/// Validate the `community_score` section. Metric names without configured
/// bounds skip the range check with a warning rather than failing.
fn validate_community_score(
    data: &Value,
    model_name: &str,
    config: &ScoringConfig,
) -> Result<(), ValidationError> {
    let community_error = |detail: String| ValidationError::CommunityScore {
        model: model_name.to_string(),
        detail,
    };

    let scores = data
        .get("community_score")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            community_error(format!(
                "Community score section must be a mapping for model '{}'",
                model_name
            ))
        })?;

    for field in REQUIRED_COMMUNITY_FIELDS {
        let value = scores.get(*field).ok_or_else(|| {
            community_error(format!(
                "Missing community score field '{}' for model '{}'",
                field, model_name
            ))
        })?;

        if value.is_null() {
            continue;
        }

        let metric = value.as_f64().ok_or_else(|| {
            community_error(format!(
                "Invalid type for community score '{}' for model '{}': expected number, got {}",
                field,
                model_name,
                json_type_name(value)
            ))
        })?;

        match config.community_bounds(field) {
            Some(bounds) => {
                if !bounds.contains(metric) {
                    return Err(community_error(format!(
                        "Community score '{}' for model '{}' must be between {} and {}, got {}",
                        field, model_name, bounds.min, bounds.max, metric
                    )));
                }
            }
            None => {
                warn!(
                    "No bounds configured for community score field '{}' for model '{}'. Skipping bounds check.",
                    field, model_name
                );
            }
        }
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
