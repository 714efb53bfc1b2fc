mod schema;

pub use schema::{
    Bounds, BenchmarkWeights, ContextWindowParams, HfAgeParams, HfDownloadsParams, HfLikesParams,
    HfScoreParams, PriceParams, ScoreWeights, ScoringConfig, SizePerfRatioParams,
    TechnicalScoreParams, ARCHITECTURE_DEFAULT_KEY,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/modelrank/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("modelrank")
}

/// Get the default config file path (~/.config/modelrank/scoring.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("scoring.yaml")
}

/// Load the scoring configuration from a YAML file.
///
/// # Arguments
///
/// * `path` - Optional path to a config file. If None, the default path is
///   used when it exists; otherwise the built-in defaults apply.
///
/// # Errors
///
/// Returns an error if an explicitly given config file does not exist,
/// cannot be read, or cannot be parsed.
pub fn load_config(path: Option<PathBuf>) -> Result<ScoringConfig> {
    let config_path = match path {
        Some(p) => p,
        None => {
            let default_path = get_config_path();
            if !default_path.exists() {
                // No file anywhere: the built-in reference configuration.
                return Ok(ScoringConfig::default());
            }
            default_path
        }
    };

    if !config_path.exists() {
        anyhow::bail!("Config file not found at {}", config_path.display());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: ScoringConfig = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Validate a scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.score_scale <= 0.0 {
        errors.push("score_scale: must be positive".to_string());
    }

    if config.score_bounds.min > config.score_bounds.max {
        errors.push(format!(
            "score_bounds: min {} exceeds max {}",
            config.score_bounds.min, config.score_bounds.max
        ));
    }

    // The four category maxima define the overall scale
    let total = config.score_weights.total();
    if (total - config.score_scale).abs() > f64::EPSILON {
        errors.push(format!(
            "score_weights: categories sum to {} but score_scale is {}",
            total, config.score_scale
        ));
    }

    for (category, table) in [
        ("entity_benchmarks", &config.benchmark_weights.entity_benchmarks),
        ("dev_benchmarks", &config.benchmark_weights.dev_benchmarks),
    ] {
        for (name, weight) in table {
            if *weight <= 0.0 {
                errors.push(format!(
                    "benchmark_weights.{}.{}: weight must be positive, got {}",
                    category, name, weight
                ));
            }
        }
    }

    for (metric, bounds) in &config.community_score_bounds {
        if bounds.min > bounds.max {
            errors.push(format!(
                "community_score_bounds.{}: min {} exceeds max {}",
                metric, bounds.min, bounds.max
            ));
        }
    }

    let price = &config.technical_score_params.price;
    if price.high_price_points > price.max_points {
        errors.push(format!(
            "technical_score_params.price: high_price_points {} exceeds max_points {}",
            price.high_price_points, price.max_points
        ));
    }

    let context = &config.technical_score_params.context_window;
    if context.log_base <= 1.0 {
        errors.push(format!(
            "technical_score_params.context_window: log_base must exceed 1, got {}",
            context.log_base
        ));
    }
    if context.low_cw_points > context.max_points {
        errors.push(format!(
            "technical_score_params.context_window: low_cw_points {} exceeds max_points {}",
            context.low_cw_points, context.max_points
        ));
    }

    let ratio = &config.technical_score_params.size_perf_ratio;
    if ratio.base_points > ratio.max_points {
        errors.push(format!(
            "technical_score_params.size_perf_ratio: base_points {} exceeds max_points {}",
            ratio.base_points, ratio.max_points
        ));
    }
    for (limit, factor) in &ratio.size_tiers {
        if *factor <= 0.0 {
            errors.push(format!(
                "technical_score_params.size_perf_ratio.size_tiers.{}: factor must be positive, got {}",
                limit, factor
            ));
        }
    }

    if !config
        .architecture_factors
        .contains_key(ARCHITECTURE_DEFAULT_KEY)
    {
        errors.push("architecture_factors: missing 'default' entry".to_string());
    }
    for (keyword, factor) in &config.architecture_factors {
        if *factor <= 0.0 {
            errors.push(format!(
                "architecture_factors.{}: factor must be positive, got {}",
                keyword, factor
            ));
        }
        if keyword != &keyword.to_lowercase() {
            errors.push(format!(
                "architecture_factors.{}: keywords must be lower-case",
                keyword
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_scale() {
        let mut config = ScoringConfig::default();
        config.score_weights.community_score = 25.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("score_weights")));
    }

    #[test]
    fn test_missing_default_architecture_factor() {
        let mut config = ScoringConfig::default();
        config.architecture_factors.remove(ARCHITECTURE_DEFAULT_KEY);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("'default'")));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.score_weights.community_score = 25.0; // error 1
        config.technical_score_params.context_window.log_base = 1.0; // error 2
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_degenerate_community_bounds_allowed() {
        let mut config = ScoringConfig::default();
        config
            .community_score_bounds
            .insert("lm_sys_arena_score".to_string(), Bounds { min: 1200.0, max: 1200.0 });
        // min == max is a legal (degenerate) range; the engine guards it
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        let result = load_config(Some(PathBuf::from("/nonexistent/scoring.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "score_scale: 100").unwrap();
        writeln!(file, "architecture_factors:").unwrap();
        writeln!(file, "  moe: 1.5").unwrap();
        writeln!(file, "  default: 1.0").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.architecture_factor("moe"), 1.5);
        // Tables not present in the file keep their defaults
        assert_eq!(config.score_weights.entity_benchmarks, 30.0);
    }
}
