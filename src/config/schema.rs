use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scoring algorithm configuration.
///
/// Central hub for every tunable parameter of the scoring algorithm: category
/// weights, per-benchmark weights, bound ranges and formula coefficients.
/// Adjusting these values changes scoring outcomes without touching the
/// scoring logic itself.
///
/// Every field carries a built-in default, so a config file only needs to
/// name the tables it wants to override:
///
/// ```yaml
/// score_weights:
///   entity_benchmarks: 25
///   dev_benchmarks: 35
///   community_score: 20
///   technical_score: 20
/// architecture_factors:
///   moe: 1.3
///   default: 1.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Raw benchmark scores are divided by this to normalize into [0,1].
    #[serde(default = "default_score_scale")]
    pub score_scale: f64,

    /// Valid range for raw benchmark scores before normalization.
    #[serde(default = "default_score_bounds")]
    pub score_bounds: Bounds,

    /// Maximum point contribution of each category to the final score.
    /// Must sum to `score_scale`.
    #[serde(default)]
    pub score_weights: ScoreWeights,

    /// Relative importance of each named benchmark within its category.
    #[serde(default)]
    pub benchmark_weights: BenchmarkWeights,

    /// Valid range for each community metric, keyed by metric name.
    #[serde(default = "default_community_score_bounds")]
    pub community_score_bounds: BTreeMap<String, Bounds>,

    /// Coefficients for the three technical sub-scores.
    #[serde(default)]
    pub technical_score_params: TechnicalScoreParams,

    /// Multiplier per architecture keyword (lower-cased). The `default`
    /// entry is the fallback for unrecognized architectures.
    #[serde(default = "default_architecture_factors")]
    pub architecture_factors: BTreeMap<String, f64>,

    /// Coefficients for the offline Hugging Face engagement score.
    #[serde(default)]
    pub hf_score_params: HfScoreParams,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_scale: default_score_scale(),
            score_bounds: default_score_bounds(),
            score_weights: ScoreWeights::default(),
            benchmark_weights: BenchmarkWeights::default(),
            community_score_bounds: default_community_score_bounds(),
            technical_score_params: TechnicalScoreParams::default(),
            architecture_factors: default_architecture_factors(),
            hf_score_params: HfScoreParams::default(),
        }
    }
}

impl ScoringConfig {
    /// Look up the multiplicative factor for an architecture keyword,
    /// case-insensitively, falling back to the `default` entry.
    pub fn architecture_factor(&self, architecture: &str) -> f64 {
        let key = architecture.to_lowercase();
        self.architecture_factors
            .get(&key)
            .or_else(|| self.architecture_factors.get(ARCHITECTURE_DEFAULT_KEY))
            .copied()
            .unwrap_or(1.0)
    }

    /// Bounds configured for a community metric, if any.
    pub fn community_bounds(&self, metric: &str) -> Option<&Bounds> {
        self.community_score_bounds.get(metric)
    }
}

/// Fallback key in `architecture_factors`.
pub const ARCHITECTURE_DEFAULT_KEY: &str = "default";

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Maximum points per scoring category.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreWeights {
    pub entity_benchmarks: f64,
    pub dev_benchmarks: f64,
    pub community_score: f64,
    pub technical_score: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            entity_benchmarks: 30.0,
            dev_benchmarks: 30.0,
            community_score: 20.0,
            technical_score: 20.0,
        }
    }
}

impl ScoreWeights {
    /// Sum of the four category maxima. The startup check requires this to
    /// equal `score_scale`.
    pub fn total(&self) -> f64 {
        self.entity_benchmarks + self.dev_benchmarks + self.community_score + self.technical_score
    }
}

/// Per-category benchmark weight tables.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkWeights {
    #[serde(default = "default_entity_weights")]
    pub entity_benchmarks: BTreeMap<String, f64>,
    #[serde(default = "default_dev_weights")]
    pub dev_benchmarks: BTreeMap<String, f64>,
}

impl Default for BenchmarkWeights {
    fn default() -> Self {
        Self {
            entity_benchmarks: default_entity_weights(),
            dev_benchmarks: default_dev_weights(),
        }
    }
}

/// Coefficients for the technical score formulas.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TechnicalScoreParams {
    #[serde(default)]
    pub price: PriceParams,
    #[serde(default)]
    pub context_window: ContextWindowParams,
    #[serde(default)]
    pub size_perf_ratio: SizePerfRatioParams,
}

/// Price score: decreasing linear function of price with floor and ceiling.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PriceParams {
    pub max_points: f64,
    pub coefficient: f64,
    pub intercept: f64,
    pub high_price_cutoff: f64,
    pub high_price_points: f64,
}

impl Default for PriceParams {
    fn default() -> Self {
        Self {
            max_points: 8.0,
            coefficient: 0.35,
            intercept: 8.0,
            high_price_cutoff: 20.0,
            high_price_points: 1.0,
        }
    }
}

/// Context-window score: logarithmic reward with a floor below the cutoff.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContextWindowParams {
    pub max_points: f64,
    pub coefficient: f64,
    pub intercept: f64,
    pub log_base: f64,
    pub low_cw_cutoff: u64,
    pub low_cw_points: f64,
}

impl Default for ContextWindowParams {
    fn default() -> Self {
        Self {
            max_points: 6.0,
            coefficient: 0.571,
            intercept: -5.929,
            log_base: 2.0,
            low_cw_cutoff: 8192,
            low_cw_points: 1.0,
        }
    }
}

/// Size/performance ratio score: benchmark performance discounted by model
/// scale and boosted by architecture efficiency.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SizePerfRatioParams {
    pub max_points: f64,
    pub base_points: f64,
    pub scaling_factor: f64,
    /// Parameter-count tiers, `size_limit -> factor`. Scanned in ascending
    /// order; the first tier whose limit exceeds the parameter count wins.
    pub size_tiers: BTreeMap<u64, f64>,
    /// Factor applied when no tier matches (models above the largest limit).
    pub default_size_factor: f64,
}

impl Default for SizePerfRatioParams {
    fn default() -> Self {
        Self {
            max_points: 6.0,
            base_points: 1.0,
            scaling_factor: 5.0,
            size_tiers: BTreeMap::from([
                (3_000_000_000, 1.00),
                (10_000_000_000, 0.95),
                (30_000_000_000, 0.90),
                (80_000_000_000, 0.80),
                (200_000_000_000, 0.70),
            ]),
            default_size_factor: 0.60,
        }
    }
}

/// Coefficients for the 0-10 Hugging Face engagement score.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HfScoreParams {
    #[serde(default)]
    pub downloads: HfDownloadsParams,
    #[serde(default)]
    pub likes: HfLikesParams,
    #[serde(default)]
    pub age_months: HfAgeParams,
}

/// Log-curve scoring for download counts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HfDownloadsParams {
    pub log_base: f64,
    pub coefficient: f64,
    pub intercept: f64,
    pub min_downloads: u64,
    pub max_points: f64,
}

impl Default for HfDownloadsParams {
    fn default() -> Self {
        Self {
            log_base: 2.0,
            coefficient: 0.2007,
            intercept: -0.6667,
            min_downloads: 10,
            max_points: 4.0,
        }
    }
}

/// Log-curve scoring for like counts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HfLikesParams {
    pub log_base: f64,
    pub coefficient: f64,
    pub intercept: f64,
    pub min_likes: u64,
    pub max_points: f64,
}

impl Default for HfLikesParams {
    fn default() -> Self {
        Self {
            log_base: 2.0,
            coefficient: 0.477,
            intercept: -0.756,
            min_likes: 3,
            max_points: 4.0,
        }
    }
}

/// Piecewise-linear maturity scoring by model age in months.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HfAgeParams {
    pub tier1_months: f64,
    pub tier1_slope: f64,
    pub tier2_months: f64,
    pub tier2_base_points: f64,
    pub tier2_slope: f64,
    pub tier3_months: f64,
    pub tier3_base_points: f64,
    pub tier3_slope: f64,
    pub stable_points: f64,
    pub max_points: f64,
}

impl Default for HfAgeParams {
    fn default() -> Self {
        Self {
            tier1_months: 1.0,
            tier1_slope: 0.5,
            tier2_months: 3.0,
            tier2_base_points: 0.5,
            tier2_slope: 0.5,
            tier3_months: 12.0,
            tier3_base_points: 1.5,
            tier3_slope: 0.5 / 9.0,
            stable_points: 1.5,
            max_points: 2.0,
        }
    }
}

fn default_score_scale() -> f64 {
    100.0
}

fn default_score_bounds() -> Bounds {
    Bounds {
        min: 0.0,
        max: 100.0,
    }
}

fn default_community_score_bounds() -> BTreeMap<String, Bounds> {
    BTreeMap::from([
        (
            "lm_sys_arena_score".to_string(),
            Bounds {
                min: 1000.0,
                max: 1500.0,
            },
        ),
        (
            "hf_score".to_string(),
            Bounds {
                min: 0.0,
                max: 10.0,
            },
        ),
    ])
}

fn default_architecture_factors() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("moe".to_string(), 1.2),
        ("ssm".to_string(), 1.1),
        ("dense".to_string(), 1.0),
        ("specialized".to_string(), 1.1),
        ("efficient".to_string(), 1.1),
        (ARCHITECTURE_DEFAULT_KEY.to_string(), 1.0),
    ])
}

fn weight_table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}

fn default_entity_weights() -> BTreeMap<String, f64> {
    weight_table(&[
        ("artificial_analysis", 10.0),
        ("OpenCompass", 10.0),
        ("Dubesord_LLM", 10.0),
        ("LLM Explorer", 10.0),
        ("Livebench", 10.0),
        ("open_llm", 10.0),
        ("UGI Leaderboard", 10.0),
        ("big_code_bench", 10.0),
        ("EvalPlus Leaderboard", 10.0),
        ("Open VLM", 10.0),
    ])
}

fn default_dev_weights() -> BTreeMap<String, f64> {
    weight_table(&[
        // Language and reasoning
        ("MMLU", 3.0),
        ("MMLU Pro", 5.0),
        ("BigBenchHard", 3.0),
        ("GPQA diamond", 7.0),
        ("DROP", 3.0),
        ("HellaSwag", 3.0),
        ("Humanity's Last Exam", 5.0),
        ("ARC-C", 3.0),
        // Instruction following and chat
        ("Wild Bench", 2.0),
        ("MT-bench", 2.0),
        ("IFEval", 2.0),
        ("Arena-Hard", 2.0),
        // Math
        ("MATH", 3.0),
        ("GSM-8K", 3.0),
        ("AIME", 3.0),
        // Code
        ("HumanEval", 1.0),
        ("MBPP", 1.0),
        ("LiveCodeBench", 2.0),
        ("Aider Polyglot", 1.0),
        ("SWE-Bench", 2.0),
        ("SciCode", 1.0),
        // Multilingual
        ("MGSM", 2.0),
        ("MMMLU", 2.0),
        ("C-Eval or CMMLU", 2.0),
        ("AraMMLu", 2.0),
        // Long context
        ("LongBench", 1.0),
        ("RULER 128K", 1.0),
        ("RULER 32K", 1.0),
        ("MTOB", 1.0),
        // Tool use and agents
        ("BFCL", 1.0),
        ("AgentBench", 1.0),
        ("Gorilla Benchmark", 1.0),
        ("ToolBench", 1.0),
        ("MINT", 1.0),
        // Multimodal
        ("MMMU", 1.0),
        ("Mathvista", 1.0),
        ("ChartQA", 1.0),
        ("DocVQA", 1.0),
        ("AI2D", 1.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_scale() {
        let config = ScoringConfig::default();
        assert_eq!(config.score_weights.total(), config.score_scale);
    }

    #[test]
    fn test_default_weight_tables_cover_required_schema() {
        let config = ScoringConfig::default();
        for name in crate::model::schema::REQUIRED_ENTITY_BENCHMARKS {
            assert!(
                config.benchmark_weights.entity_benchmarks.contains_key(*name),
                "missing entity weight for {}",
                name
            );
        }
        for name in crate::model::schema::REQUIRED_DEV_BENCHMARKS {
            assert!(
                config.benchmark_weights.dev_benchmarks.contains_key(*name),
                "missing dev weight for {}",
                name
            );
        }
    }

    #[test]
    fn test_architecture_factor_lookup() {
        let config = ScoringConfig::default();
        assert_eq!(config.architecture_factor("moe"), 1.2);
        assert_eq!(config.architecture_factor("MoE"), 1.2);
        assert_eq!(config.architecture_factor("transformer-xl"), 1.0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let yaml = r#"
score_weights:
  entity_benchmarks: 25
  dev_benchmarks: 35
  community_score: 20
  technical_score: 20
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.score_weights.entity_benchmarks, 25.0);
        assert_eq!(config.score_weights.dev_benchmarks, 35.0);
        // Untouched tables keep their built-in values
        assert_eq!(config.score_scale, 100.0);
        assert_eq!(config.technical_score_params.price.max_points, 8.0);
        assert_eq!(
            config.benchmark_weights.dev_benchmarks.get("GPQA diamond"),
            Some(&7.0)
        );
    }

    #[test]
    fn test_empty_config_parses_to_defaults() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let bounds = Bounds {
            min: 1000.0,
            max: 1500.0,
        };
        assert!(bounds.contains(1000.0));
        assert!(bounds.contains(1500.0));
        assert!(!bounds.contains(999.9));
        assert!(!bounds.contains(1500.1));
    }
}
