use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Benchmark results for one category. A `None` value means the benchmark
/// was not run; after validation every present value is normalized to [0,1].
pub type BenchmarkScores = BTreeMap<String, Option<f64>>;

/// A validated, normalized model record ready for scoring.
///
/// Decoded from the raw JSON value only after
/// [`crate::model::validate_record`] has accepted it, so the invariants hold:
/// benchmark values are in [0,1], numeric specs are strictly positive and the
/// architecture string is non-blank.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelRecord {
    pub entity_benchmarks: BenchmarkScores,
    pub dev_benchmarks: BenchmarkScores,
    pub model_specs: ModelSpecs,
    pub community_score: CommunityMetrics,
}

/// Technical specifications of a model.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSpecs {
    /// Price per million tokens, in USD.
    pub price: f64,
    /// Context window size in tokens.
    pub context_window: u64,
    /// Parameter count.
    pub param_count: f64,
    /// Architecture family keyword (e.g. "dense", "moe").
    pub architecture: String,
}

/// Community engagement metrics. Both components are optional; a missing
/// value simply contributes no evidence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommunityMetrics {
    /// ELO-style arena rating.
    pub lm_sys_arena_score: Option<f64>,
    /// Hugging Face engagement score in [0,10].
    pub hf_score: Option<f64>,
}
