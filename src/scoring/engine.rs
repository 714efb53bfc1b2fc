use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::config::ScoringConfig;
use crate::model::{BenchmarkScores, CommunityMetrics, ModelRecord, ModelSpecs};

/// Community metric names the engine scores against configured bounds.
const ARENA_METRIC: &str = "lm_sys_arena_score";
const HF_METRIC: &str = "hf_score";

/// The four category sub-scores plus the final aggregate for one model.
///
/// By construction each category score is bounded by its configured maximum,
/// and the maxima sum to the overall scale, so `final_score` lands on 0-100
/// without re-normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub entity_score: f64,
    pub dev_score: f64,
    pub community_score: f64,
    pub technical_score: f64,
    pub final_score: f64,
}

/// Inputs for the technical score. All optional: a missing value zeroes the
/// corresponding sub-score rather than failing.
#[derive(Debug, Clone, Default)]
pub struct TechnicalInputs {
    pub price: Option<f64>,
    pub context_window: Option<u64>,
    pub param_count: Option<f64>,
    pub architecture: Option<String>,
}

impl From<&ModelSpecs> for TechnicalInputs {
    fn from(specs: &ModelSpecs) -> Self {
        Self {
            price: Some(specs.price),
            context_window: Some(specs.context_window),
            param_count: Some(specs.param_count),
            architecture: Some(specs.architecture.clone()),
        }
    }
}

/// Scores a model across entity benchmarks, dev benchmarks, community
/// engagement and technical specifications, out of 100 points total with
/// the split defined by the configuration.
///
/// All category formulas are pure functions of the normalized record and the
/// configuration; the only instance state is the last computed sub-scores,
/// kept for reporting.
pub struct ModelScorer<'a> {
    model_name: String,
    config: &'a ScoringConfig,
    last_scores: Option<ScoreSet>,
}

impl<'a> ModelScorer<'a> {
    pub fn new(model_name: impl Into<String>, config: &'a ScoringConfig) -> Self {
        Self {
            model_name: model_name.into(),
            config,
            last_scores: None,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Sub-scores from the most recent [`calculate_final_score`] call.
    ///
    /// [`calculate_final_score`]: ModelScorer::calculate_final_score
    pub fn last_scores(&self) -> Option<ScoreSet> {
        self.last_scores
    }

    /// Entity benchmark category score.
    ///
    /// The weighted average runs only over benchmarks that were actually
    /// evaluated, so a missing benchmark contributes no evidence instead of
    /// dragging the average down.
    pub fn calculate_entity_benchmarks(&self, scores: &BenchmarkScores) -> f64 {
        weighted_average(scores, &self.config.benchmark_weights.entity_benchmarks)
            .map_or(0.0, |average| {
                average * self.config.score_weights.entity_benchmarks
            })
    }

    /// Dev benchmark category score. Same algorithm as the entity category,
    /// over the (much larger) dev weight table.
    pub fn calculate_dev_benchmarks(&self, scores: &BenchmarkScores) -> f64 {
        weighted_average(scores, &self.config.benchmark_weights.dev_benchmarks)
            .map_or(0.0, |average| {
                average * self.config.score_weights.dev_benchmarks
            })
    }

    /// Community engagement category score.
    ///
    /// If both inputs are present each is scaled to half the category
    /// weight; a lone input is scaled to the full weight. Each component is
    /// clamped to its allocated scale before summing, which also absorbs
    /// ratings outside their nominal range.
    pub fn calculate_community_score(
        &self,
        arena_score: Option<f64>,
        hf_score: Option<f64>,
    ) -> f64 {
        if arena_score.is_none() && hf_score.is_none() {
            return 0.0;
        }

        let category_weight = self.config.score_weights.community_score;
        let mut total = 0.0;

        if let Some(rating) = arena_score {
            let scale = if hf_score.is_none() {
                category_weight
            } else {
                category_weight / 2.0
            };
            if let Some(bounds) = self.config.community_bounds(ARENA_METRIC) {
                let normalized = if bounds.max == bounds.min {
                    // Degenerate range: below-or-at min is worthless, anything above is full marks
                    if rating <= bounds.min {
                        0.0
                    } else {
                        scale
                    }
                } else {
                    (rating - bounds.min) / (bounds.max - bounds.min) * scale
                };
                total += normalized.clamp(0.0, scale);
            } else {
                warn!(
                    "No bounds configured for community metric '{}'; dropping it from the score of '{}'",
                    ARENA_METRIC, self.model_name
                );
            }
        }

        if let Some(value) = hf_score {
            let scale = if arena_score.is_none() {
                category_weight
            } else {
                category_weight / 2.0
            };
            if let Some(bounds) = self.config.community_bounds(HF_METRIC) {
                let normalized = if bounds.max == bounds.min {
                    if value <= bounds.min {
                        0.0
                    } else {
                        scale
                    }
                } else {
                    value / (bounds.max - bounds.min) * scale
                };
                total += normalized.clamp(0.0, scale);
            } else {
                warn!(
                    "No bounds configured for community metric '{}'; dropping it from the score of '{}'",
                    HF_METRIC, self.model_name
                );
            }
        }

        round2(total)
    }

    /// Price sub-score: a decreasing linear function of price. Free models
    /// take the ceiling, anything at or past the cutoff takes the floor.
    fn price_score(&self, price: Option<f64>) -> f64 {
        let Some(price) = price else {
            return 0.0;
        };
        let params = &self.config.technical_score_params.price;
        if price <= 0.0 {
            return params.max_points;
        }
        if price >= params.high_price_cutoff {
            return params.high_price_points;
        }
        let raw = params.intercept - params.coefficient * price;
        raw.clamp(params.high_price_points, params.max_points)
    }

    /// Context-window sub-score: logarithmic reward with diminishing
    /// returns, floored below the cutoff.
    fn context_score(&self, context_size: Option<u64>) -> f64 {
        let Some(context) = context_size else {
            return 0.0;
        };
        let params = &self.config.technical_score_params.context_window;
        if context < params.low_cw_cutoff {
            return params.low_cw_points;
        }
        let log_context = (context as f64).ln() / params.log_base.ln();
        let raw = params.coefficient * log_context + params.intercept;
        raw.clamp(params.low_cw_points, params.max_points)
    }

    /// Size/performance ratio sub-score.
    ///
    /// Benchmark performance is discounted by a parameter-count tier factor
    /// and multiplied by the architecture factor, rewarding models that
    /// deliver capability per parameter.
    pub fn calculate_size_perf_ratio(
        &self,
        benchmark_score: f64,
        param_count: f64,
        architecture: &str,
    ) -> f64 {
        let params = &self.config.technical_score_params.size_perf_ratio;

        // First tier whose limit exceeds the parameter count; past the
        // largest tier the default factor penalizes very large models.
        let mut size_factor = params.default_size_factor;
        for (limit, factor) in &params.size_tiers {
            if param_count < *limit as f64 {
                size_factor = *factor;
                break;
            }
        }

        let efficiency_factor = size_factor * self.config.architecture_factor(architecture);
        let combined = (benchmark_score / self.config.score_scale) * efficiency_factor;
        let points = params.base_points + params.scaling_factor * combined;
        points.clamp(params.base_points, params.max_points)
    }

    /// Technical specifications category score: price + context window +
    /// size/performance ratio, each independently clamped.
    pub fn calculate_technical_score(
        &self,
        price: Option<f64>,
        context_window: Option<u64>,
        benchmark_score: Option<f64>,
        param_count: Option<f64>,
        architecture: Option<&str>,
    ) -> f64 {
        let price_score = self.price_score(price);
        let context_score = self.context_score(context_window);
        let ratio_points = match (benchmark_score, param_count, architecture) {
            (Some(benchmark), Some(params), Some(arch)) => {
                self.calculate_size_perf_ratio(benchmark, params, arch)
            }
            _ => 0.0,
        };
        round2(price_score + context_score + ratio_points)
    }

    /// Weighted benchmark performance across both categories, scaled back to
    /// the raw score range. Feeds the size/performance ratio.
    fn overall_benchmark_performance(
        &self,
        entity_benchmarks: &BenchmarkScores,
        dev_benchmarks: &BenchmarkScores,
    ) -> f64 {
        let weights = &self.config.benchmark_weights;
        let mut weighted_sum = 0.0;
        let mut weight_used = 0.0;
        for (scores, table) in [
            (entity_benchmarks, &weights.entity_benchmarks),
            (dev_benchmarks, &weights.dev_benchmarks),
        ] {
            for (name, result) in scores {
                if let (Some(score), Some(weight)) = (result, table.get(name)) {
                    weighted_sum += score * weight;
                    weight_used += weight;
                }
            }
        }
        if weight_used > 0.0 {
            weighted_sum / weight_used * self.config.score_scale
        } else {
            0.0
        }
    }

    /// Compute all four category scores and the final aggregate.
    ///
    /// Pure in its inputs: rerunning with the same normalized record and
    /// configuration yields identical output.
    pub fn calculate_final_score(
        &mut self,
        entity_benchmarks: &BenchmarkScores,
        dev_benchmarks: &BenchmarkScores,
        community: &CommunityMetrics,
        technical: &TechnicalInputs,
    ) -> ScoreSet {
        let entity_score = self.calculate_entity_benchmarks(entity_benchmarks);
        let dev_score = self.calculate_dev_benchmarks(dev_benchmarks);
        let community_score =
            self.calculate_community_score(community.lm_sys_arena_score, community.hf_score);

        let overall_benchmark =
            self.overall_benchmark_performance(entity_benchmarks, dev_benchmarks);
        let technical_score = self.calculate_technical_score(
            technical.price,
            technical.context_window,
            Some(overall_benchmark),
            technical.param_count,
            technical.architecture.as_deref(),
        );

        let final_score = round4(entity_score + dev_score + community_score + technical_score);
        let scores = ScoreSet {
            entity_score,
            dev_score,
            community_score,
            technical_score,
            final_score,
        };
        self.last_scores = Some(scores);
        scores
    }

    /// Score a validated record end to end.
    pub fn score_record(&mut self, record: &ModelRecord) -> ScoreSet {
        self.calculate_final_score(
            &record.entity_benchmarks,
            &record.dev_benchmarks,
            &record.community_score,
            &TechnicalInputs::from(&record.model_specs),
        )
    }
}

/// Weighted average over the benchmarks that appear in the weight table with
/// a non-null score. None when nothing qualifies.
fn weighted_average(scores: &BenchmarkScores, weights: &BTreeMap<String, f64>) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut weight_used = 0.0;
    for (name, result) in scores {
        if let (Some(score), Some(weight)) = (result, weights.get(name)) {
            weighted_sum += score * weight;
            weight_used += weight;
        }
    }
    (weight_used > 0.0).then(|| weighted_sum / weight_used)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
