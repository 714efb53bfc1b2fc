//! Hugging Face community engagement score.
//!
//! Computes the 0-10 `hf_score` fed into the community category from
//! already-collected metrics: download count over the last 30 days, total
//! likes, and repository age in months. Metric collection itself happens
//! upstream; this module only evaluates the curves.

use serde::{Deserialize, Serialize};

use crate::config::HfScoreParams;

/// Raw engagement metrics for one model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HfMetrics {
    pub downloads: u64,
    pub likes: u64,
    pub age_months: f64,
}

/// Per-component breakdown of the engagement score.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HfScoreBreakdown {
    pub download_score: f64,
    pub likes_score: f64,
    pub age_score: f64,
    pub total: f64,
}

/// Download component: logarithmic curve, zero below the minimum count.
fn download_score(downloads: u64, params: &HfScoreParams) -> f64 {
    let curve = &params.downloads;
    if downloads < curve.min_downloads {
        return 0.0;
    }
    let log_val = (downloads as f64).ln() / curve.log_base.ln();
    let score = curve.coefficient * log_val + curve.intercept;
    score.clamp(0.0, curve.max_points)
}

/// Likes component: logarithmic curve, zero below the minimum count.
fn likes_score(likes: u64, params: &HfScoreParams) -> f64 {
    let curve = &params.likes;
    if likes < curve.min_likes {
        return 0.0;
    }
    let log_val = (likes as f64).ln() / curve.log_base.ln();
    let score = curve.coefficient * log_val + curve.intercept;
    score.clamp(0.0, curve.max_points)
}

/// Age component: piecewise linear ramp that plateaus for mature models.
fn age_score(age_months: f64, params: &HfScoreParams) -> f64 {
    let tiers = &params.age_months;
    let score = if age_months >= 0.0 && age_months < tiers.tier1_months {
        tiers.tier1_slope * age_months
    } else if age_months >= tiers.tier1_months && age_months < tiers.tier2_months {
        tiers.tier2_base_points + tiers.tier2_slope * (age_months - tiers.tier1_months)
    } else if age_months >= tiers.tier2_months && age_months <= tiers.tier3_months {
        tiers.tier3_base_points + tiers.tier3_slope * (age_months - tiers.tier2_months)
    } else {
        tiers.stable_points
    };
    score.clamp(0.0, tiers.max_points)
}

/// Total engagement score, rounded to 2 decimal places.
pub fn compute_hf_score(metrics: &HfMetrics, params: &HfScoreParams) -> f64 {
    compute_hf_breakdown(metrics, params).total
}

/// Total engagement score with its per-component breakdown.
pub fn compute_hf_breakdown(metrics: &HfMetrics, params: &HfScoreParams) -> HfScoreBreakdown {
    let download_score = download_score(metrics.downloads, params);
    let likes_score = likes_score(metrics.likes, params);
    let age_score = age_score(metrics.age_months, params);
    let total = ((download_score + likes_score + age_score) * 100.0).round() / 100.0;
    HfScoreBreakdown {
        download_score,
        likes_score,
        age_score,
        total,
    }
}
