pub mod engine;
pub mod hf_score;

pub use engine::{ModelScorer, ScoreSet, TechnicalInputs};
pub use hf_score::{compute_hf_breakdown, compute_hf_score, HfMetrics, HfScoreBreakdown};
