//! Required-structure schema for model record files.
//!
//! These lists define the expected shape of input model JSON, not the scoring
//! algorithm. For tunable scoring parameters see [`crate::config`].

/// Top-level sections every model record must contain.
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "entity_benchmarks",
    "dev_benchmarks",
    "model_specs",
    "community_score",
];

/// Benchmarks that must be present (possibly null) in `entity_benchmarks`.
pub const REQUIRED_ENTITY_BENCHMARKS: &[&str] = &[
    "artificial_analysis",
    "OpenCompass",
    "Dubesord_LLM",
    "LLM Explorer",
    "Livebench",
    "open_llm",
    "UGI Leaderboard",
    "big_code_bench",
    "EvalPlus Leaderboard",
    "Open VLM",
];

/// Benchmarks that must be present (possibly null) in `dev_benchmarks`.
pub const REQUIRED_DEV_BENCHMARKS: &[&str] = &[
    "MMLU",
    "MMLU Pro",
    "BigBenchHard",
    "GPQA diamond",
    "DROP",
    "HellaSwag",
    "Humanity's Last Exam",
    "ARC-C",
    "Wild Bench",
    "MT-bench",
    "IFEval",
    "Arena-Hard",
    "MATH",
    "GSM-8K",
    "AIME",
    "HumanEval",
    "MBPP",
    "LiveCodeBench",
    "Aider Polyglot",
    "SWE-Bench",
    "SciCode",
    "MGSM",
    "MMMLU",
    "C-Eval or CMMLU",
    "AraMMLu",
    "LongBench",
    "RULER 128K",
    "RULER 32K",
    "MTOB",
    "BFCL",
    "AgentBench",
    "Gorilla Benchmark",
    "ToolBench",
    "MINT",
    "MMMU",
    "Mathvista",
    "ChartQA",
    "DocVQA",
    "AI2D",
];

/// Fields every `model_specs` section must carry.
pub const REQUIRED_SPEC_FIELDS: &[&str] = &["price", "context_window", "param_count", "architecture"];

/// Metrics every `community_score` section must carry.
pub const REQUIRED_COMMUNITY_FIELDS: &[&str] = &["lm_sys_arena_score", "hf_score"];

/// The `model_specs` field validated as a string rather than a number.
pub const ARCHITECTURE_FIELD: &str = "architecture";

/// The `model_specs` field validated as an integer rather than any number.
pub const CONTEXT_WINDOW_FIELD: &str = "context_window";
