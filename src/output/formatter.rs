use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::config::ScoreWeights;
use crate::runner::ScoringResults;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format the per-category breakdown block for one model.
pub fn format_breakdown(
    results: &ScoringResults,
    weights: &ScoreWeights,
    use_colors: bool,
) -> String {
    let scores = &results.scores;
    let rows = [
        ("Entity Benchmarks:", scores.entity_score, weights.entity_benchmarks),
        ("Dev Benchmarks:", scores.dev_score, weights.dev_benchmarks),
        ("Community Score:", scores.community_score, weights.community_score),
        ("Technical Score:", scores.technical_score, weights.technical_score),
    ];

    let mut out = String::new();
    let header = format!("=== Score Breakdown for {} ===", results.model_name);
    if use_colors {
        out.push_str(&format!("{}\n", header.bold()));
    } else {
        out.push_str(&format!("{}\n", header));
    }

    for (label, score, max) in rows {
        out.push_str(&format!("{:<20} {:>6.2} / {}\n", label, score, max));
    }

    out.push_str("----------------------------------------\n");
    let final_line = format!(
        "{:<20} {:>6.2} / {}",
        "Final Score:",
        scores.final_score,
        weights.total()
    );
    if use_colors {
        out.push_str(&format!("{}\n", final_line.bold()));
    } else {
        out.push_str(&format!("{}\n", final_line));
    }
    out.push_str("========================================");
    out
}

/// One `name: score` line for quiet mode.
pub fn format_final_line(results: &ScoringResults) -> String {
    format!("{}: {:.4}", results.model_name, results.scores.final_score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a model name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format batch results as a ranked table: rank, final score, model name.
/// Sorted by final score descending, ties broken by name.
pub fn format_leaderboard(results: &[ScoringResults], use_colors: bool) -> String {
    if results.is_empty() {
        return "No models scored.".to_string();
    }

    let mut ranked: Vec<&ScoringResults> = results.iter().collect();
    ranked.sort_by(|a, b| {
        b.scores
            .final_score
            .partial_cmp(&a.scores.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.model_name.cmp(&b.model_name))
    });

    let term_width = get_terminal_width();

    // Rank column: 3 chars + 1 space; score column: 7 chars ("100.00")
    let score_width = 7;
    let separator = "  ";
    let fixed_width = 3 + 1 + score_width + separator.len();

    ranked
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let rank_str = format!("{:>2}.", idx + 1);
            let score_padded =
                format!("{:>width$.2}", entry.scores.final_score, width = score_width);

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&entry.model_name, width - fixed_width)
                } else {
                    truncate_name(&entry.model_name, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                entry.model_name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}",
                    rank_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name
                )
            } else {
                format!("{} {}{}{}", rank_str, score_padded, separator, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommunityMetrics, ModelRecord, ModelSpecs};
    use crate::scoring::ScoreSet;
    use std::collections::BTreeMap;

    fn sample_results(name: &str, final_score: f64) -> ScoringResults {
        ScoringResults {
            model_name: name.to_string(),
            scores: ScoreSet {
                entity_score: 26.25,
                dev_score: 23.7,
                community_score: 14.5,
                technical_score: 16.43,
                final_score,
            },
            input_data: ModelRecord {
                entity_benchmarks: BTreeMap::new(),
                dev_benchmarks: BTreeMap::new(),
                model_specs: ModelSpecs {
                    price: 1.5,
                    context_window: 131072,
                    param_count: 7e9,
                    architecture: "dense".to_string(),
                },
                community_score: CommunityMetrics {
                    lm_sys_arena_score: Some(1300.0),
                    hf_score: Some(8.5),
                },
            },
        }
    }

    #[test]
    fn test_breakdown_contains_all_categories() {
        let results = sample_results("TestModel", 80.88);
        let text = format_breakdown(&results, &ScoreWeights::default(), false);
        assert!(text.contains("Score Breakdown for TestModel"));
        assert!(text.contains("Entity Benchmarks:"));
        assert!(text.contains("26.25 / 30"));
        assert!(text.contains("Final Score:"));
        assert!(text.contains("80.88 / 100"));
    }

    #[test]
    fn test_final_line_uses_four_decimals() {
        let results = sample_results("TestModel", 80.8765);
        assert_eq!(format_final_line(&results), "TestModel: 80.8765");
    }

    #[test]
    fn test_leaderboard_sorts_descending() {
        let results = vec![
            sample_results("Low", 40.0),
            sample_results("High", 90.0),
            sample_results("Mid", 60.0),
        ];
        let table = format_leaderboard(&results, false);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].contains("High"));
        assert!(lines[1].contains("Mid"));
        assert!(lines[2].contains("Low"));
        assert!(lines[0].starts_with(" 1."));
    }

    #[test]
    fn test_leaderboard_ties_break_by_name() {
        let results = vec![sample_results("Bravo", 50.0), sample_results("Alpha", 50.0)];
        let table = format_leaderboard(&results, false);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].contains("Alpha"));
        assert!(lines[1].contains("Bravo"));
    }

    #[test]
    fn test_leaderboard_empty() {
        assert_eq!(format_leaderboard(&[], false), "No models scored.");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 20), "short");
        assert_eq!(truncate_name("a-very-long-model-name", 10), "a-very-...");
    }
}
