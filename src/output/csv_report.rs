use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::runner::ScoringResults;

const CSV_HEADERS: [&str; 6] = [
    "model_name",
    "entity_score",
    "dev_score",
    "community_score",
    "technical_score",
    "final_score",
];

/// Generate a CSV report from the `*_results.json` files in the results
/// directory. Returns the path of the written report, or None when there are
/// no result files to report on. Malformed result files are skipped with a
/// warning.
pub fn generate_csv_report(results_directory: &Path) -> Result<Option<PathBuf>> {
    let mut result_files: Vec<PathBuf> = fs::read_dir(results_directory)
        .with_context(|| {
            format!(
                "Could not read results directory '{}'",
                results_directory.display()
            )
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.ends_with("_results.json"))
                .unwrap_or(false)
        })
        .collect();
    result_files.sort();

    if result_files.is_empty() {
        warn!(
            "No result files found in '{}'",
            results_directory.display()
        );
        return Ok(None);
    }

    let mut rows = vec![CSV_HEADERS.join(",")];
    for path in &result_files {
        match read_results_file(path) {
            Ok(results) => rows.push(format_row(&results)),
            Err(e) => warn!("Could not process {}: {:#}", path.display(), e),
        }
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let output_path = results_directory.join(format!("modelrank_report_{}.csv", timestamp));
    fs::write(&output_path, rows.join("\n") + "\n")
        .with_context(|| format!("Failed to write CSV report to {}", output_path.display()))?;

    Ok(Some(output_path))
}

fn read_results_file(path: &Path) -> Result<ScoringResults> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid results JSON in '{}'", path.display()))
}

fn format_row(results: &ScoringResults) -> String {
    let scores = &results.scores;
    format!(
        "{},{},{},{},{},{}",
        escape_field(&results.model_name),
        scores.entity_score,
        scores.dev_score,
        scores.community_score,
        scores.technical_score,
        scores.final_score
    )
}

/// Quote a field when it contains a delimiter, quote or newline.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommunityMetrics, ModelRecord, ModelSpecs};
    use crate::scoring::ScoreSet;
    use std::collections::BTreeMap;
    use std::io::Write;

    fn sample_results(name: &str) -> ScoringResults {
        ScoringResults {
            model_name: name.to_string(),
            scores: ScoreSet {
                entity_score: 26.25,
                dev_score: 23.7,
                community_score: 14.5,
                technical_score: 16.43,
                final_score: 80.88,
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
                    lm_sys_arena_score: None,
                    hf_score: None,
                },
            },
        }
    }

    fn write_results(dir: &Path, results: &ScoringResults) {
        let path = dir.join(format!("{}_results.json", results.model_name));
        let mut file = fs::File::create(path).unwrap();
        write!(file, "{}", serde_json::to_string_pretty(results).unwrap()).unwrap();
    }

    #[test]
    fn test_report_contains_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_results(dir.path(), &sample_results("Alpha"));
        write_results(dir.path(), &sample_results("Bravo"));

        let path = generate_csv_report(dir.path()).unwrap().unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], CSV_HEADERS.join(","));
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Alpha,26.25,23.7,14.5,16.43,80.88"));
    }

    #[test]
    fn test_report_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_results(dir.path(), &sample_results("Alpha"));
        let mut broken = fs::File::create(dir.path().join("Broken_results.json")).unwrap();
        write!(broken, "{{ not json").unwrap();

        let path = generate_csv_report(dir.path()).unwrap().unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 2); // header + Alpha only
    }

    #[test]
    fn test_report_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(generate_csv_report(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("has,comma"), "\"has,comma\"");
        assert_eq!(escape_field("has\"quote"), "\"has\"\"quote\"");
    }
}
