use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SCORING: i32 = 1;
const EXIT_CONFIG: i32 = 2;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score models and persist per-model results (default directories:
    /// Models/ for input, Results/ for output)
    Score {
        /// Names of models to score; each maps to `<name>.json` in the
        /// models directory
        models: Vec<String>,

        /// Score every model JSON found in the models directory
        #[arg(long)]
        all: bool,

        /// Directory containing model JSON files
        #[arg(long, default_value = "Models")]
        models_dir: PathBuf,

        /// Directory results are written to
        #[arg(long, default_value = "Results")]
        results_dir: PathBuf,

        /// Suppress breakdowns; print one `name: score` line per model
        #[arg(short, long)]
        quiet: bool,
    },
    /// Generate a CSV report from previously persisted results
    Report {
        /// Directory containing `*_results.json` files
        #[arg(long, default_value = "Results")]
        results_dir: PathBuf,
    },
    /// Compute the 0-10 Hugging Face engagement score from collected metrics
    HfScore {
        /// Downloads over the last 30 days
        #[arg(long)]
        downloads: u64,

        /// Total likes
        #[arg(long)]
        likes: u64,

        /// Repository age in months
        #[arg(long)]
        age_months: f64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "modelrank")]
#[command(about = "Score and rank ML models by weighted criteria", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a scoring config file (defaults to
    /// ~/.config/modelrank/scoring.yaml, falling back to built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let quiet = matches!(&cli.command, Commands::Score { quiet: true, .. });
    let filter = if cli.verbose {
        EnvFilter::new("modelrank=debug,info")
    } else if quiet {
        EnvFilter::new("modelrank=error")
    } else {
        EnvFilter::new("modelrank=info,warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config = match modelrank::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    if let Err(errors) = modelrank::config::validate_config(&config) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Commands::Score {
            models,
            all,
            models_dir,
            results_dir,
            quiet,
        } => {
            let model_names = if all {
                match discover_models(&models_dir) {
                    Ok(names) => names,
                    Err(e) => {
                        eprintln!("Failed to list models: {:#}", e);
                        std::process::exit(EXIT_SCORING);
                    }
                }
            } else {
                models
            };

            if model_names.is_empty() {
                eprintln!("No models specified. Provide at least one model name or use --all.");
                std::process::exit(EXIT_CONFIG);
            }

            let results = modelrank::runner::batch_process_models(
                &model_names,
                &models_dir,
                &results_dir,
                quiet,
                &config,
            );

            if results.is_empty() {
                std::process::exit(EXIT_SCORING);
            }
        }
        Commands::Report { results_dir } => {
            match modelrank::output::generate_csv_report(&results_dir) {
                Ok(Some(path)) => println!("CSV report written to {}", path.display()),
                Ok(None) => {
                    eprintln!("No result files found in {}", results_dir.display());
                    std::process::exit(EXIT_SCORING);
                }
                Err(e) => {
                    eprintln!("Report error: {:#}", e);
                    std::process::exit(EXIT_SCORING);
                }
            }
        }
        Commands::HfScore {
            downloads,
            likes,
            age_months,
        } => {
            let metrics = modelrank::scoring::HfMetrics {
                downloads,
                likes,
                age_months,
            };
            let breakdown =
                modelrank::scoring::compute_hf_breakdown(&metrics, &config.hf_score_params);
            println!("HF community score: {:.2}/10", breakdown.total);
            println!("  Downloads: {:.2}", breakdown.download_score);
            println!("  Likes:     {:.2}", breakdown.likes_score);
            println!("  Age:       {:.2}", breakdown.age_score);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// All model names in the directory, derived from `<name>.json` files,
/// sorted for deterministic batch order.
fn discover_models(models_dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(models_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
                .map(str::to_string)
        })
        .collect();
    names.sort();
    Ok(names)
}
