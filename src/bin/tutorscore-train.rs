//! Trains the assessment-score forest from the student CSV and saves it.

use std::path::PathBuf;

use tutorscore::config::{self, AppSettings};
use tutorscore::logging;
use tutorscore::training::train_from_csv;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let settings = config::load_or_default(options.config.as_deref())
        .map_err(|err| err.to_string())?;
    let settings = options.apply(settings);

    let outcome = train_from_csv(&settings.dataset_path, &settings.training)
        .map_err(|err| err.to_string())?;
    outcome
        .model
        .save_json(&settings.model_path)
        .map_err(|err| err.to_string())?;

    println!("Mean Absolute Error: {:.2}", outcome.report.mae);
    println!("R² Score: {:.2}", outcome.report.r2);
    Ok(())
}

/// Flags given on the command line; unset ones fall back to settings.
#[derive(Debug, Clone, Default, PartialEq)]
struct CliOptions {
    dataset: Option<PathBuf>,
    out: Option<PathBuf>,
    trees: Option<usize>,
    max_depth: Option<usize>,
    test_fraction: Option<f64>,
    seed: Option<u64>,
    config: Option<PathBuf>,
}

impl CliOptions {
    fn apply(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(dataset) = &self.dataset {
            settings.dataset_path = dataset.clone();
        }
        if let Some(out) = &self.out {
            settings.model_path = out.clone();
        }
        if let Some(trees) = self.trees {
            settings.training.n_estimators = trees;
        }
        if let Some(max_depth) = self.max_depth {
            settings.training.max_depth = max_depth;
        }
        if let Some(test_fraction) = self.test_fraction {
            settings.training.test_fraction = test_fraction;
        }
        if let Some(seed) = self.seed {
            settings.training.seed = seed;
        }
        settings
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--dataset" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--dataset requires a value".to_string())?;
                options.dataset = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.out = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--trees" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--trees requires a value".to_string())?;
                options.trees = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --trees value: {value}"))?,
                );
            }
            "--max-depth" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                options.max_depth = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --max-depth value: {value}"))?,
                );
            }
            "--test-fraction" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test-fraction requires a value".to_string())?;
                options.test_fraction = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --test-fraction value: {value}"))?,
                );
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "tutorscore-train",
        "",
        "Trains a random-forest regressor that predicts a student's assessment score.",
        "",
        "Usage:",
        "  tutorscore-train [--dataset data.csv] [--out trained_model.json] [options]",
        "",
        "Options:",
        "  --dataset <csv>          Student dataset (default: personal_tutoring_dataset.csv).",
        "  --out <file>             Output model path (default: trained_model.json).",
        "  --trees <n>              Number of trees (default: 200).",
        "  --max-depth <n>          Maximum tree depth (default: 10).",
        "  --test-fraction <f64>    Held-out fraction (default: 0.2).",
        "  --seed <u64>             RNG seed for split and bootstrap (default: 42).",
        "  --config <toml>          Settings file (default: settings.toml in the app folder).",
    ]
    .join("\n")
}
