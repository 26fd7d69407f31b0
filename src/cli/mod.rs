//! Titanic CLI Module
//!
//! Cleans a passenger CSV, writes the engineered frame, then trains and
//! evaluates the survival model.

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::feature_engineering::clean_data;
use crate::training::{Trainer, TrainingConfig, TrainingReport};
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    eprint!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    eprintln!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    eprintln!();
    eprintln!("  {}", title.white().bold());
    eprintln!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "titanic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Titanic survival: feature engineering and random forest training")]
#[command(long_about = None)]
pub struct Cli {
    /// Raw passenger CSV
    pub input: PathBuf,

    /// Destination for the cleaned CSV
    pub output: PathBuf,

    /// JSON training configuration; defaults apply to missing fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write the metrics report as JSON to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

/// Load, clean, persist, train. The JSON report goes to stdout.
pub fn run(cli: &Cli) -> anyhow::Result<TrainingReport> {
    section("Titanic");

    let config = match &cli.config {
        Some(path) => TrainingConfig::load(path)?,
        None => TrainingConfig::default(),
    };

    step_run("Loading data");
    let start = Instant::now();
    let raw = DataLoader::new().load_csv(&cli.input)?;
    step_done(&format!("{} rows × {} cols in {:?}", raw.height(), raw.width(), start.elapsed()));

    step_run("Engineering features");
    let mut cleaned = clean_data(raw)?;
    step_done(&format!("{} cols", cleaned.width()));

    step_run("Writing cleaned data");
    DataSaver::save_csv(&mut cleaned, &cli.output)?;
    step_done(&cli.output.display().to_string());

    step_run(&format!("Training {} trees", config.n_estimators));
    let start = Instant::now();
    let trained = Trainer::new(config).train(&cleaned)?;
    step_done(&format!("{:?}", start.elapsed()));

    let report = trained.report;
    eprintln!();
    eprintln!("  {:<16} {}", muted("Train accuracy"), format!("{:.4}", report.train_data.score).white().bold());
    eprintln!("  {:<16} {}", muted("Test accuracy"), format!("{:.4}", report.test_data.score).white().bold());
    eprintln!("  {:<16} {}", muted("Test MAE"), format!("{:.4}", report.test_data.mae).white());
    eprintln!();

    let json = report.to_json()?;
    if let Some(path) = &cli.report {
        std::fs::write(path, &json)?;
    }
    println!("{}", json);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_args() {
        let cli = Cli::try_parse_from(["titanic", "train.csv", "clean.csv"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("train.csv"));
        assert_eq!(cli.output, PathBuf::from("clean.csv"));
        assert!(cli.config.is_none());
        assert!(cli.report.is_none());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "titanic", "in.csv", "out.csv", "--config", "cfg.json", "-r", "report.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(cli.report, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_missing_output_is_an_error() {
        assert!(Cli::try_parse_from(["titanic", "in.csv"]).is_err());
    }

    #[test]
    fn test_run_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            input: dir.path().join("absent.csv"),
            output: dir.path().join("out.csv"),
            config: None,
            report: None,
        };
        assert!(run(&cli).is_err());
        assert!(!cli.output.exists());
    }
}
