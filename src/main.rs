use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use house_price::config::{resolve_config, CONFIG_ENV};
use house_price::{format_price, ErrorCategory, PipelineConfig, Predictor, Status, TrainerBuilder};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_MODEL_UNAVAILABLE: u8 = 3;

#[derive(Parser)]
#[command(name = "house-price", author, version, about, long_about = None)]
struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and write the artifact
    Train {
        /// CSV dataset to train on
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Where to write the artifact
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Seed for the train/test split
        #[arg(long)]
        seed: Option<u64>,
        /// Fraction of rows held out for evaluation
        #[arg(long)]
        test_ratio: Option<f64>,
    },
    /// Predict a price from NAME=VALUE feature pairs
    Predict {
        /// Artifact to load
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
        /// Feature values, e.g. sqft_living=2000 bedrooms=3
        #[arg(required = true, value_parser = parse_key_val)]
        inputs: Vec<(String, String)>,
    },
    /// Report whether the artifact can be served
    Status {
        /// Artifact to check
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing feature name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = resolve_config(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Train {
            dataset,
            artifact,
            seed,
            test_ratio,
        } => train(config, dataset, artifact, seed, test_ratio),
        Commands::Predict {
            artifact,
            json,
            inputs,
        } => predict(&config, artifact, json, &inputs),
        Commands::Status { artifact } => status(&config, artifact),
    }
}

fn train(
    mut config: PipelineConfig,
    dataset: Option<PathBuf>,
    artifact: Option<PathBuf>,
    seed: Option<u64>,
    test_ratio: Option<f64>,
) -> Result<ExitCode> {
    if let Some(dataset) = dataset {
        config.dataset_path = dataset;
    }
    if let Some(artifact) = artifact {
        config.artifact_path = artifact;
    }
    if let Some(seed) = seed {
        config.training.seed = seed;
    }
    if let Some(ratio) = test_ratio {
        config.training.test_ratio = ratio;
    }
    config.training.validate()?;

    let report = TrainerBuilder::from_config(&config)
        .build()
        .train(&config.dataset_path)
        .with_context(|| format!("training on {} failed", config.dataset_path.display()))?;

    match report.scores.r2 {
        Some(r2) => println!("R2 Score: {r2:.4}"),
        None => println!("R2 Score: undefined"),
    }
    if let Some(rmse) = report.scores.rmse {
        println!("RMSE: {}", format_price(rmse));
    }
    println!("Model saved to {}", report.artifact_path.display());
    Ok(ExitCode::SUCCESS)
}

fn predict(
    config: &PipelineConfig,
    artifact: Option<PathBuf>,
    json: bool,
    inputs: &[(String, String)],
) -> Result<ExitCode> {
    let path = artifact.unwrap_or_else(|| config.artifact_path.clone());
    let predictor = Predictor::initialize(&path);
    let response = predictor.respond(inputs);

    if json {
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{}", response.message());
    }

    let code = match response.error_category() {
        None => ExitCode::SUCCESS,
        Some(ErrorCategory::InvalidInput) => ExitCode::from(EXIT_INVALID_INPUT),
        Some(ErrorCategory::ModelUnavailable) => ExitCode::from(EXIT_MODEL_UNAVAILABLE),
        Some(ErrorCategory::Internal) => ExitCode::FAILURE,
    };
    Ok(code)
}

fn status(config: &PipelineConfig, artifact: Option<PathBuf>) -> Result<ExitCode> {
    let path = artifact.unwrap_or_else(|| config.artifact_path.clone());
    let predictor = Predictor::initialize(&path);
    let report = predictor.status_report();
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.status == Status::Ready {
        info!(path = %path.display(), "model is ready");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_MODEL_UNAVAILABLE))
    }
}
