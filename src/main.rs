//! FER2013 Evaluation CLI
//!
//! Loads a trained facial-expression classifier from a checkpoint and
//! evaluates it over the training, validation, and test splits of
//! `fer2013.csv`, printing metrics and writing a confusion-matrix
//! heat-map per split.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use fer_eval::backend::{backend_name, default_device, DefaultBackend};
use fer_eval::dataset::batcher::FerBatcher;
use fer_eval::dataset::Fer2013;
use fer_eval::eval::{evaluate, SplitReport};
use fer_eval::model::{load_model, Arch};
use fer_eval::utils::logging::{init_logging, LogConfig};
use fer_eval::utils::plot::render_confusion_matrix;
use fer_eval::EMOTIONS;

use burn::prelude::Backend;

/// Heat-map output resolution in dots per inch
const PLOT_DPI: u32 = 300;

/// FER2013 Facial Expression Evaluation
///
/// Evaluates a trained classifier over all three FER2013 splits and
/// renders one confusion-matrix heat-map per split.
#[derive(Parser, Debug)]
#[command(name = "fer-eval")]
#[command(version)]
#[command(about = "Evaluate a facial-expression classifier on FER2013", long_about = None)]
struct Cli {
    /// Batch size for evaluation
    #[arg(long, default_value = "128")]
    batch_size: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Path to the FER2013 CSV file
    #[arg(long, default_value = "./fer2013.csv")]
    data_path: PathBuf,

    /// Path to the saved model checkpoint
    #[arg(long, default_value = "./best_checkpoint")]
    checkpoint: PathBuf,

    /// Architecture identifier (ResNet18 or SimpleCnn)
    #[arg(long, default_value = "ResNet18")]
    arch: String,

    /// Ensemble scores over ten crops per image
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    ncrop: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config).map_err(|e| anyhow::anyhow!(e))?;

    let arch: Arch = cli.arch.parse()?;

    println!("{}", "FER2013 Evaluation".cyan().bold());
    println!("  Backend:     {}", backend_name());
    println!("  Architecture: {arch}");
    println!("  Checkpoint:  {}", cli.checkpoint.display());
    println!("  Batch size:  {}", cli.batch_size);
    println!("  Ten-crop:    {}", cli.ncrop);
    println!();

    DefaultBackend::seed(cli.seed);
    let device = default_device();

    info!("Loading model from {}", cli.checkpoint.display());
    let model = load_model::<DefaultBackend>(arch, &cli.checkpoint, &device)
        .context("failed to restore model checkpoint")?;

    info!("Loading dataset from {}", cli.data_path.display());
    let data = Fer2013::load(&cli.data_path).context("failed to load FER2013 dataset")?;

    let batcher = FerBatcher::new(cli.ncrop);

    for (split, dataset) in data.splits() {
        println!("{}", split.header().green().bold());

        let outcome = evaluate(&model, dataset, &batcher, cli.batch_size, split.header(), &device)?;
        let report = SplitReport::from_outcome(&outcome);
        println!("{report}");

        let title = format!("Confusion Matrix on {}", split.set_name());
        let output = PathBuf::from(format!("{title}.png"));
        render_confusion_matrix(
            &outcome.y_true,
            &outcome.y_pred,
            &EMOTIONS,
            &title,
            &output,
            PLOT_DPI,
        )?;
        info!("Wrote {}", output.display());
        println!();
    }

    Ok(())
}
