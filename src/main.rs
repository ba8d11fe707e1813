//! sigma-nn command-line front end.
//!
//! Trains, evaluates and inspects MNIST classifiers built from the library.
//!
//! Run with:
//!   cargo run --release -- train --data-dir data/mnist --layers 784,30,10

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use sigma_nn::{data::load_mnist, train_loop, Network, NetworkSpec, Schedule, TrainConfig};

#[derive(Parser)]
#[command(name = "sigma-nn")]
#[command(about = "Sigmoid MLP trainer for MNIST", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScheduleArg {
    Vanilla,
    Stochastic,
    Minibatch,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network and save it
    Train {
        /// Directory containing the four MNIST IDX files
        #[arg(short, long, default_value = "data/mnist")]
        data_dir: PathBuf,

        /// Comma-separated layer widths, input first
        #[arg(long, default_value = "784,30,10")]
        layers: NetworkSpec,

        #[arg(short, long, value_enum, default_value = "minibatch")]
        schedule: ScheduleArg,

        /// Examples per update for the minibatch schedule
        #[arg(short, long, default_value = "10")]
        batch_size: usize,

        #[arg(short, long, default_value = "30")]
        epochs: usize,

        #[arg(long, default_value = "3.0")]
        learning_rate: f64,

        /// Seed for the per-epoch shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Where the trained network is written
        #[arg(short, long, default_value = "trained_models/network.json")]
        model: PathBuf,

        /// Optional JSON file for per-epoch loss and accuracy
        #[arg(long)]
        history: Option<PathBuf>,

        /// Continue from the network saved at --model, if there is one
        #[arg(long)]
        resume: bool,
    },

    /// Report loss and accuracy of a saved network on the test set
    Evaluate {
        #[arg(short, long, default_value = "data/mnist")]
        data_dir: PathBuf,

        #[arg(short, long, default_value = "trained_models/network.json")]
        model: PathBuf,
    },

    /// List test-set misclassifications of a saved network
    Classify {
        #[arg(short, long, default_value = "data/mnist")]
        data_dir: PathBuf,

        #[arg(short, long, default_value = "trained_models/network.json")]
        model: PathBuf,

        /// Number of misclassified examples to print
        #[arg(long, default_value = "10")]
        show: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    match cli.command {
        Commands::Train {
            data_dir,
            layers,
            schedule,
            batch_size,
            epochs,
            learning_rate,
            seed,
            model,
            history,
            resume,
        } => {
            let data = load_mnist(&data_dir).context("loading MNIST")?;

            let mut network = if resume {
                Network::load_or_new(&model, &layers.layer_sizes)?
            } else {
                Network::new(&layers.layer_sizes)?
            };

            let schedule = match schedule {
                ScheduleArg::Vanilla => Schedule::Vanilla,
                ScheduleArg::Stochastic => Schedule::Stochastic,
                ScheduleArg::Minibatch => Schedule::Minibatch { size: batch_size },
            };
            let mut config = TrainConfig::new(epochs, learning_rate, schedule);
            config.seed = seed;

            let validation = (!data.validation.is_empty()).then_some(data.validation.as_slice());
            let run = train_loop(&mut network, &data.training, validation, &config)?;

            for (i, loss) in run.losses.iter().enumerate() {
                let epoch = i + 1;
                match run.accuracies.get(i) {
                    Some(acc) => println!(
                        "Epoch {epoch:>3}: loss = {loss:.6}, validation accuracy = {:.2}%",
                        acc * 100.0
                    ),
                    None => println!("Epoch {epoch:>3}: loss = {loss:.6}"),
                }
            }

            network.save_json(&model)?;
            if let Some(path) = history {
                run.save_json(&path)?;
                info!(path = %path.display(), "wrote training history");
            }
        }

        Commands::Evaluate { data_dir, model } => {
            let data = load_mnist(&data_dir).context("loading MNIST")?;
            let network = Network::load_json(&model)
                .with_context(|| format!("loading network from {}", model.display()))?;
            let loss = network.overall_loss(&data.testing)?;
            let accuracy = network.validation_accuracy(&data.testing)?;
            println!("Test loss:     {loss:.6}");
            println!("Test accuracy: {:.2}%", accuracy * 100.0);
        }

        Commands::Classify { data_dir, model, show } => {
            let data = load_mnist(&data_dir).context("loading MNIST")?;
            let network = Network::load_json(&model)
                .with_context(|| format!("loading network from {}", model.display()))?;
            let result = network.test_classification(&data.testing)?;
            println!("Correct:   {}", result.correct.len());
            println!("Incorrect: {}", result.incorrect.len());
            for miss in result.incorrect.iter().take(show) {
                println!("  label {} predicted as {}", miss.label, miss.predicted());
            }
        }
    }

    Ok(())
}
