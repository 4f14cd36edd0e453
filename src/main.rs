use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use sylva_id3::{Dataset, Holdout, Id3Config, TestSize, TreeStats};
use sylva_io::{ExperimentName, ResultWriter, TableReader, TreeArtifacts};

#[derive(Parser)]
#[command(name = "sylva")]
#[command(about = "ID3 decision-tree classification of categorical tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for the train/test split
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel prediction (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input table options shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Path to the input CSV file
    #[arg(long)]
    data: PathBuf,

    /// Name of the class column
    #[arg(long, default_value = "species")]
    target: String,

    /// Columns to drop before training (pass `--drop` alone to keep all)
    #[arg(long, num_args = 0.., value_delimiter = ',', default_values_t = ["Id".to_string()])]
    drop: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TreeFormat {
    /// Indented text
    Text,
    /// Graphviz digraph
    Dot,
    /// JSON node arena
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Split the table, train on the train rows and score on the test rows
    Evaluate {
        #[command(flatten)]
        input: DataArgs,

        /// Test share in [0, 1] (e.g. 0.3) or a row count (e.g. 45)
        #[arg(long, default_value = "0.3")]
        test_size: TestSize,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Train on the whole table and print the tree
    Tree {
        #[command(flatten)]
        input: DataArgs,

        /// Rendering to print
        #[arg(long, value_enum, default_value_t = TreeFormat::Text)]
        format: TreeFormat,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: String,
    target: String,
    n_rows: usize,
    n_train: usize,
    n_test: usize,
    n_unknown: usize,
    accuracy: f64,
    tree: TreeStats,
    evaluation: PathBuf,
    artifacts: TreeArtifacts,
}

fn load(input: &DataArgs) -> Result<Dataset> {
    TableReader::new(&input.data)
        .with_dropped_columns(input.drop.iter().filter(|c| !c.is_empty()).cloned())
        .read()
        .with_context(|| format!("failed to read input CSV {}", input.data.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate {
            input,
            test_size,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let dataset = load(&input)?;

            let holdout = Holdout::new(test_size)?.with_seed(cli.seed);
            let config = Id3Config::new(input.target.clone());
            let result = holdout
                .evaluate(&config, &dataset)
                .context("holdout evaluation failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let evaluation = writer.write_evaluation(&result)?;
            let artifacts = writer.write_tree(&result.tree)?;

            let output = EvaluateOutput {
                experiment,
                target: input.target,
                n_rows: dataset.n_rows(),
                n_train: result.n_train,
                n_test: result.n_test,
                n_unknown: result.predicted.iter().filter(|p| p.is_none()).count(),
                accuracy: result.accuracy,
                tree: result.tree.stats(),
                evaluation,
                artifacts,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Tree { input, format } => {
            let dataset = load(&input)?;
            let tree = Id3Config::new(input.target.clone())
                .fit(&dataset)
                .context("training failed")?;

            let stats = tree.stats();
            info!(
                n_nodes = stats.n_nodes,
                n_leaves = stats.n_leaves,
                depth = stats.depth,
                "tree trained"
            );

            match format {
                TreeFormat::Text => print!("{}", tree.render_text()),
                TreeFormat::Dot => print!("{}", tree.render_dot()),
                TreeFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
            }
        }
    }

    Ok(())
}
