//! # region-explorer
//!
//! Command-line explorer for differential-privacy regions: render scene
//! files, preview single regions, inspect mechanisms and sweep composition.

mod commands;
mod preview;
mod scene;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{MechanismKind, MechanismParams, QueryKind, QueryParams};

#[derive(Parser, Debug)]
#[command(name = "region-explorer", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List region kinds and their parameters
    Kinds,

    /// Composite the regions of a scene file
    Render {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Override the scene's grid resolution
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Draw region outlines of this thickness
        #[arg(long)]
        outline: Option<usize>,

        /// Preview width in cells
        #[arg(short, long, default_value = "40")]
        width: usize,

        /// Write a JSON summary of the layers
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Preview one region kind, e.g. `region dp_exact_composition k=5`
    Region {
        /// Region kind key (see `kinds`)
        kind: String,

        /// Parameters as key=value; missing ones take their defaults
        #[arg(value_parser = parse_param)]
        params: Vec<(String, f64)>,

        #[arg(short, long, default_value = "200")]
        resolution: usize,

        /// Draw the outline of this thickness
        #[arg(long)]
        outline: Option<usize>,

        /// Preview width in cells
        #[arg(short, long, default_value = "40")]
        width: usize,
    },

    /// Noise scale, total variation and region areas of a mechanism
    Mechanism {
        #[arg(value_enum)]
        kind: MechanismKind,

        #[arg(short, long, default_value = "1.0")]
        epsilon: f64,

        #[arg(short, long, default_value = "0.1")]
        delta: f64,

        /// L1 (Laplace) or L2 (Gaussian) sensitivity
        #[arg(short, long, default_value = "1.0")]
        sensitivity: f64,

        /// Alphabet size for randomized response and the median
        #[arg(short = 'm', long, default_value = "5")]
        alphabet_size: usize,

        #[arg(short, long, default_value = "300")]
        resolution: usize,
    },

    /// Region area of basic and exact composition for k = 1..K
    Sweep {
        #[arg(short, long, default_value = "0.6")]
        epsilon: f64,

        #[arg(short, long, default_value = "0.1")]
        delta: f64,

        /// Largest number of composed mechanisms
        #[arg(short = 'k', long, default_value = "10")]
        max_k: u64,

        #[arg(short, long, default_value = "300")]
        resolution: usize,
    },

    /// Utility of a privatized query across privacy levels
    Utility {
        #[arg(value_enum)]
        kind: QueryKind,

        /// Privacy levels to evaluate (comma-separated)
        #[arg(short, long, value_delimiter = ',', default_value = "0.1,0.5,1,2,5")]
        epsilons: Vec<f64>,

        #[arg(short, long, default_value = "0.1")]
        delta: f64,

        /// Mean: diameter of the data domain
        #[arg(long, default_value = "1.0")]
        diameter: f64,

        /// Mean: number of records
        #[arg(long, default_value = "100")]
        size: usize,

        /// Mean: dimensions per record
        #[arg(long, default_value = "1")]
        dimensions: usize,

        /// Histogram: number of bins
        #[arg(long, default_value = "10")]
        bins: usize,

        /// Median: alphabet size
        #[arg(short = 'm', long, default_value = "100")]
        alphabet_size: usize,

        /// Median: rank deviation whose tail probability is reported
        #[arg(long, default_value = "10.0")]
        rank_deviation: f64,
    },
}

fn parse_param(s: &str) -> Result<(String, f64), String> {
    commands::parse_param(s).map_err(|e| format!("{e:#}"))
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Kinds => commands::run_kinds(),
        Commands::Render {
            scene,
            resolution,
            outline,
            width,
            json,
        } => commands::run_render(&scene, resolution, outline, width, json.as_deref()),
        Commands::Region {
            kind,
            params,
            resolution,
            outline,
            width,
        } => commands::run_region(
            &kind,
            &params,
            commands::grid_config(resolution, outline),
            width,
        ),
        Commands::Mechanism {
            kind,
            epsilon,
            delta,
            sensitivity,
            alphabet_size,
            resolution,
        } => commands::run_mechanism(
            kind,
            &MechanismParams {
                epsilon,
                delta,
                sensitivity,
                alphabet_size,
            },
            resolution,
        ),
        Commands::Sweep {
            epsilon,
            delta,
            max_k,
            resolution,
        } => commands::run_sweep(epsilon, delta, max_k, resolution),
        Commands::Utility {
            kind,
            epsilons,
            delta,
            diameter,
            size,
            dimensions,
            bins,
            alphabet_size,
            rank_deviation,
        } => commands::run_utility(
            kind,
            &QueryParams {
                diameter,
                size,
                dimensions,
                bins,
                alphabet_size,
                rank_deviation,
            },
            &epsilons,
            delta,
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
