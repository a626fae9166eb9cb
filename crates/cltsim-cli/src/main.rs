//! CLI for cltsim — watch the Central Limit Theorem happen.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cltsim")]
#[command(about = "cltsim — bootstrap resampling and sampling-distribution simulation")]
#[command(version = cltsim_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported distribution families and their parameters
    List,

    /// Draw one sample pool and summarize it against the true moments
    Sample {
        /// Distribution family (see `cltsim list`)
        #[arg(long, default_value = "normal")]
        dist: String,

        /// Comma-separated family parameters, e.g. "100,15" for normal
        #[arg(long)]
        params: Option<String>,

        /// Pool size (observations per sample)
        #[arg(short = 'n', long, default_value = "30")]
        sample_size: usize,

        /// Seed for a reproducible run (omit for OS randomness)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Full CLT demonstration: draw a pool, bootstrap replicates from it,
    /// and compare the empirical standard error against sigma/sqrt(n).
    /// Ctrl-C cancels the batch and reports what completed.
    Simulate {
        /// Distribution family (see `cltsim list`)
        #[arg(long, default_value = "normal")]
        dist: String,

        /// Comma-separated family parameters, e.g. "100,15" for normal
        #[arg(long)]
        params: Option<String>,

        /// Pool size (observations per sample, and draws per replicate)
        #[arg(short = 'n', long, default_value = "30")]
        sample_size: usize,

        /// Number of bootstrap replicates
        #[arg(short = 'r', long, default_value = "2000")]
        replicates: usize,

        /// Replicate history cap (oldest evicted beyond it)
        #[arg(long, default_value = "10000")]
        max_history: usize,

        /// Seed for a reproducible run (omit for OS randomness)
        #[arg(long)]
        seed: Option<u64>,

        /// Print running statistics during the batch
        #[arg(long)]
        progress: bool,

        /// Write the final session snapshot as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Generate a labeled cohort (condition + outcome) and print the Bayes
    /// table: conditional rates and the posterior P(condition | outcome)
    Cohort {
        /// Number of subjects
        #[arg(short = 's', long, default_value = "1000")]
        size: usize,

        /// Probability of the condition label
        #[arg(long, default_value = "0.05")]
        prevalence: f64,

        /// Outcome rate for subjects with the condition
        #[arg(long, default_value = "0.9")]
        rate_if_positive: f64,

        /// Outcome rate for subjects without the condition
        #[arg(long, default_value = "0.1")]
        rate_if_negative: f64,

        /// Fix the positive count at round(size * prevalence) instead of
        /// independent Bernoulli labels
        #[arg(long)]
        exact_count: bool,

        /// Seed for a reproducible run (omit for OS randomness)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List => commands::list::run(),
        Commands::Sample {
            dist,
            params,
            sample_size,
            seed,
        } => commands::sample::run(&dist, params.as_deref(), sample_size, seed),
        Commands::Simulate {
            dist,
            params,
            sample_size,
            replicates,
            max_history,
            seed,
            progress,
            output,
        } => commands::simulate::run(
            &dist,
            params.as_deref(),
            sample_size,
            replicates,
            max_history,
            seed,
            progress,
            output.as_deref(),
        ),
        Commands::Cohort {
            size,
            prevalence,
            rate_if_positive,
            rate_if_negative,
            exact_count,
            seed,
        } => commands::cohort::run(
            size,
            prevalence,
            rate_if_positive,
            rate_if_negative,
            exact_count,
            seed,
        ),
    }
}
