//! star-cluster - Stage 2: cluster starred repositories by topic
//!
//! Reads the JSON written by star-fetch and writes
//! `clustering_analysis_<prefix>.txt` next to it.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use stargazer::prompt::{prompt_count, prompt_line};
use stargazer::{analyze, AnalyzeConfig, Settings, StarError};

/// Cluster a user's starred repositories by their topics.
#[derive(Parser, Debug)]
#[command(name = "star-cluster")]
#[command(version = stargazer::VERSION)]
#[command(about = "Group starred repositories into topic clusters (TF-IDF + k-means)")]
struct Cli {
    /// Username used with star-fetch (prompted when neither this nor --input is given)
    #[arg(short = 'u', long = "username", value_name = "LOGIN")]
    username: Option<String>,

    /// Explicit path to a *_starred_repos.json file
    #[arg(short = 'i', long = "input", value_name = "FILE", conflicts_with = "username")]
    input: Option<PathBuf>,

    /// Number of clusters (prompted when omitted)
    #[arg(short = 'k', long = "clusters", value_name = "N")]
    clusters: Option<usize>,

    /// Seed for k-means initialization
    #[arg(long = "seed", value_name = "SEED")]
    seed: Option<u64>,

    /// Representative topics listed per cluster
    #[arg(long = "top-terms", value_name = "N")]
    top_terms: Option<usize>,

    /// JSON settings file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn run(cli: Cli) -> stargazer::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let input_path = match cli.input {
        Some(path) => path,
        None => {
            let username = match cli.username.or_else(|| settings.username.clone()) {
                Some(u) => u,
                None => prompt_line(
                    &mut input,
                    &mut output,
                    "Enter the GitHub username you used for the previous script: ",
                )?,
            };
            AnalyzeConfig::for_user(Path::new("."), &username, 1).input
        }
    };

    let requested = cli.clusters.or(settings.n_clusters);

    let mut config = AnalyzeConfig::new(input_path, 1);
    settings.apply_to_analyze(&mut config);
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(top) = cli.top_terms {
        config.top_terms = top;
    }
    config.n_clusters = match requested {
        Some(n) => n,
        None => prompt_count(
            &mut input,
            &mut output,
            "How many clusters would you like to create (e.g., 5-10)? ",
        )?,
    };

    let report = analyze(&config)?;
    println!(
        "Analysis successfully saved to '{}'",
        report.output_path.display()
    );

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    stargazer::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        match e.root() {
            StarError::FileNotFound { .. } | StarError::NoTopics => eprintln!("Error: {}", e),
            StarError::InvalidConfig { message } => eprintln!("{}", message),
            _ => eprintln!("An unexpected error occurred: {}", e),
        }
        std::process::exit(1);
    }
}
