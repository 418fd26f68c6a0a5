//! star-fetch - Stage 1: download a user's starred repositories
//!
//! Prompts for anything not given as a flag or in the settings file,
//! prints a summary of every starred repository and saves the raw records
//! to `<username>_starred_repos.json`.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use stargazer::core::store::save_records;
use stargazer::prompt::prompt_line;
use stargazer::{fetch_starred, format_star_summary, FetchConfig, Settings, StarError};

/// Fetch every repository a GitHub user has starred.
#[derive(Parser, Debug)]
#[command(name = "star-fetch")]
#[command(version = stargazer::VERSION)]
#[command(about = "Fetch a GitHub user's starred repositories into <username>_starred_repos.json")]
struct Cli {
    /// GitHub username (prompted when omitted)
    #[arg(short = 'u', long = "username", value_name = "LOGIN")]
    username: Option<String>,

    /// Personal access token (prompted when omitted)
    #[arg(long = "token", value_name = "PAT")]
    token: Option<String>,

    /// API root, e.g. for GitHub Enterprise
    #[arg(long = "api-base", value_name = "URL")]
    api_base: Option<String>,

    /// Directory to write the JSON file into
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

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

    let username = match cli.username.or(settings.username) {
        Some(u) => u,
        None => prompt_line(&mut input, &mut output, "Enter your GitHub username: ")?,
    };
    let token = match cli.token.or(settings.token) {
        Some(t) => t,
        None => prompt_line(&mut input, &mut output, "Enter your GitHub Personal Access Token: ")?,
    };

    let mut config = FetchConfig::new(username, token);
    if let Some(api_base) = cli.api_base.or(settings.api_base) {
        config = config.with_api_base(api_base);
    }
    if let Some(dir) = cli.output_dir.or(settings.output_dir) {
        config = config.with_output_dir(dir);
    }
    config.validate()?;

    let records = fetch_starred(&config)?;

    if records.is_empty() {
        println!("No repositories found for user '{}'.", config.username.trim());
        return Ok(());
    }

    print!("{}", format_star_summary(config.username.trim(), &records));

    let path = config.output_path();
    save_records(&path, &records)?;
    println!("All data has been saved to '{}'", path.display());
    io::stdout().flush()?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    stargazer::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        match e.root() {
            StarError::Http { .. } | StarError::Transport(_) => {
                eprintln!("Error: {}", e);
                eprintln!("Fetch failed; nothing was saved. Please check your username and PAT.");
            }
            StarError::InvalidConfig { message } => eprintln!("{}", message),
            _ => eprintln!("An unexpected error occurred: {}", e),
        }
        std::process::exit(1);
    }
}
