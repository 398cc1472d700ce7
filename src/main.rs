// src/main.rs
// =============================================================================
// Entry point of codeunbox.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing)
// 3. Dispatch to the subcommand: run the HTTP API, or analyze one repo
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod analysis;  // src/analysis/ - the inspection pipeline
mod cli;       // src/cli.rs - command-line parsing
mod github;    // src/github/ - GitHub URL parsing and API client
mod server;    // src/server/ - HTTP API

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use analysis::AnalysisResult;
use cli::{Cli, Commands, GitHubArgs};
use github::GitHubClient;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins over --log-level when both are set
fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Serve { host, port, github } => {
            let state = server::AppState::new(Arc::new(build_client(&github)?));
            server::serve(cli::listen_addr(host, port), state).await?;
            Ok(0)
        }
        Commands::Analyze {
            repo_url,
            json,
            github,
        } => handle_analyze(&repo_url, json, &github).await,
    }
}

fn build_client(github: &GitHubArgs) -> Result<GitHubClient> {
    Ok(GitHubClient::new(github.client_config())?)
}

// Handles the 'analyze' subcommand
//
// Returns Ok(0) when the repository was analyzed, Ok(2) when it could not
// be (the failure has already been printed).
async fn handle_analyze(repo_url: &str, json: bool, github: &GitHubArgs) -> Result<i32> {
    let client = build_client(github)?;

    match analysis::analyze_repo(&client, repo_url).await {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(repo_url, &result);
            }
            Ok(0)
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&AnalysisResult::failed())?);
            }
            eprintln!("❌ {e}");
            Ok(2)
        }
    }
}

// Prints the analysis as a human-readable summary in the terminal
fn print_summary(repo_url: &str, result: &AnalysisResult) {
    println!("📦 {}", result.name);
    println!("{}", "=".repeat(60));
    println!("{:<20} {}", "Framework", result.framework);
    println!("{:<20} {}", "Language", result.language);
    println!(
        "{:<20} {}",
        ".env committed",
        if result.has_env_file { "yes" } else { "no" }
    );

    if result.env_vars_needed.is_empty() {
        println!("{:<20} none declared", "Env vars needed");
    } else {
        println!("{:<20} {}", "Env vars needed", result.env_vars_needed.join(", "));
    }

    println!();
    println!("📄 Files (first {}):", result.files.len());
    for file in &result.files {
        let size = file
            .size
            .filter(|_| file.is_file())
            .map(|bytes| format!("{:.1}KB", bytes as f64 / 1024.0))
            .unwrap_or_default();
        let name = if file.is_file() {
            file.name.clone()
        } else {
            format!("{}/", file.name)
        };
        println!("   {:<40} {:>10}", name, size);
    }

    println!();
    let options = analysis::preview_options_for(repo_url, &result.framework);
    if options.is_empty() {
        println!("🚫 No preview available for this repository");
    } else {
        println!("🚀 Preview:");
        for option in options {
            let marker = if option.is_primary { "*" } else { " " };
            println!("   {} {:<14} {}", marker, option.name, option.url);
        }
    }
}
