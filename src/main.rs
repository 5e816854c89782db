// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) according to -v / RUST_LOG
// 3. Validate the configuration and load the wordlist
// 4. Run the recursive fuzzer and print the hosts it found
// 5. Exit with proper code (0 = run completed, 2 = error)
//
// Finding nothing is a perfectly valid outcome, so it still exits 0.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - validated run configuration
mod fuzz;     // src/fuzz/ - the probing engine
mod output;   // src/output.rs - console and JSON output
mod wordlist; // src/wordlist.rs - wordlist loading

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::FuzzConfig;
use output::ConsoleObserver;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Config problems, unreadable wordlist... all fatal before probing
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = FuzzConfig::from_cli(&cli)?;

    let words = wordlist::load_wordlist(&cli.wordlist).await?;
    // Nothing to probe is not an error, the run just finds nothing
    if words.is_empty() {
        warn!("wordlist {} contains no usable words", cli.wordlist.display());
    }

    if config.filter.has_unreachable_bounds() {
        warn!("--min-size/--max-size are ignored when --exact-size or --exclude-size is set");
    }

    output::print_banner(&config, words.len(), cli.json);

    let observer = ConsoleObserver::new(cli.json);
    let hits = fuzz::run(&config, &words, &observer).await?;
    info!(unique_hosts = hits.len(), "run complete");

    if cli.json {
        output::print_json(&hits)?;
    } else {
        output::print_hits(&hits);
    }

    Ok(0)
}

// Logs go to stderr so they never mix with the results on stdout.
// RUST_LOG, when set, wins over -v.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vhost_recon={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
