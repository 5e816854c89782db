// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// vhost-recon takes three positional arguments (target, base domain and a
// wordlist path) plus a handful of options that control the port, the
// recursion depth, the response-size filters and how many probes run at once.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Option<T>: Optional flags that may not be given at all
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "vhost-recon",
    version = "0.1.0",
    about = "Recursive virtual host discovery by fuzzing the Host header",
    long_about = "vhost-recon sends one HTTP request per wordlist entry to a single IP, \
                  each with a different Host header (word.base-domain). Hosts that answer \
                  200 and pass the size filters are reported and then fuzzed again as new \
                  base domains, up to --depth levels."
)]
pub struct Cli {
    /// Target IP address or host to connect to (e.g. 10.10.10.10)
    pub target_ip: String,

    /// Base domain that words are prepended to (e.g. target.htb)
    pub base_domain: String,

    /// Path to a newline-delimited wordlist file
    pub wordlist: PathBuf,

    /// Target port
    // value_parser with a range rejects 0, so config.rs never sees it
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Maximum recursion depth (depth 1 = only the base domain is fuzzed)
    #[arg(long, default_value_t = 2)]
    pub depth: usize,

    /// Minimum response size (bytes) to include
    #[arg(long)]
    pub min_size: Option<u64>,

    /// Maximum response size (bytes) to include
    #[arg(long)]
    pub max_size: Option<u64>,

    /// Only include responses of exactly this size (overrides all other size filters)
    #[arg(long)]
    pub exact_size: Option<u64>,

    /// Exclude responses of exactly this size (overrides --min-size/--max-size)
    #[arg(long)]
    pub exclude_size: Option<u64>,

    /// Number of concurrent probes
    #[arg(long, default_value_t = 10)]
    pub threads: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 3)]
    pub timeout: u64,

    /// Output the final hits in JSON format instead of a plain list
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<u64> for the size filters?
//    - None means "flag not given", which is different from 0
//    - --exclude-size 0 is a real, useful filter (drop empty pages)
//
// 2. What does value_parser!(u16).range(1..) do?
//    - u16 already limits the port to 0..=65535
//    - .range(1..) also rejects 0, with a proper clap error message
//
// 3. What is ArgAction::Count?
//    - Each -v adds one, so -vv gives verbose = 2
//    - main.rs turns that number into a log level
//
// 4. Why PathBuf for the wordlist?
//    - Paths are not always valid UTF-8 strings
//    - PathBuf is the owned, platform-aware path type
// -----------------------------------------------------------------------------
