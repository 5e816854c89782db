// src/config.rs
// =============================================================================
// Turns the raw command-line arguments into a validated run configuration.
//
// Everything that can be wrong with the input (empty domain, zero threads,
// an unusable target) is caught here, before a single probe is sent.
// =============================================================================

use std::net::Ipv6Addr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::fuzz::FilterPolicy;

/// Fatal startup errors. None of these can happen once probing has begun.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target must not be empty")]
    EmptyTarget,
    #[error("base domain must not be empty")]
    EmptyBaseDomain,
    #[error("--threads must be at least 1")]
    InvalidThreads,
    #[error("--timeout must be at least 1 second")]
    InvalidTimeout,
    #[error("invalid target '{0}'")]
    InvalidTarget(String),
}

/// Everything the probing engine needs, immutable for the whole run.
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    pub target: String,
    pub port: u16,
    /// `http://{target}:{port}/`, the URL every probe is sent to
    pub target_url: Url,
    pub base_domain: String,
    pub max_depth: usize,
    pub filter: FilterPolicy,
    pub threads: usize,
    pub timeout: Duration,
}

impl FuzzConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        // Trim first so "  " counts as empty
        let target = cli.target_ip.trim();
        if target.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }

        let base_domain = normalize_domain(&cli.base_domain);
        if base_domain.is_empty() {
            return Err(ConfigError::EmptyBaseDomain);
        }

        // At least one probe has to be allowed in flight
        if cli.threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        if cli.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(Self {
            target: target.to_string(),
            port: cli.port,
            target_url: target_url(target, cli.port)?,
            base_domain,
            max_depth: cli.depth,
            filter: FilterPolicy {
                min_size: cli.min_size,
                max_size: cli.max_size,
                exact_size: cli.exact_size,
                exclude_size: cli.exclude_size,
            },
            threads: cli.threads,
            // Applies to the whole request, body included
            timeout: Duration::from_secs(cli.timeout),
        })
    }
}

/// Builds the URL probes are sent to. IPv6 literals need brackets.
pub fn target_url(target: &str, port: u16) -> Result<Url, ConfigError> {
    let host = match target.parse::<Ipv6Addr>() {
        Ok(_) => format!("[{}]", target),
        Err(_) => target.to_string(),
    };

    let url = Url::parse(&format!("http://{}:{}/", host, port))
        .map_err(|_| ConfigError::InvalidTarget(target.to_string()))?;

    // Url happily accepts things like "10.10.10.10/admin" as host + path
    if url.path() != "/" || url.query().is_some() {
        return Err(ConfigError::InvalidTarget(target.to_string()));
    }

    Ok(url)
}

// "  .target.htb. " -> "target.htb"
fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_matches('.').to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why thiserror here and anyhow elsewhere?
//    - thiserror generates Display/Error for an enum we define ourselves,
//      so tests can match on the exact variant
//    - anyhow is for "just bubble it up with context" application code
//    - The ? in main.rs converts a ConfigError into anyhow::Error for free
//
// 2. Why validate here and not in the fuzzer?
//    - Bad input should stop the program before any request goes out
//    - Once FuzzConfig exists, the rest of the code can trust it
//
// 3. Why check url.path()?
//    - A target like "10.10.10.10/admin" parses fine as a URL,
//      it just isn't a bare host any more
// -----------------------------------------------------------------------------
