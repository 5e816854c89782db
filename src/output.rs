// src/output.rs
// =============================================================================
// Everything the user sees on the console.
//
// - A banner when the run starts
// - Per level: a "Depth N" header and a progress bar redrawn in place
// - A line for every hit, the moment it's found
// - The final sorted list of unique hosts (or JSON with --json)
//
// In JSON mode stdout is reserved for the JSON document, so all the
// running commentary goes to stderr instead.
// =============================================================================

use anyhow::Result;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::fmt::Write;
use std::sync::Mutex;

use crate::config::FuzzConfig;
use crate::fuzz::{FuzzObserver, Hit, HitSet, ProbeResult};

// {percent_dec} is our own key, indicatif's {percent} has no decimals
const PROGRESS_TEMPLATE: &str = "[+] Progress: {pos}/{len} ({percent_dec}%) {bar:30.cyan/blue}";

// 0.375 -> "37.5"
fn format_percent(fraction: f32) -> String {
    format!("{:.1}", fraction * 100.0)
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent_dec", |state: &ProgressState, w: &mut dyn Write| {
            let _ = w.write_str(&format_percent(state.fraction()));
        })
}

// Prints a line to stdout, or to stderr when stdout carries JSON
fn say(json: bool, line: &str) {
    if json {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

pub fn print_banner(config: &FuzzConfig, words: usize, json: bool) {
    say(
        json,
        &format!(
            "[*] Starting recursive vhost fuzzing on {}:{} ({}) with {} threads, {} words, max depth {}",
            config.base_domain, config.port, config.target, config.threads, words, config.max_depth
        ),
    );
}

/// Console front-end for a fuzzing run
pub struct ConsoleObserver {
    json: bool,
    // The bar of the level currently being probed
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            bar: Mutex::new(None),
        }
    }

    fn current_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|bar| (*bar).clone())
    }
}

impl FuzzObserver for ConsoleObserver {
    fn level_started(&self, depth: usize, base_domain: &str, total: usize) {
        say(self.json, &format!("\n[+] Depth {} - Fuzzing {}", depth, base_domain));

        let bar = ProgressBar::new(total as u64).with_style(progress_style());

        if let Ok(mut current) = self.bar.lock() {
            *current = Some(bar);
        }
    }

    fn probe_completed(&self, completed: usize, _total: usize) {
        if let Some(bar) = self.current_bar() {
            bar.set_position(completed as u64);
        }
    }

    fn hit_found(&self, _depth: usize, result: &ProbeResult) {
        let line = format!(
            "[✓] Found: {} (Status: {}, Size: {})",
            result.hostname,
            result.status.unwrap_or_default(),
            result.size.unwrap_or_default()
        );

        // suspend() clears the bar, prints, then redraws it underneath.
        // Unlike bar.println() it still prints when the bar is hidden.
        match self.current_bar() {
            Some(bar) => bar.suspend(|| say(self.json, &line)),
            None => say(self.json, &line),
        }
    }

    fn level_finished(&self, _depth: usize, _base_domain: &str, _hits: usize) {
        let bar = self.bar.lock().ok().and_then(|mut bar| bar.take());
        if let Some(bar) = bar {
            bar.finish();
        }
    }
}

// Prints the final list of unique hosts, sorted
pub fn print_hits(hits: &HitSet) {
    println!("\n[✓] Fuzzing complete. Valid vhosts found:");

    if hits.is_empty() {
        println!("   (none)");
        return;
    }

    for host in hits.hostnames() {
        println!(" - {}", host);
    }
}

// Prints the final hits as a pretty JSON array
pub fn print_json(hits: &HitSet) -> Result<()> {
    println!("{}", to_json(hits)?);
    Ok(())
}

fn to_json(hits: &HitSet) -> Result<String> {
    let list: Vec<&Hit> = hits.hits().collect();
    Ok(serde_json::to_string_pretty(&list)?)
}
