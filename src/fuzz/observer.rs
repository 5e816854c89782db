// src/fuzz/observer.rs
// =============================================================================
// Hook points the probing engine calls while it works.
//
// The engine itself never prints anything. The console front-end implements
// FuzzObserver to draw a progress bar and hit lines; tests implement it to
// record events.
// =============================================================================

use super::filter::ProbeResult;

/// Receives progress events from a fuzzing run.
///
/// Calls may come from any worker, hence `Send + Sync`.
pub trait FuzzObserver: Send + Sync {
    /// A new batch is about to start probing `total` candidates of `base_domain`
    fn level_started(&self, depth: usize, base_domain: &str, total: usize);

    /// One probe finished (hit, miss or error). `completed` runs 1..=total.
    fn probe_completed(&self, completed: usize, total: usize);

    /// A probe passed the filter
    fn hit_found(&self, depth: usize, result: &ProbeResult);

    /// Every probe of the batch has returned
    fn level_finished(&self, depth: usize, base_domain: &str, hits: usize);
}
