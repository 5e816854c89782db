// src/fuzz/mod.rs
// =============================================================================
// This module contains the virtual host fuzzing engine.
//
// Submodules:
// - filter: Hit/miss classification of a single response
// - probe: Sends the probes for one level, with bounded concurrency
// - recurse: Drives the probes level by level and collects the hits
// - observer: Callbacks for progress reporting
//
// The rest of the application only needs `run()` plus the types below.
// =============================================================================

mod filter;
mod observer;
mod probe;
mod recurse;

pub use filter::{FilterPolicy, ProbeResult};
pub use observer::FuzzObserver;
pub use recurse::{run, Hit, HitSet};
