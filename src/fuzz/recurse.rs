// src/fuzz/recurse.rs
// =============================================================================
// The recursion controller: every hit becomes the base domain of a new batch.
//
//   depth 1:  *.target.htb            -> api.target.htb
//   depth 2:  *.api.target.htb        -> v1.api.target.htb
//   depth 3:  *.v1.api.target.htb     -> ...
//
// Each call returns its own Vec of hits and the caller merges them, so no
// result list is ever shared between levels. Batches run one after another:
// a level is fully drained before the first of its hits is recursed into.
//
// There is no visited-set. If a wordlist produces the same hostname along
// two paths, that subtree is probed twice. Duplicates are folded away only
// at the very end, in HitSet.
// =============================================================================

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::filter::ProbeResult;
use super::observer::FuzzObserver;
use super::probe::ProbeExecutor;
use crate::config::FuzzConfig;

/// A discovered virtual host and where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub hostname: String,
    pub depth: usize,
    pub status: u16,
    pub size: u64,
}

impl Hit {
    fn from_probe(result: ProbeResult, depth: usize) -> Self {
        Self {
            hostname: result.hostname,
            depth,
            status: result.status.unwrap_or_default(),
            size: result.size.unwrap_or_default(),
        }
    }
}

/// All unique hits of a run, sorted by hostname.
///
/// When a hostname was found more than once, the first discovery is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitSet {
    hits: BTreeMap<String, Hit>,
}

impl HitSet {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.hits.keys().map(String::as_str)
    }

    pub fn hits(&self) -> impl Iterator<Item = &Hit> {
        self.hits.values()
    }
}

impl FromIterator<Hit> for HitSet {
    fn from_iter<I: IntoIterator<Item = Hit>>(iter: I) -> Self {
        let mut hits = BTreeMap::new();
        for hit in iter {
            hits.entry(hit.hostname.clone()).or_insert(hit);
        }
        Self { hits }
    }
}

// Fuzzes `base_domain` at `depth` and recurses into every hit
//
// Returns every hit from this level and all levels below it.
// The list may contain duplicates. Nothing is probed once depth > max_depth.
//
// Why BoxFuture?
// - An async fn can't call itself directly: its future type would contain
//   itself and have infinite size
// - Boxing puts the recursive future on the heap, giving it a fixed size
pub fn fuzz_recursive<'a>(
    executor: &'a ProbeExecutor,
    base_domain: String,
    words: &'a [String],
    depth: usize,
    max_depth: usize,
    observer: &'a dyn FuzzObserver,
) -> BoxFuture<'a, Vec<Hit>> {
    async move {
        if depth > max_depth {
            return Vec::new();
        }

        let mut hits: Vec<Hit> = executor
            .probe_level(&base_domain, words, depth, observer)
            .await
            .into_iter()
            .map(|result| Hit::from_probe(result, depth))
            .collect();

        let mut deeper = Vec::new();
        for hit in &hits {
            let below = fuzz_recursive(
                executor,
                hit.hostname.clone(),
                words,
                depth + 1,
                max_depth,
                observer,
            )
            .await;
            deeper.extend(below);
        }

        hits.extend(deeper);
        hits
    }
    .boxed()
}

/// Runs a complete fuzzing session, starting at depth 1 on the configured
/// base domain, and returns the deduplicated hits.
pub async fn run(config: &FuzzConfig, words: &[String], observer: &dyn FuzzObserver) -> Result<HitSet> {
    let executor = ProbeExecutor::new(config)?;

    info!(
        target_url = %config.target_url,
        base_domain = %config.base_domain,
        max_depth = config.max_depth,
        words = words.len(),
        filter = %executor.filter().describe(),
        "starting recursive vhost fuzzing"
    );

    let hits = fuzz_recursive(
        &executor,
        config.base_domain.clone(),
        words,
        1,
        config.max_depth,
        observer,
    )
    .await;

    info!(raw_hits = hits.len(), "fuzzing finished");
    Ok(hits.into_iter().collect())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does fuzz_recursive return a Vec instead of pushing into one?
//    - Each call owns its result and hands it back to the caller
//    - No &mut Vec is threaded through the recursion, so nothing is shared
//
// 2. Why a BTreeMap in HitSet?
//    - Keys are kept sorted, so the final list comes out in order
//    - One entry per hostname also removes duplicates
//    - entry().or_insert() keeps the first Hit seen for a hostname
//
// 3. What does 'a mean in fuzz_recursive<'a>?
//    - The returned future borrows executor, words and observer
//    - 'a says the future can't outlive any of them
//
// 4. Why is the loop over hits sequential?
//    - Each .await finishes a whole subtree before the next one starts
//    - Only one batch of probes is in flight at any time
// -----------------------------------------------------------------------------
