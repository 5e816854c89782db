// src/fuzz/probe.rs
// =============================================================================
// The probe executor: sends one request per word and keeps the hits.
//
// How it works:
// 1. For each word, build the candidate hostname "word.base_domain"
// 2. Send GET http://{target}:{port}/ with "Host: {candidate}"
// 3. Read the whole body to measure its size
// 4. Classify the response with the FilterPolicy
//
// At most `threads` probes are in flight at once. A failed request
// (refused, timed out, reset) is just a miss for that one word - it never
// stops the batch, and probe_level() never returns an error.
//
// Rust concepts:
// - Streams: stream::iter + buffer_unordered for bounded concurrency
// - Atomics: AtomicUsize for the shared "completed" counter
// - Trait objects: &dyn FuzzObserver for progress callbacks
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::{header::HOST, redirect::Policy, Client};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use url::Url;

use super::filter::{FilterPolicy, ProbeResult};
use super::observer::FuzzObserver;
use crate::config::FuzzConfig;

/// Joins a wordlist entry and a base domain into a candidate hostname
pub fn candidate_hostname(word: &str, base_domain: &str) -> String {
    format!("{}.{}", word, base_domain)
}

// Everything needed to probe one batch of candidates
//
// The reqwest Client is built once and shared by every probe of every
// level, so connections to the target get reused.
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    client: Client,
    target_url: Url,
    filter: FilterPolicy,
    concurrency: usize,
}

impl ProbeExecutor {
    pub fn new(config: &FuzzConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            // A redirect is not a 200, so it's a miss - don't follow it
            .redirect(Policy::none())
            .pool_max_idle_per_host(config.threads)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            target_url: config.target_url.clone(),
            filter: config.filter,
            concurrency: config.threads.max(1),
        })
    }

    pub fn filter(&self) -> &FilterPolicy {
        &self.filter
    }

    // Sends a single probe and reports what came back
    //
    // The size is the number of body bytes actually received.
    // Any reqwest error (including a body that times out half way)
    // turns into ProbeResult::failed.
    pub async fn probe(&self, hostname: String) -> ProbeResult {
        let response = match self
            .client
            .get(self.target_url.clone())
            .header(HOST, hostname.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(host = %hostname, error = %e, "probe failed");
                return ProbeResult::failed(hostname);
            }
        };

        let status = response.status().as_u16();

        match response.bytes().await {
            Ok(body) => {
                debug!(host = %hostname, status, size = body.len(), "probe completed");
                ProbeResult::new(hostname, status, body.len() as u64)
            }
            Err(e) => {
                debug!(host = %hostname, status, error = %e, "failed to read response body");
                ProbeResult::failed(hostname)
            }
        }
    }

    // Probes every word against one base domain and returns the hits
    //
    // Parameters:
    //   base_domain: suffix for the candidates (e.g. "target.htb")
    //   words: the wordlist, shared read-only by all probes
    //   depth: recursion level, only passed through to the observer
    //   observer: receives progress and hit events
    //
    // Returns: the hits, in completion order (callers must not rely on order)
    pub async fn probe_level(
        &self,
        base_domain: &str,
        words: &[String],
        depth: usize,
        observer: &dyn FuzzObserver,
    ) -> Vec<ProbeResult> {
        let total = words.len();
        observer.level_started(depth, base_domain, total);

        // The only mutable state shared between probes
        let completed = AtomicUsize::new(0);
        let completed = &completed;

        // Owned hostnames, the boxed recursion needs this future to be Send
        let candidates: Vec<String> = words
            .iter()
            .map(|word| candidate_hostname(word, base_domain))
            .collect();

        let hits: Vec<ProbeResult> = stream::iter(candidates)
            .map(|hostname| async move {
                let result = self.probe(hostname).await;

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                observer.probe_completed(done, total);

                if self.filter.classify(&result) {
                    observer.hit_found(depth, &result);
                    Some(result)
                } else {
                    None
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|hit| async move { hit })
            .collect()
            .await;

        observer.level_finished(depth, base_domain, hits.len());
        hits
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered and not tokio::spawn?
//    - buffer_unordered(N) keeps at most N probe futures running at once
//    - The futures can borrow `self` and `observer` directly,
//      spawned tasks would need everything to be 'static (Arc + clones)
//    - collect().await only returns once every probe has finished, which is
//      exactly the "whole batch done" point the recursion waits for
//
// 2. Why an AtomicUsize for the counter?
//    - fetch_add returns the previous value and increments in one step
//    - Two probes finishing together can never read the same number,
//      so each value 1..=total is reported exactly once
//
// 3. Why set the Host header by hand?
//    - We always connect to the same IP, the web server picks which site
//      to serve purely from the Host header
//    - reqwest only fills in Host itself when we haven't set one
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzz::testing::{test_config, words, RecordingObserver};
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, host: &str, status: u16, size: usize) {
        Mock::given(method("GET"))
            .and(header("host", host))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(vec![b'a'; size]))
            .mount(server)
            .await;
    }

    #[test]
    fn test_candidate_hostname() {
        assert_eq!(candidate_hostname("admin", "target.htb"), "admin.target.htb");
        assert_eq!(candidate_hostname("v1", "api.target.htb"), "v1.api.target.htb");
    }

    #[tokio::test]
    async fn test_probe_sends_host_header() {
        let server = MockServer::start().await;
        serve(&server, "admin.target.htb", 200, 512).await;

        let executor = ProbeExecutor::new(&test_config(&server, 1, FilterPolicy::default())).unwrap();

        let hit = executor.probe("admin.target.htb".to_string()).await;
        assert_eq!(hit, ProbeResult::new("admin.target.htb".to_string(), 200, 512));

        // Unmatched hosts fall through to wiremock's default 404
        let miss = executor.probe("dev.target.htb".to_string()).await;
        assert_eq!(miss.status, Some(404));
    }

    #[tokio::test]
    async fn test_single_hit_among_misses() {
        let server = MockServer::start().await;
        serve(&server, "admin.target.htb", 200, 512).await;

        let executor = ProbeExecutor::new(&test_config(&server, 1, FilterPolicy::default())).unwrap();
        let observer = RecordingObserver::default();

        let hits = executor
            .probe_level("target.htb", &words(&["admin", "api", "dev"]), 1, &observer)
            .await;

        let names: Vec<_> = hits.iter().map(|h| h.hostname.as_str()).collect();
        assert_eq!(names, vec!["admin.target.htb"]);
        assert_eq!(observer.hits(), vec!["admin.target.htb".to_string()]);
    }

    #[tokio::test]
    async fn test_exact_size_excludes_other_sizes() {
        let server = MockServer::start().await;
        serve(&server, "admin.target.htb", 200, 512).await;

        let filter = FilterPolicy {
            exact_size: Some(256),
            ..Default::default()
        };
        let executor = ProbeExecutor::new(&test_config(&server, 1, filter)).unwrap();

        let hits = executor
            .probe_level("target.htb", &words(&["admin", "api", "dev"]), 1, &RecordingObserver::default())
            .await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_non_200_never_hits() {
        let server = MockServer::start().await;
        serve(&server, "admin.target.htb", 302, 512).await;
        serve(&server, "api.target.htb", 403, 512).await;
        serve(&server, "dev.target.htb", 500, 512).await;

        let executor = ProbeExecutor::new(&test_config(&server, 1, FilterPolicy::default())).unwrap();
        let hits = executor
            .probe_level("target.htb", &words(&["admin", "api", "dev"]), 1, &RecordingObserver::default())
            .await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_completion_count_for_every_concurrency() {
        let server = MockServer::start().await;
        serve(&server, "w2.target.htb", 200, 10).await;

        let list = words(&["w0", "w1", "w2", "w3", "w4", "w5"]);

        for threads in 1..=list.len() {
            let mut config = test_config(&server, 1, FilterPolicy::default());
            config.threads = threads;
            let executor = ProbeExecutor::new(&config).unwrap();
            let observer = RecordingObserver::default();

            let hits = executor.probe_level("target.htb", &list, 1, &observer).await;

            assert_eq!(hits.len(), 1);
            let expected: Vec<usize> = (1..=list.len()).collect();
            assert_eq!(observer.completions(), expected, "threads = {}", threads);
            assert_eq!(observer.levels(), vec![(1, "target.htb".to_string(), list.len())]);
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_miss() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut config = crate::fuzz::testing::config_for("127.0.0.1", port, 1, FilterPolicy::default());
        config.timeout = std::time::Duration::from_secs(1);
        let executor = ProbeExecutor::new(&config).unwrap();
        let observer = RecordingObserver::default();

        let hits = executor
            .probe_level("target.htb", &words(&["admin", "api"]), 1, &observer)
            .await;

        assert!(hits.is_empty());
        assert_eq!(observer.completions(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_timed_out_host_is_a_miss() {
        let server = MockServer::start().await;
        serve(&server, "fast.target.htb", 200, 64).await;

        // Answers 200, but only after the client has given up
        Mock::given(method("GET"))
            .and(header("host", "slow.target.htb"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![b'a'; 64])
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(&server, 1, FilterPolicy::default());
        config.timeout = std::time::Duration::from_secs(1);
        let executor = ProbeExecutor::new(&config).unwrap();
        let observer = RecordingObserver::default();

        let hits = executor
            .probe_level("target.htb", &words(&["slow", "fast"]), 1, &observer)
            .await;

        let names: Vec<_> = hits.iter().map(|h| h.hostname.as_str()).collect();
        assert_eq!(names, vec!["fast.target.htb"]);
        assert_eq!(observer.hits(), vec!["fast.target.htb".to_string()]);
        assert_eq!(observer.completions(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_wordlist_probes_nothing() {
        let server = MockServer::start().await;
        let executor = ProbeExecutor::new(&test_config(&server, 1, FilterPolicy::default())).unwrap();
        let observer = RecordingObserver::default();

        let hits = executor.probe_level("target.htb", &[], 1, &observer).await;

        assert!(hits.is_empty());
        assert!(observer.completions().is_empty());
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }
}
