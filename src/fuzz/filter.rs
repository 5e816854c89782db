// src/fuzz/filter.rs
// =============================================================================
// Decides whether a single probe response counts as a hit.
//
// Only HTTP 200 responses are ever considered. For those, the response size
// is checked against the configured bounds in a fixed order:
//
//   1. --exact-size set   -> hit only if size == exact
//   2. --exclude-size set -> hit only if size != exclude
//   3. otherwise          -> hit if min <= size <= max (either bound optional)
//
// Steps 1 and 2 short-circuit: once either is configured, --min-size and
// --max-size are never looked at.
// =============================================================================

/// The only status code that can ever produce a hit
pub const HIT_STATUS: u16 = 200;

/// Outcome of one probe.
///
/// `status` and `size` are None when the request itself failed
/// (connection refused, timeout, reset while reading the body...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub hostname: String,
    pub status: Option<u16>,
    pub size: Option<u64>,
}

impl ProbeResult {
    pub fn new(hostname: String, status: u16, size: u64) -> Self {
        Self {
            hostname,
            status: Some(status),
            size: Some(size),
        }
    }

    /// A probe that never got a complete response
    pub fn failed(hostname: String) -> Self {
        Self {
            hostname,
            status: None,
            size: None,
        }
    }
}

/// Response-size bounds, immutable for the duration of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub exact_size: Option<u64>,
    pub exclude_size: Option<u64>,
}

impl FilterPolicy {
    /// Applies the size rules to a 200 response of `size` bytes
    pub fn accepts(&self, size: u64) -> bool {
        if let Some(exact) = self.exact_size {
            return size == exact;
        }

        if let Some(exclude) = self.exclude_size {
            return size != exclude;
        }

        self.min_size.map_or(true, |min| size >= min)
            && self.max_size.map_or(true, |max| size <= max)
    }

    /// Full hit/miss decision for a probe result
    pub fn classify(&self, result: &ProbeResult) -> bool {
        match (result.status, result.size) {
            (Some(HIT_STATUS), Some(size)) => self.accepts(size),
            _ => false,
        }
    }

    /// One-line summary of the active filter, for the startup log
    pub fn describe(&self) -> String {
        if let Some(exact) = self.exact_size {
            return format!("size == {}", exact);
        }
        if let Some(exclude) = self.exclude_size {
            return format!("size != {}", exclude);
        }

        match (self.min_size, self.max_size) {
            (Some(min), Some(max)) => format!("{} <= size <= {}", min, max),
            (Some(min), None) => format!("size >= {}", min),
            (None, Some(max)) => format!("size <= {}", max),
            (None, None) => "any size".to_string(),
        }
    }

    /// True when min/max were given but can never be consulted
    pub fn has_unreachable_bounds(&self) -> bool {
        (self.exact_size.is_some() || self.exclude_size.is_some())
            && (self.min_size.is_some() || self.max_size.is_some())
    }
}
