//! Scan service configuration.

use serde::Deserialize;

/// Tunables for [`BlockLocService`](crate::BlockLocService).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Volumes with at least this many blocks are scanned slab-parallel.
    pub parallel_threshold: u64,
    /// Worker pool size; `0` lets rayon pick one thread per core.
    pub worker_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 32 * 1024,
            worker_threads: 0,
        }
    }
}

impl ScanConfig {
    /// Defaults overridden by `BLOCKLOC_PARALLEL_THRESHOLD` and
    /// `BLOCKLOC_WORKER_THREADS`. Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            parallel_threshold: lookup("BLOCKLOC_PARALLEL_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.parallel_threshold),
            worker_threads: lookup("BLOCKLOC_WORKER_THREADS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.worker_threads),
        }
    }
}
