//! # Cache invalidation passes.
//!
//! [`CacheInvalidator`] deletes per-day cache entries from the injected store
//! in two best-effort passes:
//!
//! ```text
//! clear_explicit():  explicit_keys ──► delete(k) for each (concurrently)
//! sweep():           list_keys() ──► filter(prefix match, not protected) ──► delete(k) for each
//! ```
//!
//! ## Rules
//! - Each deletion is independent: a failure is logged and counted, never propagated.
//! - Protected keys (the day marker, configured keys) are never touched.
//! - The passes overlap on purpose: a key in the explicit list that also
//!   matches a prefix is attempted twice when its first deletion failed.
//! - A failed `list_keys` skips the sweep; the explicit pass result stands.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::config::WatchdogConfig;
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Outcome of one or more invalidation passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Deletions that succeeded (absent keys included).
    pub cleared: usize,
    /// Deletions that failed.
    pub failed: usize,
    /// Keys whose deletion failed, once per failed attempt.
    pub failed_keys: Vec<String>,
    /// True when the sweep could not list the store's keys.
    pub sweep_skipped: bool,
}

impl InvalidationReport {
    /// Total deletions attempted.
    #[inline]
    pub fn attempted(&self) -> usize {
        self.cleared + self.failed
    }

    fn record(&mut self, key: &str, res: Result<(), StoreError>, pass: &'static str) {
        match res {
            Ok(()) => self.cleared += 1,
            Err(e) => {
                warn!(key, pass, error = %e, label = e.as_label(), "cache key deletion failed");
                self.failed += 1;
                self.failed_keys.push(key.to_string());
            }
        }
    }

    fn merge(&mut self, other: InvalidationReport) {
        self.cleared += other.cleared;
        self.failed += other.failed;
        self.failed_keys.extend(other.failed_keys);
        self.sweep_skipped |= other.sweep_skipped;
    }
}

/// Deletes per-day cache entries from a [`KeyValueStore`].
pub struct CacheInvalidator {
    store: Arc<dyn KeyValueStore>,
    cfg: WatchdogConfig,
    explicit_keys: Vec<String>,
}

impl CacheInvalidator {
    pub fn new(store: Arc<dyn KeyValueStore>, cfg: &WatchdogConfig) -> Self {
        let explicit_keys = cfg
            .explicit_keys
            .iter()
            .filter(|k| !cfg.is_protected(k))
            .cloned()
            .collect();

        Self {
            store,
            cfg: cfg.clone(),
            explicit_keys,
        }
    }

    /// Runs the explicit pass, then the sweep.
    pub async fn invalidate_all(&self) -> InvalidationReport {
        let mut report = self.clear_explicit().await;
        report.merge(self.sweep().await);
        debug!(
            cleared = report.cleared,
            failed = report.failed,
            "cache invalidation finished"
        );
        report
    }

    /// Attempts to delete every key of the explicit list.
    pub async fn clear_explicit(&self) -> InvalidationReport {
        self.delete_each(&self.explicit_keys, "explicit").await
    }

    /// Deletes every stored key matching a sweep prefix.
    pub async fn sweep(&self) -> InvalidationReport {
        let keys = match self.store.list_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, label = e.as_label(), "listing store keys failed; sweep skipped");
                return InvalidationReport {
                    sweep_skipped: true,
                    ..InvalidationReport::default()
                };
            }
        };

        let matched: Vec<String> = keys
            .into_iter()
            .filter(|k| self.matches_sweep(k))
            .collect();
        self.delete_each(&matched, "sweep").await
    }

    /// True when `key` would be deleted by the sweep.
    pub fn matches_sweep(&self, key: &str) -> bool {
        !self.cfg.is_protected(key)
            && self
                .cfg
                .sweep_prefixes
                .iter()
                .any(|p| has_prefix_ignore_ascii_case(key, p))
    }

    async fn delete_each(&self, keys: &[String], pass: &'static str) -> InvalidationReport {
        let results = join_all(keys.iter().map(|key| async move {
            let res = self.store.delete(key).await;
            (key, res)
        }))
        .await;

        let mut report = InvalidationReport::default();
        for (key, res) in results {
            report.record(key, res, pass);
        }
        report
    }
}

fn has_prefix_ignore_ascii_case(key: &str, prefix: &str) -> bool {
    let (key, prefix) = (key.as_bytes(), prefix.as_bytes());
    key.len() >= prefix.len() && key[..prefix.len()].eq_ignore_ascii_case(prefix)
}
