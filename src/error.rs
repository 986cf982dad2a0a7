//! Error types used by the store seam and the date watchdog.
//!
//! This module defines two main error enums:
//!
//! - [`StoreError`] — failures reported by a [`KeyValueStore`](crate::KeyValueStore).
//! - [`WatchdogError`] — failures that abort a single day check.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Neither ever escapes the periodic path: the watchdog logs them and retries
//! on the next tick.

use thiserror::Error;

/// # Errors produced by a key-value store.
///
/// Stores are external collaborators; implementations map their own failures
/// onto these variants so the watchdog can log them uniformly.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached at all (closed, not mounted, ...).
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Backend-specific reason.
        reason: String,
    },

    /// A single operation on a key failed.
    #[error("store {op} failed for key {key:?}: {error}")]
    Operation {
        /// Operation name (`get`, `set`, `delete`, `list_keys`).
        op: &'static str,
        /// Key the operation targeted (empty for `list_keys`).
        key: String,
        /// The underlying error message.
        error: String,
    },
}

impl StoreError {
    /// Shorthand for [`StoreError::Operation`].
    pub fn operation(op: &'static str, key: impl Into<String>, error: impl Into<String>) -> Self {
        StoreError::Operation {
            op,
            key: key.into(),
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use daywatch::StoreError;
    ///
    /// let err = StoreError::operation("delete", "todayWaterTotal", "disk full");
    /// assert_eq!(err.as_label(), "store_operation_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "store_unavailable",
            StoreError::Operation { .. } => "store_operation_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StoreError::Unavailable { reason } => format!("unavailable: {reason}"),
            StoreError::Operation { op, key, error } => format!("{op}({key}): {error}"),
        }
    }
}

/// # Errors produced by a day check.
///
/// Any of these aborts the current check only; the marker is left as it was
/// and the next scheduled check starts from scratch.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchdogError {
    /// Reading or writing the persisted day marker failed.
    #[error("marker store error: {0}")]
    Store(#[from] StoreError),

    /// The persisted marker could not be parsed as a calendar day.
    #[error("persisted day marker {value:?} is not a YYYY-MM-DD date")]
    MarkerCorrupt {
        /// Raw value found in the store.
        value: String,
    },
}

impl WatchdogError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use daywatch::WatchdogError;
    ///
    /// let err = WatchdogError::MarkerCorrupt { value: "yesterday".into() };
    /// assert_eq!(err.as_label(), "watchdog_marker_corrupt");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchdogError::Store(_) => "watchdog_store",
            WatchdogError::MarkerCorrupt { .. } => "watchdog_marker_corrupt",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WatchdogError::Store(e) => e.as_message(),
            WatchdogError::MarkerCorrupt { value } => format!("corrupt marker: {value:?}"),
        }
    }
}
