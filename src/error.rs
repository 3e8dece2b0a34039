//! Error types for map construction and fail-fast entry iteration.

use thiserror::Error;

/// Rejected map configuration. Raised only by constructors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capacity must be at least 1, got {0}")]
    Capacity(usize),
    #[error("load factor must lie strictly between 0 and 1, got {0}")]
    LoadFactor(f32),
}

/// Failure of an [`EntryCursor`](crate::EntryCursor) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IterError {
    /// Every entry has already been produced.
    #[error("entry iteration is exhausted")]
    Exhausted,
    /// The map's entry count changed behind the cursor's back.
    #[error("map was modified during iteration (expected {expected} entries, found {found})")]
    ConcurrentModification { expected: usize, found: usize },
    /// No current entry: `remove` before `next`, or the entry is already gone.
    #[error("no current entry to remove")]
    InvalidRemoval,
}
