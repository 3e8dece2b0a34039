//! scan-substrate: the two leaves a table-driven lexer stands on, a
//! primitive-keyed transition map and a bidirectional scanning cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: give an automaton driver O(1) "next state for this character"
//!   lookups and a cursor it can scan, backtrack, and slice with, in either
//!   direction, without copying the input.
//! - Pieces (independent of each other):
//!   - PrimitiveKeyedMap<K, V>: open-addressing table keyed by `u8`
//!     (`ByteMap`) or `u16` code units (`CharMap`), returning a configured
//!     default for absent keys.
//!   - EntryCursor<K>: fail-fast iteration with removal over that map.
//!   - ScanCursor / BufferCursor: the cursor contract and its buffer-backed
//!     implementation.
//!   - ReversedCursor<C>: adapter that runs any ScanCursor right to left.
//!
//! Constraints
//! - Single-threaded use; no internal locking.
//! - Zero is the empty-slot sentinel; the zero key is kept in a side slot
//!   and never probed for.
//! - Table length is a power of two and at least one slot stays empty, so
//!   linear probes always terminate.
//! - Expansion happens inside `put` and is O(len); everything else on the
//!   map is amortized O(1). Cursor calls are O(1) except range copies.
//!
//! Removal
//! - Entries leave the table only through `EntryCursor::remove` (or
//!   `retain`, built on it). Removal uses backward-shift deletion, so keys
//!   displaced past the removed slot remain reachable and no tombstones
//!   accumulate.
//!
//! Fail-fast iteration
//! - `EntryCursor` borrows nothing, so other map calls can run between its
//!   calls. It snapshots `len()` and reports any change it did not make
//!   itself as `IterError::ConcurrentModification`. The borrowing
//!   `PrimitiveKeyedMap::iter` needs no such check: the borrow checker
//!   already rules out mutation while it is alive.
//!
//! Cursor direction
//! - `ReversedCursor` owns no position; it translates each call onto its
//!   delegate. Algorithms written against `ScanCursor` run unchanged in
//!   either direction by swapping in the adapter.
//!
//! Errors and logging
//! - Construction errors are `ConfigError`; iteration errors are
//!   `IterError`. Cursor precondition violations (reads or ranges outside
//!   the buffer) panic.
//! - Table growth and removals emit `tracing` events at debug/trace level;
//!   errors are returned, never logged.

mod entry_cursor;
mod error;
mod primitive_key;
mod primitive_map;
mod primitive_map_proptest;
mod reversed_cursor;
mod scan_cursor;
mod sizing;

// Public surface
pub use entry_cursor::EntryCursor;
pub use error::{ConfigError, IterError};
pub use primitive_key::PrimitiveKey;
pub use primitive_map::{ByteMap, CharMap, Iter, PrimitiveKeyedMap};
pub use reversed_cursor::ReversedCursor;
pub use scan_cursor::{BufferCursor, CodeUnit, ScanCursor};
