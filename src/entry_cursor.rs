//! EntryCursor: fail-fast iteration with removal over a PrimitiveKeyedMap.
//!
//! The cursor holds positions, not borrows; each call is handed the map it
//! walks. That lets callers interleave other map calls, and in exchange the
//! cursor must detect when those calls changed the entry count.
//!
//! Traversal begins just past an empty slot. No probe cluster can then
//! straddle the traversal boundary, so backward-shift removal only ever
//! moves entries into slots the cursor has not passed yet; after a removal
//! the cursor re-examines the vacated slot.

use crate::error::IterError;
use crate::primitive_key::PrimitiveKey;
use crate::primitive_map::PrimitiveKeyedMap;
use core::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Slot { offset: usize, index: usize },
    Null,
}

/// Detached cursor over a map's entries; see the module docs.
#[derive(Debug, Clone)]
pub struct EntryCursor<K> {
    start: usize,
    span: usize,
    /// Next slot to examine, counted from `start`.
    offset: usize,
    expected: usize,
    current: Option<Position>,
    null_visited: bool,
    _key: PhantomData<K>,
}

impl<K: PrimitiveKey> EntryCursor<K> {
    pub(crate) fn new<V>(map: &PrimitiveKeyedMap<K, V>) -> Self {
        let span = map.capacity();
        Self {
            start: (map.first_vacant() + 1) & (span - 1),
            span,
            offset: 0,
            expected: map.len(),
            current: None,
            null_visited: false,
            _key: PhantomData,
        }
    }

    fn check<V>(&self, map: &PrimitiveKeyedMap<K, V>) -> Result<(), IterError> {
        if map.len() != self.expected || map.capacity() != self.span {
            return Err(IterError::ConcurrentModification {
                expected: self.expected,
                found: map.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn index_at(&self, offset: usize) -> usize {
        (self.start + offset) & (self.span - 1)
    }

    /// Whether `next` has an entry to produce. Also true when the map was
    /// modified, so the following `next` reports the modification.
    pub fn has_next<V: PartialEq>(&self, map: &PrimitiveKeyedMap<K, V>) -> bool {
        if self.check(map).is_err() {
            return true;
        }
        (self.offset..self.span).any(|o| map.slot(self.index_at(o)).is_some())
            || (!self.null_visited && map.null_entry().is_some())
    }

    /// Produces the next entry: table slots first, then the null key.
    pub fn next<'m, V: PartialEq>(
        &mut self,
        map: &'m PrimitiveKeyedMap<K, V>,
    ) -> Result<(K, &'m V), IterError> {
        self.check(map)?;
        while self.offset < self.span {
            let offset = self.offset;
            let index = self.index_at(offset);
            self.offset += 1;
            if let Some(entry) = map.slot(index) {
                self.current = Some(Position::Slot { offset, index });
                return Ok(entry);
            }
        }
        if !self.null_visited {
            self.null_visited = true;
            if let Some(value) = map.null_entry() {
                self.current = Some(Position::Null);
                return Ok((K::NULL, value));
            }
        }
        self.current = None;
        Err(IterError::Exhausted)
    }

    /// Removes the entry last produced by `next` and returns its value.
    ///
    /// A removed null key reverts to the default value. A null key that
    /// was reset to the default since `next` produced it is already gone.
    pub fn remove<V: PartialEq>(
        &mut self,
        map: &mut PrimitiveKeyedMap<K, V>,
    ) -> Result<V, IterError> {
        self.check(map)?;
        let removed = match self.current.take() {
            None => None,
            Some(Position::Null) => map.take_null(),
            Some(Position::Slot { offset, index }) => {
                let removed = map.remove_slot(index);
                if removed.is_some() {
                    // A shifted entry may now occupy the vacated slot.
                    self.offset = offset;
                    self.expected -= 1;
                }
                removed
            }
        };
        removed.ok_or(IterError::InvalidRemoval)
    }
}
