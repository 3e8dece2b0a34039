//! ReversedCursor: presents a ScanCursor walked right to left.
//!
//! There is one position, the delegate's. `next`/`prev`, `lookahead`/
//! `lookbehind` and the sign of `forward` are swapped; the "end" of a
//! reversed scan is index 0. Ranges passed to `between`/`slice` are in
//! reversed order (`start >= end`) and come back in buffer order.

use crate::scan_cursor::ScanCursor;

/// Decorator that reads any `ScanCursor` right to left.
#[derive(Debug, Clone)]
pub struct ReversedCursor<C> {
    inner: C,
}

impl<C: ScanCursor> ReversedCursor<C> {
    /// Wraps `inner`, which may be an owned cursor or a `&mut` borrow.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: ScanCursor> ScanCursor for ReversedCursor<C> {
    type Unit = C::Unit;

    fn next(&mut self) -> Self::Unit {
        self.inner.prev()
    }

    fn prev(&mut self) -> Self::Unit {
        self.inner.next()
    }

    fn lookahead(&self) -> Self::Unit {
        self.inner.lookbehind()
    }

    fn lookahead_by(&self, offset: isize) -> Self::Unit {
        self.inner.lookbehind_by(offset)
    }

    fn lookbehind(&self) -> Self::Unit {
        self.inner.lookahead()
    }

    fn lookbehind_by(&self, offset: isize) -> Self::Unit {
        self.inner.lookahead_by(offset)
    }

    fn current(&self) -> usize {
        self.inner.current()
    }

    fn move_to(&mut self, position: usize) {
        self.inner.move_to(position);
    }

    fn forward(&mut self, offset: isize) {
        match offset.checked_neg() {
            Some(inverted) => self.inner.forward(inverted),
            None => panic!(
                "cursor moved outside buffer: {}{offset:+}",
                self.inner.current()
            ),
        }
    }

    fn finish(&mut self) {
        self.inner.move_to(0);
    }

    fn finished(&self) -> bool {
        self.inner.current() == 0
    }

    fn finished_by(&self, offset: isize) -> bool {
        (self.inner.current() as i128 - offset as i128) <= 0
    }

    fn at(&self, index: usize) -> Self::Unit {
        self.inner.at(index)
    }

    fn between(&self, start: usize, end: usize) -> Vec<Self::Unit> {
        self.inner.between(end, start)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.inner.slice(end, start)
    }

    fn mark(&mut self) {
        self.inner.mark();
    }

    fn marked(&self) -> usize {
        self.inner.marked()
    }

    fn changed(&self) -> bool {
        self.inner.changed()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
