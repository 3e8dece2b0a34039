//! ScanCursor: the character-pulling contract a lexer automaton scans with,
//! and BufferCursor, its implementation over a borrowed buffer.
//!
//! Reads outside the buffer are caller bugs and panic, as slice indexing
//! does. Positions are never clamped.

use core::fmt::Debug;

/// A buffer element: a byte or a 16-bit code unit.
pub trait CodeUnit: Copy + Eq + Debug {
    /// Decodes a run of units as text, replacing invalid sequences.
    fn to_text(units: &[Self]) -> String;
}

impl CodeUnit for u8 {
    fn to_text(units: &[Self]) -> String {
        String::from_utf8_lossy(units).into_owned()
    }
}

impl CodeUnit for u16 {
    fn to_text(units: &[Self]) -> String {
        String::from_utf16_lossy(units)
    }
}

/// Bidirectional cursor with lookaround, absolute positioning, and a
/// mark/changed checkpoint.
///
/// Offsets are signed: `lookahead_by(-1)` is a legal way to look back.
pub trait ScanCursor {
    type Unit: CodeUnit;

    /// Returns the unit at the current position, then steps past it.
    fn next(&mut self) -> Self::Unit;
    /// Steps back one unit, then returns the unit now under the cursor.
    fn prev(&mut self) -> Self::Unit;

    /// The unit `next` would return.
    fn lookahead(&self) -> Self::Unit {
        self.lookahead_by(0)
    }
    fn lookahead_by(&self, offset: isize) -> Self::Unit;

    /// The unit just before the current position.
    fn lookbehind(&self) -> Self::Unit {
        self.lookbehind_by(0)
    }
    fn lookbehind_by(&self, offset: isize) -> Self::Unit;

    /// Current position as a buffer index.
    fn current(&self) -> usize;
    fn move_to(&mut self, position: usize);
    fn forward(&mut self, offset: isize);
    /// Jumps to the end of the scan direction.
    fn finish(&mut self);

    fn finished(&self) -> bool {
        self.finished_by(0)
    }
    /// Whether the position `offset` units ahead is at or past the end.
    fn finished_by(&self, offset: isize) -> bool;

    /// Unit at an absolute index, independent of the position.
    fn at(&self, index: usize) -> Self::Unit;
    /// Copies the units in `[start, end)`.
    fn between(&self, start: usize, end: usize) -> Vec<Self::Unit>;
    /// `between` decoded as text.
    fn slice(&self, start: usize, end: usize) -> String {
        Self::Unit::to_text(&self.between(start, end))
    }

    /// Checkpoints the position and clears `changed`.
    fn mark(&mut self);
    /// Position recorded by the last `mark`.
    fn marked(&self) -> usize;
    /// Whether any call moved the position since the last `mark`.
    fn changed(&self) -> bool;

    /// Buffer length in units.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: ScanCursor + ?Sized> ScanCursor for &mut C {
    type Unit = C::Unit;

    fn next(&mut self) -> Self::Unit {
        (**self).next()
    }
    fn prev(&mut self) -> Self::Unit {
        (**self).prev()
    }
    fn lookahead(&self) -> Self::Unit {
        (**self).lookahead()
    }
    fn lookahead_by(&self, offset: isize) -> Self::Unit {
        (**self).lookahead_by(offset)
    }
    fn lookbehind(&self) -> Self::Unit {
        (**self).lookbehind()
    }
    fn lookbehind_by(&self, offset: isize) -> Self::Unit {
        (**self).lookbehind_by(offset)
    }
    fn current(&self) -> usize {
        (**self).current()
    }
    fn move_to(&mut self, position: usize) {
        (**self).move_to(position);
    }
    fn forward(&mut self, offset: isize) {
        (**self).forward(offset);
    }
    fn finish(&mut self) {
        (**self).finish();
    }
    fn finished(&self) -> bool {
        (**self).finished()
    }
    fn finished_by(&self, offset: isize) -> bool {
        (**self).finished_by(offset)
    }
    fn at(&self, index: usize) -> Self::Unit {
        (**self).at(index)
    }
    fn between(&self, start: usize, end: usize) -> Vec<Self::Unit> {
        (**self).between(start, end)
    }
    fn slice(&self, start: usize, end: usize) -> String {
        (**self).slice(start, end)
    }
    fn mark(&mut self) {
        (**self).mark();
    }
    fn marked(&self) -> usize {
        (**self).marked()
    }
    fn changed(&self) -> bool {
        (**self).changed()
    }
    fn len(&self) -> usize {
        (**self).len()
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Forward cursor over a borrowed buffer; the buffer is never copied.
///
/// Invariant: `pos <= buf.len()`.
#[derive(Debug, Clone)]
pub struct BufferCursor<'a, U: CodeUnit = u16> {
    buf: &'a [U],
    pos: usize,
    mark_pos: usize,
    changed: bool,
}

impl<'a, U: CodeUnit> BufferCursor<'a, U> {
    pub fn new(buf: &'a [U]) -> Self {
        Self {
            buf,
            pos: 0,
            mark_pos: 0,
            changed: false,
        }
    }

    pub fn buffer(&self) -> &'a [U] {
        self.buf
    }

    fn relocate(&mut self, pos: usize) {
        assert!(
            pos <= self.buf.len(),
            "cursor position {pos} outside buffer of length {}",
            self.buf.len()
        );
        self.changed |= pos != self.pos;
        self.pos = pos;
    }

    fn unit_near(&self, offset: isize) -> U {
        match self.pos.checked_add_signed(offset) {
            Some(i) if i < self.buf.len() => self.buf[i],
            _ => panic!(
                "cursor read at {}{offset:+} outside buffer of length {}",
                self.pos,
                self.buf.len()
            ),
        }
    }
}

impl<'a, U: CodeUnit> From<&'a [U]> for BufferCursor<'a, U> {
    fn from(buf: &'a [U]) -> Self {
        Self::new(buf)
    }
}

impl<U: CodeUnit> ScanCursor for BufferCursor<'_, U> {
    type Unit = U;

    fn next(&mut self) -> U {
        let unit = self.unit_near(0);
        self.relocate(self.pos + 1);
        unit
    }

    fn prev(&mut self) -> U {
        let unit = self.unit_near(-1);
        self.relocate(self.pos - 1);
        unit
    }

    fn lookahead_by(&self, offset: isize) -> U {
        self.unit_near(offset)
    }

    fn lookbehind_by(&self, offset: isize) -> U {
        self.unit_near(-1 - offset)
    }

    fn current(&self) -> usize {
        self.pos
    }

    fn move_to(&mut self, position: usize) {
        self.relocate(position);
    }

    fn forward(&mut self, offset: isize) {
        match self.pos.checked_add_signed(offset) {
            Some(pos) => self.relocate(pos),
            None => panic!("cursor moved before buffer start: {}{offset:+}", self.pos),
        }
    }

    fn finish(&mut self) {
        self.relocate(self.buf.len());
    }

    fn finished_by(&self, offset: isize) -> bool {
        (self.pos as i128 + offset as i128) >= self.buf.len() as i128
    }

    fn at(&self, index: usize) -> U {
        match self.buf.get(index) {
            Some(&unit) => unit,
            None => panic!(
                "cursor read at {index} outside buffer of length {}",
                self.buf.len()
            ),
        }
    }

    fn between(&self, start: usize, end: usize) -> Vec<U> {
        assert!(
            start <= end && end <= self.buf.len(),
            "range {start}..{end} outside buffer of length {}",
            self.buf.len()
        );
        self.buf[start..end].to_vec()
    }

    fn mark(&mut self) {
        self.mark_pos = self.pos;
        self.changed = false;
    }

    fn marked(&self) -> usize {
        self.mark_pos
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn len(&self) -> usize {
        self.buf.len()
    }
}
