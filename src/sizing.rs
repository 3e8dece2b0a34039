//! Table sizing shared by every key width.

use crate::error::ConfigError;

pub(crate) const DEFAULT_CAPACITY: usize = 16;
pub(crate) const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Power-of-two table geometry plus the entry count that triggers growth.
///
/// Invariant: `expand_at < len()`, so a table holding at most `expand_at`
/// entries always keeps an empty slot and linear probes terminate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TableSizing {
    pub(crate) mask: usize,
    pub(crate) expand_at: usize,
    pub(crate) load_factor: f32,
}

pub(crate) fn validate(capacity: usize, load_factor: f32) -> Result<(), ConfigError> {
    if capacity < 1 {
        return Err(ConfigError::Capacity(capacity));
    }
    // Written this way round so NaN is rejected too.
    if !(load_factor > 0.0 && load_factor < 1.0) {
        return Err(ConfigError::LoadFactor(load_factor));
    }
    Ok(())
}

impl TableSizing {
    /// Smallest geometry that holds `target` entries at `load_factor`.
    ///
    /// `target` is clamped to `domain`: a key width never has more live
    /// keys than it has distinct non-null values.
    pub(crate) fn new(target: usize, load_factor: f32, domain: usize) -> Self {
        let target = target.clamp(1, domain);
        let wanted = (target as f64 / f64::from(load_factor)).ceil() as usize;
        let mut sizing = Self::for_len(wanted.max(2).next_power_of_two(), load_factor);
        // Float rounding can leave the threshold one short.
        while sizing.expand_at < target {
            sizing = Self::for_len(sizing.len() * 2, load_factor);
        }
        sizing
    }

    fn for_len(len: usize, load_factor: f32) -> Self {
        debug_assert!(len.is_power_of_two() && len >= 2);
        let expand_at = ((len as f64 * f64::from(load_factor)) as usize).min(len - 1);
        Self {
            mask: len - 1,
            expand_at,
            load_factor,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.mask + 1
    }

    /// Entry count to size for when a put pushes the table past `expand_at`:
    /// twice the current threshold.
    #[inline]
    pub(crate) fn growth_target(&self) -> usize {
        (self.expand_at * 2).max(self.expand_at + 1)
    }
}
