//! PrimitiveKey: the key widths a primitive-keyed table can be instantiated at.
//!
//! Zero is reserved as the empty-slot marker in every width, so the null key
//! never enters the probe table; maps track it on the side.

use core::fmt::Debug;
use core::hash::Hash;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// A single-byte or single-code-unit key.
///
/// Sealed: the table layout relies on `NULL` being the all-zero value and on
/// `DOMAIN` bounding how many distinct keys can ever be live.
pub trait PrimitiveKey: sealed::Sealed + Copy + Eq + Ord + Hash + Debug {
    /// The empty-slot sentinel.
    const NULL: Self;
    /// Number of distinct non-null keys of this width.
    const DOMAIN: usize;

    fn widen(self) -> u32;

    #[inline]
    fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Scrambled hash; the home slot is `spread() & mask`.
    #[inline]
    fn spread(self) -> u32 {
        fmix32(self.widen())
    }
}

impl PrimitiveKey for u8 {
    const NULL: Self = 0;
    const DOMAIN: usize = u8::MAX as usize;

    #[inline]
    fn widen(self) -> u32 {
        u32::from(self)
    }
}

impl PrimitiveKey for u16 {
    const NULL: Self = 0;
    const DOMAIN: usize = u16::MAX as usize;

    #[inline]
    fn widen(self) -> u32 {
        u32::from(self)
    }
}

// Murmur3 finalizer. Consecutive characters ('a', 'b', ...) are the common
// key pattern, and without mixing they would pile into one cluster.
#[inline]
const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
