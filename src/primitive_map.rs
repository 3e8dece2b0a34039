//! PrimitiveKeyedMap: open-addressing table keyed by a byte or code unit.
//!
//! Layout: parallel `keys`/`values` arrays of power-of-two length, linear
//! probing from `spread(key) & mask`. `K::NULL` marks an empty slot, so the
//! null key itself lives in a side slot and is never probed for.

use crate::entry_cursor::EntryCursor;
use crate::error::ConfigError;
use crate::primitive_key::PrimitiveKey;
use crate::sizing::{self, TableSizing, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use core::fmt;
use core::mem;

/// Byte-keyed instantiation.
pub type ByteMap<V> = PrimitiveKeyedMap<u8, V>;
/// Code-unit-keyed instantiation (16-bit characters).
pub type CharMap<V> = PrimitiveKeyedMap<u16, V>;

/// Outcome of resolving a key against the table.
enum Location {
    /// The null key: handled by the side slot, never probed.
    Null,
    Occupied(usize),
    Vacant(usize),
}

/// Open-addressing map from a byte or code-unit key to `V`, answering
/// absent keys with a configured default.
#[derive(Clone)]
pub struct PrimitiveKeyedMap<K: PrimitiveKey, V> {
    keys: Box<[K]>,
    values: Box<[Option<V>]>, // index-aligned with `keys`; `None` iff the key is NULL
    null_value: Option<V>,
    default: V,
    size: usize,
    sizing: TableSizing,
}

fn vacant_values<V>(len: usize) -> Box<[Option<V>]> {
    core::iter::repeat_with(|| None).take(len).collect()
}

impl<K: PrimitiveKey, V> PrimitiveKeyedMap<K, V> {
    /// Map with the default capacity (16) and load factor (0.75).
    pub fn new(default: V) -> Self {
        let sizing = TableSizing::new(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, K::DOMAIN);
        Self::with_sizing(sizing, default)
    }

    /// Map sized for `capacity` entries before its first expansion.
    ///
    /// Fails when `capacity < 1` or `load_factor` is outside `(0, 1)`.
    pub fn with_capacity(
        capacity: usize,
        load_factor: f32,
        default: V,
    ) -> Result<Self, ConfigError> {
        sizing::validate(capacity, load_factor)?;
        let sizing = TableSizing::new(capacity, load_factor, K::DOMAIN);
        Ok(Self::with_sizing(sizing, default))
    }

    fn with_sizing(sizing: TableSizing, default: V) -> Self {
        Self {
            keys: vec![K::NULL; sizing.len()].into_boxed_slice(),
            values: vacant_values(sizing.len()),
            null_value: None,
            default,
            size: 0,
            sizing,
        }
    }

    /// Number of non-null keys in the table. The null key is never counted.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current table length in slots.
    pub fn capacity(&self) -> usize {
        self.sizing.len()
    }

    /// The value `get` returns for absent keys.
    pub fn default_value(&self) -> &V {
        &self.default
    }

    fn locate(&self, key: K) -> Location {
        if key.is_null() {
            return Location::Null;
        }
        let mask = self.sizing.mask;
        let mut i = key.spread() as usize & mask;
        loop {
            let k = self.keys[i];
            if k == key {
                return Location::Occupied(i);
            }
            if k.is_null() {
                return Location::Vacant(i);
            }
            i = (i + 1) & mask;
        }
    }

    /// Associates `value` with `key`, returning the value it replaces.
    ///
    /// The null key overwrites the side slot and leaves `len()` unchanged.
    /// Claiming a fresh slot may expand the table.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(key) {
            Location::Null => self.null_value.replace(value),
            Location::Occupied(i) => self.values[i].replace(value),
            Location::Vacant(i) => {
                self.keys[i] = key;
                self.values[i] = Some(value);
                self.size += 1;
                if self.size > self.sizing.expand_at {
                    self.expand(self.sizing.growth_target());
                }
                None
            }
        }
    }

    /// Value for `key`, or the map's default when absent.
    pub fn get(&self, key: K) -> &V {
        let found = match self.locate(key) {
            Location::Null => self.null_value.as_ref(),
            Location::Occupied(i) => self.values[i].as_ref(),
            Location::Vacant(_) => None,
        };
        found.unwrap_or(&self.default)
    }

    /// Rebuilds the table for `target` entries.
    ///
    /// Pass one drops every entry whose home slot is still free straight
    /// into it; entries that collide are set aside and probed in pass two.
    fn expand(&mut self, target: usize) {
        let next = TableSizing::new(target, self.sizing.load_factor, K::DOMAIN);
        let old_len = self.sizing.len();
        let old_keys = mem::replace(&mut self.keys, vec![K::NULL; next.len()].into_boxed_slice());
        let old_values = mem::replace(&mut self.values, vacant_values(next.len()));
        self.sizing = next;

        let mut delayed = Vec::new();
        for (key, value) in old_keys.iter().copied().zip(old_values.into_vec()) {
            if key.is_null() {
                continue;
            }
            let home = key.spread() as usize & next.mask;
            if self.keys[home].is_null() {
                self.keys[home] = key;
                self.values[home] = value;
            } else {
                delayed.push((key, value));
            }
        }

        let delayed_count = delayed.len();
        for (key, value) in delayed {
            match self.locate(key) {
                Location::Vacant(i) => {
                    self.keys[i] = key;
                    self.values[i] = value;
                }
                // Keys are unique in the old table and never null.
                Location::Occupied(_) | Location::Null => unreachable!("duplicate key in rehash"),
            }
        }

        tracing::debug!(
            from = old_len,
            to = next.len(),
            entries = self.size,
            delayed = delayed_count,
            "expanded primitive-keyed table"
        );
    }

    #[cfg(test)]
    pub(crate) fn expand_threshold(&self) -> usize {
        self.sizing.expand_at
    }

    /// Key and value stored at `index`, if the slot is occupied.
    pub(crate) fn slot(&self, index: usize) -> Option<(K, &V)> {
        let key = *self.keys.get(index)?;
        if key.is_null() {
            return None;
        }
        self.values[index].as_ref().map(|v| (key, v))
    }

    /// Index of some empty slot; one always exists since `expand_at < len`.
    pub(crate) fn first_vacant(&self) -> usize {
        self.keys.iter().position(|k| k.is_null()).unwrap_or(0)
    }

    /// Vacates `hole` and closes the gap with backward-shift deletion: each
    /// later entry in the cluster that may legally sit in the hole moves
    /// into it, so every remaining key stays reachable from its home slot.
    pub(crate) fn remove_slot(&mut self, mut hole: usize) -> Option<V> {
        if self.keys.get(hole).map_or(true, |k| k.is_null()) {
            return None;
        }
        let mask = self.sizing.mask;
        let removed = self.values[hole].take();
        self.keys[hole] = K::NULL;
        self.size -= 1;

        let mut shifted = 0usize;
        let mut i = (hole + 1) & mask;
        loop {
            let key = self.keys[i];
            if key.is_null() {
                break;
            }
            let home = key.spread() as usize & mask;
            // The entry may move iff the hole lies cyclically in [home, i].
            if (i.wrapping_sub(home) & mask) >= (i.wrapping_sub(hole) & mask) {
                self.keys[hole] = key;
                self.keys[i] = K::NULL;
                self.values[hole] = self.values[i].take();
                hole = i;
                shifted += 1;
            }
            i = (i + 1) & mask;
        }

        tracing::trace!(shifted, entries = self.size, "removed primitive-keyed entry");
        removed
    }
}

impl<K: PrimitiveKey, V: PartialEq> PrimitiveKeyedMap<K, V> {
    /// The null key's value when it differs from the default.
    pub(crate) fn null_entry(&self) -> Option<&V> {
        self.null_value.as_ref().filter(|v| **v != self.default)
    }

    /// Clears the null key's slot. A slot already holding the default
    /// counts as absent and yields `None`.
    pub(crate) fn take_null(&mut self) -> Option<V> {
        self.null_value.take().filter(|v| *v != self.default)
    }

    /// Whether `key` is present. For the null key this means it holds a
    /// non-default value, matching `keys()`.
    pub fn contains_key(&self, key: K) -> bool {
        match self.locate(key) {
            Location::Null => self.null_entry().is_some(),
            Location::Occupied(_) => true,
            Location::Vacant(_) => false,
        }
    }

    /// Sorted snapshot of the keys, with `K::NULL` appended last when the
    /// null key holds a non-default value.
    pub fn keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.keys.iter().copied().filter(|k| !k.is_null()).collect();
        keys.sort_unstable();
        if self.null_entry().is_some() {
            keys.push(K::NULL);
        }
        keys
    }

    /// Entries in slot order, then the null entry if present.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            keys: &self.keys,
            values: &self.values,
            index: 0,
            remaining: self.size,
            null: self.null_entry(),
        }
    }

    /// Detached cursor for iteration with removal. It borrows nothing, so
    /// the map can be mutated between calls; a size change made that way
    /// is reported by the cursor's next call.
    pub fn entries(&self) -> EntryCursor<K> {
        EntryCursor::new(self)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(K, &V) -> bool,
    {
        let mut cursor = self.entries();
        while let Ok((key, value)) = cursor.next(self) {
            if !keep(key, value) {
                let failed = cursor.remove(self).err();
                debug_assert!(failed.is_none(), "cursor-driven removal failed: {failed:?}");
            }
        }
    }
}

impl<K: PrimitiveKey, V: Default> Default for PrimitiveKeyedMap<K, V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<K: PrimitiveKey, V: PartialEq + fmt::Debug> fmt::Debug for PrimitiveKeyedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over `(key, &value)` pairs.
pub struct Iter<'a, K, V> {
    keys: &'a [K],
    values: &'a [Option<V>],
    index: usize,
    remaining: usize,
    null: Option<&'a V>,
}

impl<'a, K: PrimitiveKey, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.keys.len() {
            let i = self.index;
            self.index += 1;
            if let Some(value) = self.values[i].as_ref() {
                self.remaining -= 1;
                return Some((self.keys[i], value));
            }
        }
        self.null.take().map(|v| (K::NULL, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining + usize::from(self.null.is_some());
        (n, Some(n))
    }
}

impl<K: PrimitiveKey, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K: PrimitiveKey, V: PartialEq> IntoIterator for &'a PrimitiveKeyedMap<K, V> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IterError;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn ch(c: char) -> u16 {
        c as u16
    }

    /// Two distinct keys sharing a home slot in `map`'s current table.
    fn colliding_pair<V>(map: &ByteMap<V>) -> (u8, u8) {
        let mask = map.capacity() as u32 - 1;
        let mut seen: BTreeMap<u32, u8> = BTreeMap::new();
        for b in 1..=u8::MAX {
            if let Some(&first) = seen.get(&(b.spread() & mask)) {
                return (first, b);
            }
            seen.insert(b.spread() & mask, b);
        }
        unreachable!("255 keys cannot fit 32 homes without a collision")
    }

    #[test]
    fn char_map_put_get_keys() {
        let mut m: CharMap<i32> = CharMap::new(-1);
        m.put(ch('a'), 1);
        m.put(ch('b'), 2);
        assert_eq!(*m.get(ch('a')), 1);
        assert_eq!(*m.get(ch('b')), 2);
        assert_eq!(*m.get(ch('c')), -1);
        assert_eq!(m.keys(), vec![ch('a'), ch('b')]);
        assert_eq!(m.len(), 2);
    }

    /// Invariant: put returns the displaced value and later gets see the
    /// newest one without growing the map.
    #[test]
    fn overwrite_replaces_value_in_place() {
        let mut m: ByteMap<&str> = ByteMap::new("none");
        assert_eq!(m.put(b'x', "first"), None);
        assert_eq!(m.put(b'x', "second"), Some("first"));
        assert_eq!(*m.get(b'x'), "second");
        assert_eq!(m.len(), 1);
    }

    /// Invariant: the null key lives outside the table: it never counts
    /// toward `len`, and shows up last in `keys()` only when non-default.
    #[test]
    fn null_key_is_isolated() {
        let mut m: ByteMap<i32> = ByteMap::new(-1);
        m.put(b'z', 26);
        m.put(0, 7);
        assert_eq!(m.len(), 1);
        assert_eq!(*m.get(0), 7);
        assert!(m.contains_key(0));
        assert_eq!(m.keys(), vec![b'z', 0]);
        let slot_keys: Vec<u8> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(slot_keys, vec![b'z', 0]);

        // Back to the default: present in storage, absent from the key set.
        m.put(0, -1);
        assert!(!m.contains_key(0));
        assert_eq!(m.keys(), vec![b'z']);
        assert_eq!(m.iter().count(), 1);
    }

    #[test]
    fn keys_is_a_detached_snapshot() {
        let mut m: ByteMap<u32> = ByteMap::new(0);
        m.put(3, 1);
        let mut snapshot = m.keys();
        snapshot.push(9);
        snapshot[0] = 200;
        assert_eq!(m.keys(), vec![3]);
        assert!(!m.contains_key(200));
    }

    /// Invariant: crossing the expansion threshold keeps every pair.
    #[test]
    fn expansion_preserves_content() {
        let mut m: CharMap<u32> = CharMap::with_capacity(2, 0.5, u32::MAX).unwrap();
        let before = m.capacity();
        for c in 1..=500u16 {
            m.put(c.wrapping_mul(131), u32::from(c));
        }
        assert!(m.capacity() > before);
        assert_eq!(m.len(), 500);
        for c in 1..=500u16 {
            assert_eq!(*m.get(c.wrapping_mul(131)), u32::from(c));
        }
        assert!(m.len() <= m.sizing.expand_at);
    }

    #[test]
    fn byte_map_holds_its_whole_domain() {
        let mut m: ByteMap<u16> = ByteMap::new(0);
        for b in 0..=u8::MAX {
            m.put(b, u16::from(b) + 1);
        }
        assert_eq!(m.len(), 255);
        assert_eq!(m.capacity(), 512);
        let expected: Vec<u8> = (1..=u8::MAX).chain([0]).collect();
        assert_eq!(m.keys(), expected);
        for b in 0..=u8::MAX {
            assert_eq!(*m.get(b), u16::from(b) + 1);
        }
    }

    #[test]
    fn with_capacity_rejects_bad_configuration() {
        assert_eq!(
            ByteMap::with_capacity(0, 0.5, ()).err(),
            Some(ConfigError::Capacity(0))
        );
        assert_eq!(
            CharMap::with_capacity(8, 1.5, ()).err(),
            Some(ConfigError::LoadFactor(1.5))
        );
    }

    /// Invariant: removing an entry that displaced a later one keeps the
    /// later one reachable from its home slot.
    #[test]
    fn displaced_key_survives_removal_of_its_blocker() {
        let mut m: ByteMap<i32> = ByteMap::new(-1);
        let (first, second) = colliding_pair(&m);
        m.put(first, 1);
        m.put(second, 2);

        let mut cursor = m.entries();
        loop {
            let (key, _) = cursor.next(&m).unwrap();
            if key == first {
                break;
            }
        }
        assert_eq!(cursor.remove(&mut m), Ok(1));
        assert_eq!(*m.get(second), 2);
        assert_eq!(*m.get(first), -1);
        assert_eq!(m.len(), 1);

        // The shifted entry is still produced by the same cursor.
        let (key, value) = cursor.next(&m).unwrap();
        assert_eq!((key, *value), (second, 2));
        assert_eq!(cursor.next(&m), Err(IterError::Exhausted));
    }

    #[test]
    fn retain_filters_entries_and_null_key() {
        let mut m: CharMap<u32> = CharMap::new(0);
        for c in 1..=40u16 {
            m.put(c, u32::from(c));
        }
        m.put(0, 99);
        m.retain(|k, v| k != 0 && v % 2 == 0);
        let expected: Vec<u16> = (1..=40u16).filter(|c| c % 2 == 0).collect();
        assert_eq!(m.keys(), expected);
        assert_eq!(m.len(), 20);
        assert_eq!(*m.get(0), 0);
        for c in (1..=40u16).filter(|c| c % 2 == 1) {
            assert!(!m.contains_key(c));
        }
    }

    #[test]
    fn iter_is_exact_sized() {
        let mut m: ByteMap<u8> = ByteMap::new(0);
        m.put(1, 1);
        m.put(2, 2);
        m.put(0, 5);
        let it = m.iter();
        assert_eq!(it.len(), 3);
        assert_eq!((&m).into_iter().count(), 3);
    }

    #[test]
    fn debug_lists_entries() {
        let mut m: ByteMap<i32> = ByteMap::new(0);
        m.put(7, 70);
        assert_eq!(format!("{m:?}"), "{7: 70}");
    }

    #[test]
    fn default_uses_value_default() {
        let m: CharMap<Option<u32>> = CharMap::default();
        assert_eq!(*m.get(ch('q')), None);
        assert_eq!(m.default_value(), &None);
        assert!(m.is_empty());
    }
}
