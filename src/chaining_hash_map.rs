//! ChainingHashMap: bucket array with separate chaining and load-factor resizing.
//!
//! The table grows to twice its capacity once `len >= 0.75 * capacity` and
//! shrinks to a quarter of its capacity once `len <= capacity / 8`. Both
//! resizes rebuild the whole table before swapping it in.

use crate::error::{MapError, Result};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use std::collections::hash_map::RandomState;

/// Capacity used by [`ChainingHashMap::new`].
pub const DEFAULT_CAPACITY: usize = 4;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

type Bucket<K, V> = Vec<Entry<K, V>>;

/// Maps a key hash onto `0..capacity`.
///
/// Hashes are unsigned, so every value, including the bit pattern of
/// `i64::MIN`, lands on a valid bucket. `capacity` must be non-zero.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    (0..capacity.max(1)).map(|_| Vec::new()).collect()
}

/// Hash map resolving collisions by chaining entries inside each bucket.
#[derive(Clone)]
pub struct ChainingHashMap<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Bucket<K, V>>,
    len: usize,
}

impl<K, V> ChainingHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a map with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for ChainingHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainingHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            buckets: empty_buckets(capacity),
            len: 0,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets in the current table. Always at least one.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn find_entry<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let idx = bucket_index(hash, self.capacity());
        self.buckets[idx]
            .iter()
            .find(|e| e.hash == hash && e.key.borrow() == q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(q).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let idx = bucket_index(hash, self.capacity());
        self.buckets[idx]
            .iter_mut()
            .find(|e| e.hash == hash && e.key.borrow() == q)
            .map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(q).is_some()
    }

    /// Inserts or updates `key`, returning the value it replaced.
    ///
    /// An update overwrites the value in place and leaves `len` unchanged.
    /// A new key is appended to its bucket; if the load factor then reaches
    /// 0.75 the table is rebuilt at twice the capacity, new entry included.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        let idx = bucket_index(hash, self.capacity());
        let bucket = &mut self.buckets[idx];
        if let Some(e) = bucket.iter_mut().find(|e| e.hash == hash && e.key == key) {
            return Some(mem::replace(&mut e.value, value));
        }
        bucket.push(Entry { key, value, hash });
        self.len += 1;

        if self.len.saturating_mul(4) >= self.capacity().saturating_mul(3) {
            self.resize(self.capacity().saturating_mul(2));
        }
        None
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    ///
    /// Once `len <= capacity / 8` the table is rebuilt at a quarter of the
    /// capacity.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let idx = bucket_index(hash, self.capacity());
        let bucket = &mut self.buckets[idx];
        let pos = bucket
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == q)?;
        let entry = bucket.remove(pos);
        self.len -= 1;

        if self.len <= self.capacity() / 8 {
            self.resize(self.capacity() / 4);
        }
        Some(entry.value)
    }

    /// Like [`get`](Self::get), for callers holding a possibly missing key.
    pub fn try_get<Q>(&self, q: Option<&Q>) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let q = q.ok_or(MapError::InvalidKey)?;
        Ok(self.get(q))
    }

    /// Like [`insert`](Self::insert); a missing key fails before any mutation.
    pub fn try_insert(&mut self, key: Option<K>, value: V) -> Result<Option<V>> {
        let key = key.ok_or(MapError::InvalidKey)?;
        Ok(self.insert(key, value))
    }

    /// Like [`remove`](Self::remove); a missing key fails before any mutation.
    pub fn try_remove<Q>(&mut self, q: Option<&Q>) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let q = q.ok_or(MapError::InvalidKey)?;
        Ok(self.remove(q))
    }

    /// Drops every entry. The capacity is kept.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.len = 0;
    }

    // Rebuilds into a fresh table using each entry's cached hash, then swaps.
    fn resize(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.max(1);
        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return;
        }
        let mut rebuilt = empty_buckets(new_capacity);
        for entry in self.buckets.drain(..).flatten() {
            rebuilt[bucket_index(entry.hash, new_capacity)].push(entry);
        }
        self.buckets = rebuilt;
        log::debug!(
            "chaining map resized from {} to {} buckets ({} entries)",
            old_capacity,
            new_capacity,
            self.len
        );
    }

    #[cfg(test)]
    pub(crate) fn bucket_lens(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Checks that every entry sits in the bucket its cached hash selects.
    #[cfg(test)]
    pub(crate) fn entries_are_placed(&self) -> bool {
        let cap = self.capacity();
        self.buckets
            .iter()
            .enumerate()
            .all(|(i, b)| b.iter().all(|e| bucket_index(e.hash, cap) == i))
    }
}

impl<K, V, S> ChainingHashMap<K, V, S> {
    /// Entries in bucket order, then in-bucket order. The order carries no
    /// meaning and changes across resizes.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.buckets.iter().flatten(),
            remaining: self.len,
        }
    }

    /// Live keys in the same order as [`iter`](Self::iter).
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

/// Iterator over the entries of a [`ChainingHashMap`].
pub struct Iter<'a, K, V> {
    it: core::iter::Flatten<core::slice::Iter<'a, Bucket<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.next()?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a [`ChainingHashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`ChainingHashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a ChainingHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> fmt::Debug for ChainingHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainingHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainingHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}
