//! OrderedHashMap: hash index over an arena-backed doubly linked list.
//!
//! Nodes live in a `SlotMap`; `prev`/`next` links are arena keys rather than
//! pointers. Two reserved slots act as head and tail sentinels, so linking
//! and unlinking never special-case an empty neighbour. The `HashTable`
//! stores arena keys only and is probed with the hash cached in each node.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use hashbrown::HashTable;
use slotmap::{DefaultKey, Key, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    // `None` only for the two sentinels.
    entry: Option<Entry<K, V>>,
    prev: DefaultKey,
    next: DefaultKey,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Node {
            entry: None,
            prev: DefaultKey::null(),
            next: DefaultKey::null(),
        }
    }
}

/// Hash map that enumerates keys in the order they were first inserted.
///
/// Updating an existing key keeps its position; removing and re-inserting a
/// key moves it to the back.
#[derive(Clone)]
pub struct OrderedHashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Node<K, V>>,
    head: DefaultKey,
    tail: DefaultKey,
}

impl<K, V> OrderedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for OrderedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let mut slots = SlotMap::with_capacity_and_key(capacity.saturating_add(2));
        let head = slots.insert(Node::sentinel());
        let tail = slots.insert(Node::sentinel());
        slots[head].next = tail;
        slots[tail].prev = head;
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            slots,
            head,
            tail,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn key_matches<Q>(slots: &SlotMap<DefaultKey, Node<K, V>>, k: DefaultKey, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        slots
            .get(k)
            .and_then(|n| n.entry.as_ref())
            .map(|e| e.key.borrow() == q)
            .unwrap_or(false)
    }

    fn find_slot<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&k| Self::key_matches(&self.slots, k, q))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.find_slot(q)?;
        self.slots
            .get(k)
            .and_then(|n| n.entry.as_ref())
            .map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.find_slot(q)?;
        self.slots
            .get_mut(k)
            .and_then(|n| n.entry.as_mut())
            .map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_slot(q).is_some()
    }

    /// Inserts or updates `key`, returning the value it replaced.
    ///
    /// A new key is linked in just before the tail sentinel. An existing key
    /// only has its value overwritten; its position does not change.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&kk| Self::key_matches(&self.slots, kk, &key),
            |&kk| {
                self.slots
                    .get(kk)
                    .and_then(|n| n.entry.as_ref())
                    .map(|e| e.hash)
                    .unwrap_or(0)
            },
        ) {
            hashbrown::hash_table::Entry::Occupied(o) => self
                .slots
                .get_mut(*o.get())
                .and_then(|n| n.entry.as_mut())
                .map(|e| mem::replace(&mut e.value, value)),
            hashbrown::hash_table::Entry::Vacant(v) => {
                let last = self.slots[self.tail].prev;
                let k = self.slots.insert(Node {
                    entry: Some(Entry { key, value, hash }),
                    prev: last,
                    next: self.tail,
                });
                let _ = v.insert(k);
                self.slots[last].next = k;
                self.slots[self.tail].prev = k;
                None
            }
        }
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    ///
    /// The node is spliced out of the list and freed; its arena key never
    /// resolves again because slot generations are bumped on removal.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let (k, _) = self
            .index
            .find_entry(hash, |&kk| Self::key_matches(&self.slots, kk, q))
            .ok()?
            .remove();

        let node = self.slots.remove(k)?;
        self.slots[node.prev].next = node.next;
        self.slots[node.next].prev = node.prev;
        node.entry.map(|e| e.value)
    }

    /// Drops every entry, leaving only the sentinels.
    pub fn clear(&mut self) {
        let (head, tail) = (self.head, self.tail);
        self.index.clear();
        self.slots.retain(|k, _| k == head || k == tail);
        self.slots[head].next = tail;
        self.slots[tail].prev = head;
    }

    #[cfg(test)]
    pub(crate) fn sentinels_linked_when_empty(&self) -> bool {
        let empty_links =
            self.slots[self.head].next == self.tail && self.slots[self.tail].prev == self.head;
        empty_links == self.is_empty()
    }

    /// Walks the list in both directions and checks it against the index.
    #[cfg(test)]
    pub(crate) fn links_consistent(&self) -> bool {
        let mut forward = Vec::new();
        let mut cur = self.slots[self.head].next;
        while cur != self.tail {
            let node = &self.slots[cur];
            if self.slots[node.next].prev != cur {
                return false;
            }
            forward.push(cur);
            cur = node.next;
        }
        let mut backward = Vec::new();
        let mut cur = self.slots[self.tail].prev;
        while cur != self.head {
            backward.push(cur);
            cur = self.slots[cur].prev;
        }
        backward.reverse();
        forward == backward
            && forward.len() == self.index.len()
            && self.slots.len() == self.index.len() + 2
            && forward.iter().all(|k| self.index.iter().any(|kk| kk == k))
    }
}

impl<K, V, S> OrderedHashMap<K, V, S> {
    /// Entries from oldest to newest insertion.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.slots[self.head].next,
            tail: self.tail,
            remaining: self.index.len(),
        }
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Oldest live entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Newest live entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        // On an empty map this lands on the head sentinel, which has no entry.
        let last = self.slots[self.tail].prev;
        self.slots
            .get(last)
            .and_then(|n| n.entry.as_ref())
            .map(|e| (&e.key, &e.value))
    }
}

/// Iterator over the entries of an [`OrderedHashMap`] in insertion order.
pub struct Iter<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Node<K, V>>,
    cursor: DefaultKey,
    tail: DefaultKey,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.tail {
            return None;
        }
        let node = self.slots.get(self.cursor)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        node.entry.as_ref().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the keys of an [`OrderedHashMap`] in insertion order.
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

/// Iterator over the values of an [`OrderedHashMap`] in insertion order.
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

impl<'a, K, V, S> IntoIterator for &'a OrderedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> fmt::Debug for OrderedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedHashMap<K, V, S>
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

impl<K, V, S> FromIterator<(K, V)> for OrderedHashMap<K, V, S>
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
