//! hashmap-primitives: two associative containers built from first
//! principles, a separate-chaining hash map and an insertion-ordered map.
//!
//! Internal Design:
//!
//! Summary
//! - ChainingHashMap<K, V, S>: a `Vec` of buckets, each bucket a small `Vec`
//!   of entries. Collisions chain within a bucket; the table is rebuilt
//!   wholesale when the load factor crosses its thresholds.
//! - OrderedHashMap<K, V, S>: a `hashbrown::HashTable` index over a
//!   doubly linked list whose nodes live in a `slotmap::SlotMap` arena.
//!   Keys enumerate in first-insertion order.
//!
//! Constraints
//! - Single-threaded: no internal locking. Callers sharing a map across
//!   threads wrap the whole container in their own lock.
//! - Key matching is by value (`K: Eq`), consistently across get, insert
//!   and remove.
//! - `K: Hash` and `K: Eq` must agree (`a == b` implies equal hashes).
//!   Violating that is a logic error; the maps stay memory safe but may
//!   lose track of entries.
//!
//! Resize policy (ChainingHashMap)
//! - Grow to `2 * capacity` once `len >= 0.75 * capacity`, checked after a
//!   new key is inserted.
//! - Shrink to `capacity / 4` once `len <= capacity / 8`, checked after a
//!   removal.
//! - Capacity never drops below one bucket.
//! - Each entry caches its `u64` hash on insert; rehashing reuses it and
//!   never calls `K: Hash` again. The rebuilt table is swapped in only once
//!   every entry has been moved.
//!
//! Ordering (OrderedHashMap)
//! - Two reserved arena slots act as head and tail sentinels. New keys are
//!   linked just before the tail; updates leave the node where it is.
//! - Removal unlinks the node and frees its slot. Slot generations make the
//!   freed key unresolvable, so nothing can traverse through a stale node.
//! - Lookups never reorder entries.
//!
//! Errors
//! - Absence is reported as `None`, never as an error.
//! - `MapError::InvalidKey` is returned by the `try_*` entry points of
//!   ChainingHashMap when given no key, before any state is touched.
//!
//! Notes and non-goals
//! - No persistence, no concurrency, no incremental rehashing.
//! - Iterators borrow the map, so mutation during enumeration is rejected
//!   at compile time.

pub mod chaining_hash_map;
mod chaining_hash_map_proptest;
mod error;
pub mod ordered_hash_map;

// Public surface
pub use chaining_hash_map::ChainingHashMap;
pub use error::{MapError, Result};
pub use ordered_hash_map::OrderedHashMap;
