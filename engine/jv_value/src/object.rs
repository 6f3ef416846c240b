//! Persistent string-keyed maps.
//!
//! # Table Layout
//!
//! An [`Object`] holds a reference-counted [`Table`]:
//!
//! ```text
//! buckets: [ Some(2) | None | Some(0) | ... ]     2 × slot limit, power of two
//!               │               │
//!               ▼               ▼
//! slots:   [ "a" → 1, next: None ][ (deleted) ][ "c" → 3, next: Some(1)… ]
//! ```
//!
//! Slots are appended in insertion order and chained per bucket through their
//! `next` index. Deleting unlinks the slot from its chain and leaves a
//! tombstone; tombstones are compacted away the next time the slot vector
//! fills up. Lookups hash the key with the string engine's hash (cached inside
//! [`Str`]) and compare bytes only on a hash match.
//!
//! # Iteration
//!
//! A [`Cursor`] is a slot index plus the table generation it was issued
//! against. Every insert or delete bumps the generation, so a cursor kept
//! across a mutation of the same object is detected and rejected rather than
//! silently skipping or repeating entries. Iteration order is slot order; no
//! order is promised to callers.

use std::fmt;

use crate::error::contract_violation;
use crate::rc::Shared;
use crate::release::release_all;
use crate::string::{hash_bytes, Str};
use crate::Value;

/// Slot capacity of a freshly created table.
const INITIAL_SLOTS: usize = 8;

/// Anything that can be used to look up an object key.
pub trait ObjectKey {
    /// Key contents.
    fn key_bytes(&self) -> &[u8];
    /// Key hash, identical to [`Str::hash_code`] for the same bytes.
    fn key_hash(&self) -> u32;
}

impl ObjectKey for Str {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    fn key_hash(&self) -> u32 {
        self.hash_code()
    }
}

impl ObjectKey for str {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    fn key_hash(&self) -> u32 {
        hash_bytes(self.as_bytes())
    }
}

impl ObjectKey for String {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    fn key_hash(&self) -> u32 {
        hash_bytes(self.as_bytes())
    }
}

impl ObjectKey for [u8] {
    fn key_bytes(&self) -> &[u8] {
        self
    }

    fn key_hash(&self) -> u32 {
        hash_bytes(self)
    }
}

#[derive(Clone)]
struct Slot {
    /// `None` marks a deleted slot.
    key: Option<Str>,
    hash: u32,
    next: Option<usize>,
    value: Value,
}

#[derive(Clone)]
pub(crate) struct Table {
    slots: Vec<Slot>,
    buckets: Box<[Option<usize>]>,
    len: usize,
    generation: u32,
}

impl Table {
    fn with_slot_limit(slot_limit: usize) -> Self {
        Table {
            slots: Vec::with_capacity(slot_limit),
            buckets: vec![None; slot_limit * 2].into_boxed_slice(),
            len: 0,
            generation: 0,
        }
    }

    #[inline]
    fn slot_limit(&self) -> usize {
        self.buckets.len() / 2
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize & (self.buckets.len() - 1)
    }

    fn find(&self, key: &[u8], hash: u32) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_of(hash)];
        while let Some(index) = cursor {
            let slot = &self.slots[index];
            if slot.hash == hash && slot.key.as_ref().is_some_and(|k| k.as_bytes() == key) {
                return Some(index);
            }
            cursor = slot.next;
        }
        None
    }

    fn insert(&mut self, key: Str, value: Value) -> Option<Value> {
        let hash = key.hash_code();
        self.generation = self.generation.wrapping_add(1);
        if let Some(index) = self.find(key.as_bytes(), hash) {
            return Some(std::mem::replace(&mut self.slots[index].value, value));
        }
        if self.slots.len() == self.slot_limit() {
            self.rehash();
        }
        let bucket = self.bucket_of(hash);
        let index = self.slots.len();
        self.slots.push(Slot {
            key: Some(key),
            hash,
            next: self.buckets[bucket],
            value,
        });
        self.buckets[bucket] = Some(index);
        self.len += 1;
        None
    }

    fn remove(&mut self, key: &[u8], hash: u32) -> Option<Value> {
        let bucket = self.bucket_of(hash);
        let mut prev: Option<usize> = None;
        let mut cursor = self.buckets[bucket];
        while let Some(index) = cursor {
            let next = self.slots[index].next;
            let slot = &self.slots[index];
            if slot.hash == hash && slot.key.as_ref().is_some_and(|k| k.as_bytes() == key) {
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.slots[p].next = next,
                }
                let slot = &mut self.slots[index];
                slot.key = None;
                slot.next = None;
                self.len -= 1;
                self.generation = self.generation.wrapping_add(1);
                return Some(std::mem::replace(&mut slot.value, Value::Null));
            }
            prev = Some(index);
            cursor = next;
        }
        None
    }

    /// Rebuild the chains, dropping tombstones and doubling the slot limit
    /// when at least half the slots are live.
    fn rehash(&mut self) {
        let old_limit = self.slot_limit();
        let new_limit = if self.len * 2 >= old_limit {
            old_limit * 2
        } else {
            old_limit
        };
        tracing::trace!(
            live = self.len,
            old_buckets = old_limit * 2,
            new_buckets = new_limit * 2,
            "object table rehash"
        );
        let old_slots = std::mem::replace(&mut self.slots, Vec::with_capacity(new_limit));
        self.buckets = vec![None; new_limit * 2].into_boxed_slice();
        for slot in old_slots {
            if let Some(key) = slot.key {
                let bucket = self.bucket_of(slot.hash);
                let index = self.slots.len();
                self.slots.push(Slot {
                    key: Some(key),
                    hash: slot.hash,
                    next: self.buckets[bucket],
                    value: slot.value,
                });
                self.buckets[bucket] = Some(index);
            }
        }
    }

    /// First live slot at or after `from`, or `slots.len()` if none.
    fn live_from(&self, from: usize) -> usize {
        self.slots
            .iter()
            .skip(from)
            .position(|slot| slot.key.is_some())
            .map_or(self.slots.len(), |offset| from + offset)
    }

    fn take_values(&mut self) -> Vec<Value> {
        self.slots.drain(..).map(|slot| slot.value).collect()
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        if !self.slots.is_empty() {
            release_all(self.take_values());
        }
    }
}

/// Position in an object's slot table, valid until that object is mutated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    slot: usize,
    generation: u32,
}

/// A persistent map from string keys to values.
#[derive(Clone)]
pub struct Object {
    table: Shared<Table>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Object {
            table: Shared::new(Table::with_slot_limit(INITIAL_SLOTS)),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len
    }

    /// Whether the object has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len == 0
    }

    /// Value stored under `key`.
    pub fn get<K: ObjectKey + ?Sized>(&self, key: &K) -> Option<&Value> {
        let index = self.table.find(key.key_bytes(), key.key_hash())?;
        Some(&self.table.slots[index].value)
    }

    /// Whether `key` has an entry.
    pub fn contains_key<K: ObjectKey + ?Sized>(&self, key: &K) -> bool {
        self.table.find(key.key_bytes(), key.key_hash()).is_some()
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<Str>, value: Value) -> Option<Value> {
        self.table.make_mut_with(Table::clone).insert(key.into(), value)
    }

    /// Delete the entry for `key`, returning its value.
    ///
    /// An absent key leaves the object (and any buffer it shares) untouched.
    pub fn remove<K: ObjectKey + ?Sized>(&mut self, key: &K) -> Option<Value> {
        let (bytes, hash) = (key.key_bytes(), key.key_hash());
        self.table.find(bytes, hash)?;
        self.table.make_mut_with(Table::clone).remove(bytes, hash)
    }

    /// Move the value for `key` out, leaving null in its place.
    ///
    /// A shared table is copied first; an absent key leaves it untouched.
    pub(crate) fn take<K: ObjectKey + ?Sized>(&mut self, key: &K) -> Value {
        let Some(index) = self.table.find(key.key_bytes(), key.key_hash()) else {
            return Value::Null;
        };
        let table = self.table.make_mut_with(Table::clone);
        table.generation = table.generation.wrapping_add(1);
        std::mem::take(&mut table.slots[index].value)
    }

    /// Copy every entry of `other` into this object; `other` wins on
    /// conflicting keys.
    pub fn merge(&mut self, other: Object) {
        if self.is_empty() {
            *self = other;
            return;
        }
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    /// All keys, sorted byte-wise.
    pub fn keys(&self) -> Vec<Str> {
        let mut keys: Vec<Str> = self.iter().map(|(key, _)| key.clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Borrowing iterator over entries in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            object: self,
            cursor: self.cursor_start(),
        }
    }

    /// Cursor at the first entry (or already exhausted for an empty object).
    pub fn cursor_start(&self) -> Cursor {
        Cursor {
            slot: self.table.live_from(0),
            generation: self.table.generation,
        }
    }

    /// Cursor at the entry after `cursor`; an exhausted cursor stays exhausted.
    #[track_caller]
    pub fn cursor_next(&self, cursor: Cursor) -> Cursor {
        self.check_generation(cursor);
        let from = cursor.slot.saturating_add(1).min(self.table.slots.len());
        Cursor {
            slot: self.table.live_from(from),
            generation: cursor.generation,
        }
    }

    /// Whether `cursor` points at an entry.
    #[track_caller]
    pub fn cursor_valid(&self, cursor: Cursor) -> bool {
        self.check_generation(cursor);
        cursor.slot < self.table.slots.len()
    }

    /// Key of the entry under `cursor`.
    #[track_caller]
    pub fn cursor_key(&self, cursor: Cursor) -> &Str {
        self.live_slot(cursor).0
    }

    /// Value of the entry under `cursor`.
    #[track_caller]
    pub fn cursor_value(&self, cursor: Cursor) -> &Value {
        self.live_slot(cursor).1
    }

    /// Reference count of the backing table.
    pub fn refcount(&self) -> usize {
        self.table.count()
    }

    /// Whether both objects use the same table.
    pub fn shares_buffer_with(&self, other: &Object) -> bool {
        Shared::ptr_eq(&self.table, &other.table)
    }

    /// Hand this object's values to an iterative release, if this is the
    /// table's last reference.
    pub(crate) fn release_into(self, pending: &mut Vec<Value>) {
        if let Ok(mut table) = self.table.try_unwrap() {
            pending.append(&mut table.take_values());
        }
    }

    #[track_caller]
    fn check_generation(&self, cursor: Cursor) {
        if cursor.generation != self.table.generation {
            contract_violation(
                "object iteration",
                "cursor used after its object was modified",
            );
        }
    }

    #[track_caller]
    fn live_slot(&self, cursor: Cursor) -> (&Str, &Value) {
        self.check_generation(cursor);
        match self.table.slots.get(cursor.slot) {
            Some(Slot {
                key: Some(key),
                value,
                ..
            }) => (key, value),
            _ => contract_violation("object iteration", "cursor does not point at an entry"),
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing iterator over an object's entries.
pub struct Iter<'a> {
    object: &'a Object,
    cursor: Cursor,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.object.cursor_valid(self.cursor) {
            return None;
        }
        let entry = self.object.live_slot(self.cursor);
        self.cursor = self.object.cursor_next(self.cursor);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.object.len()))
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a Str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Owned entries; moved out when the table is not shared.
impl IntoIterator for Object {
    type Item = (Str, Value);
    type IntoIter = std::vec::IntoIter<(Str, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(Str, Value)> = match self.table.try_unwrap() {
            Ok(mut table) => table
                .slots
                .drain(..)
                .filter_map(|slot| slot.key.map(|key| (key, slot.value)))
                .collect(),
            Err(shared) => Object { table: shared }
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };
        entries.into_iter()
    }
}

impl<K: Into<Str>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

/// Order-independent: same key set, equal value per key.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value == theirs))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
