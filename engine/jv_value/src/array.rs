//! Persistent arrays with shared, sliceable backing buffers.
//!
//! An [`Array`] is a view `(offset, len)` into a reference-counted buffer of
//! values. Copying an array, or slicing it, only adds a reference to the
//! buffer. Writes go through `make_unique`, which enforces the
//! copy-on-write rule:
//!
//! - a shared buffer is never written; the visible range is copied into a
//!   private buffer (with room for the pending write) and the view moves there;
//! - a sole owner writes in place, after dropping any entries that lie outside
//!   its view (nobody else can reach them).
//!
//! # Complexity
//!
//! | Operation          | Cost                                  |
//! |--------------------|---------------------------------------|
//! | copy / slice       | O(1)                                  |
//! | get / len          | O(1)                                  |
//! | push (sole owner)  | amortized O(1), capacity doubles      |
//! | set / push (shared)| O(n) for the private copy             |
//! | concat             | O(m) for the right operand            |

use std::fmt;

use crate::rc::Shared;
use crate::release::release_all;
use crate::Value;

/// Backing storage for arrays.
///
/// Dropping the last reference releases the elements iteratively, so deeply
/// nested arrays do not recurse once per level.
pub(crate) struct Items(Vec<Value>);

impl Drop for Items {
    fn drop(&mut self) {
        if !self.0.is_empty() {
            release_all(std::mem::take(&mut self.0));
        }
    }
}

/// A persistent sequence of values.
#[derive(Clone)]
pub struct Array {
    buf: Shared<Items>,
    offset: usize,
    len: usize,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Array {
            buf: Shared::new(Items(Vec::with_capacity(capacity))),
            offset: 0,
            len: 0,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The visible elements.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.buf.0[self.offset..self.offset + self.len]
    }

    /// Element at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.as_slice().iter()
    }

    /// Replace the element at `index`.
    ///
    /// Writing past the end pads the gap with nulls, so the array ends up with
    /// `index + 1` elements.
    pub fn set(&mut self, index: usize, value: Value) {
        let extra = index.saturating_add(1).saturating_sub(self.len);
        let len = {
            let items = self.make_unique(extra);
            if let Some(slot) = items.get_mut(index) {
                *slot = value;
            } else {
                items.resize(index, Value::Null);
                items.push(value);
            }
            items.len()
        };
        self.len = len;
    }

    /// Move the element at `index` out, leaving null in its place.
    ///
    /// Out-of-range indexes yield null and leave the array untouched. A
    /// shared buffer is copied first, so the taken element stays reachable
    /// from the other owners.
    pub(crate) fn take(&mut self, index: usize) -> Value {
        if index >= self.len {
            return Value::Null;
        }
        std::mem::take(&mut self.make_unique(0)[index])
    }

    /// Append one element.
    pub fn push(&mut self, value: Value) {
        let len = {
            let items = self.make_unique(1);
            items.push(value);
            items.len()
        };
        self.len = len;
    }

    /// Append every element of `other`.
    ///
    /// The left buffer is extended in place when this array is its sole
    /// owner; otherwise a fresh buffer sized for both operands is allocated.
    /// Elements of `other` are moved when `other` owns its buffer outright,
    /// and copied (reference increments) when it does not.
    pub fn concat(&mut self, other: Array) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        let len = {
            let items = self.make_unique(other.len());
            items.extend(other);
            items.len()
        };
        self.len = len;
    }

    /// The elements in `[start, end)` as a new array sharing this buffer.
    ///
    /// Returns `None` when `start > end` or `end > len`.
    pub fn slice(&self, start: usize, end: usize) -> Option<Array> {
        if start > end || end > self.len {
            return None;
        }
        Some(Array {
            buf: self.buf.clone(),
            offset: self.offset + start,
            len: end - start,
        })
    }

    /// Take the elements out, moving them when the buffer is not shared.
    pub fn into_vec(self) -> Vec<Value> {
        let (start, end) = (self.offset, self.offset + self.len);
        match self.buf.try_unwrap() {
            Ok(mut items) => {
                let mut values = std::mem::take(&mut items.0);
                values.truncate(end);
                values.rotate_left(start);
                values.truncate(end - start);
                values
            }
            Err(shared) => shared.0[start..end].to_vec(),
        }
    }

    /// Reference count of the backing buffer.
    pub fn refcount(&self) -> usize {
        self.buf.count()
    }

    /// Whether both arrays are views into the same buffer.
    pub fn shares_buffer_with(&self, other: &Array) -> bool {
        Shared::ptr_eq(&self.buf, &other.buf)
    }

    /// Hand this array's elements to an iterative release, if this is the
    /// buffer's last reference.
    pub(crate) fn release_into(self, pending: &mut Vec<Value>) {
        if let Ok(mut items) = self.buf.try_unwrap() {
            pending.append(&mut items.0);
        }
    }

    /// Exclusive access to a buffer holding exactly the visible elements,
    /// with capacity for `extra` more.
    fn make_unique(&mut self, extra: usize) -> &mut Vec<Value> {
        let (start, end) = (self.offset, self.offset + self.len);
        self.offset = 0;
        let mut cloned = false;
        let items = self.buf.make_mut_with(|shared| {
            cloned = true;
            let mut fresh = Vec::with_capacity(end - start + extra);
            fresh.extend_from_slice(&shared.0[start..end]);
            Items(fresh)
        });
        if !cloned {
            // Sole owner: entries outside the view are unreachable.
            items.0.truncate(end);
            items.0.rotate_left(start);
            items.0.truncate(end - start);
            if items.0.capacity() - items.0.len() < extra {
                tracing::trace!(len = items.0.len(), extra, "array buffer growth");
                items.0.reserve(extra);
            }
        }
        &mut items.0
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let values: Vec<Value> = iter.into_iter().collect();
        Array {
            len: values.len(),
            buf: Shared::new(Items(values)),
            offset: 0,
        }
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
