//! The JSON value type and its operation surface.
//!
//! # Ownership Convention
//!
//! Operations that produce a modified value take `self` by value: the input
//! is consumed and the caller gets exactly one owned result back. Rust's move
//! semantics make "do not touch a value after passing it in" a compile-time
//! rule rather than a calling convention.
//!
//! ```text
//! let v = Value::array()
//!     .array_append(Value::number(1.0))
//!     .array_append(Value::number(2.0));
//! ```
//!
//! Read-only operations borrow (`&self`) and hand back owned results, so a
//! lookup never invalidates the value it looked into. [`Value::copy`] is the
//! one explicit duplication: it adds a reference to the heap buffer and never
//! copies data.
//!
//! # Error Policy
//!
//! - Absent data (index out of range, missing key) reads as [`Value::Null`].
//! - Slice bounds that cannot be honoured return [`ValueError`].
//! - A kind-specific operation on the wrong kind panics: it is a bug in the
//!   caller, not a data condition.

use std::ffi::CStr;
use std::fmt;

use crate::error::kind_mismatch;
use crate::object::ObjectKey;
use crate::{ensure_sufficient_stack, Array, Cursor, Kind, Object, Str, ValueError};

/// A JSON value.
///
/// `Null`, `False`, `True` and `Number` live entirely inside the enum. The
/// three container-like variants hold a handle to a shared, copy-on-write
/// buffer (short strings excepted, which are stored inline).
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    False,
    True,
    Number(f64),
    String(Str),
    Object(Object),
    Array(Array),
}

// Construction

impl Value {
    /// The null value.
    #[inline]
    pub fn null() -> Self {
        Value::Null
    }

    /// The `true` value.
    #[inline]
    pub fn true_() -> Self {
        Value::True
    }

    /// The `false` value.
    #[inline]
    pub fn false_() -> Self {
        Value::False
    }

    /// `true` or `false`.
    #[inline]
    pub fn bool(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }

    /// A number. NaN and infinities are stored as given.
    #[inline]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// A string from anything convertible to [`Str`].
    pub fn string(s: impl Into<Str>) -> Self {
        Value::String(s.into())
    }

    /// A string with an explicit length (arbitrary bytes, NUL included).
    pub fn string_sized(bytes: &[u8]) -> Self {
        Value::String(Str::from_bytes(bytes))
    }

    /// A string from a null-terminated C string.
    pub fn string_cstr(s: &CStr) -> Self {
        Value::String(Str::from_c_str(s))
    }

    /// An empty array.
    pub fn array() -> Self {
        Value::Array(Array::new())
    }

    /// An empty array with room for `capacity` elements.
    pub fn array_sized(capacity: usize) -> Self {
        Value::Array(Array::with_capacity(capacity))
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(Object::new())
    }
}

// Inspection

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::False => Kind::False,
            Value::True => Kind::True,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }

    /// A second owned handle to the same value.
    ///
    /// Heap-backed values gain a reference; no data is copied.
    #[inline]
    #[must_use]
    pub fn copy(&self) -> Value {
        self.clone()
    }

    /// Release this value.
    ///
    /// Equivalent to letting it go out of scope. Containers are released
    /// iteratively, however deeply nested.
    #[inline]
    pub fn free(self) {}

    /// Deep structural equality; same as `==`.
    pub fn equal(&self, other: &Value) -> bool {
        self == other
    }

    /// Reference count of the backing buffer, or 1 for values without one.
    pub fn refcount(&self) -> usize {
        match self {
            Value::String(s) => s.refcount(),
            Value::Object(o) => o.refcount(),
            Value::Array(a) => a.refcount(),
            Value::Null | Value::False | Value::True | Value::Number(_) => 1,
        }
    }

    /// Whether both values hold the same heap buffer.
    ///
    /// Used to check that an update left a subtree shared rather than copied.
    /// Always `false` for values without a buffer.
    pub fn shares_buffer_with(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.shares_buffer_with(b),
            (Value::Object(a), Value::Object(b)) => a.shares_buffer_with(b),
            (Value::Array(a), Value::Array(b)) => a.shares_buffer_with(b),
            _ => false,
        }
    }

    /// The payload of a number.
    #[track_caller]
    pub fn number_value(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            other => kind_mismatch("number_value", Kind::Number, other.kind()),
        }
    }

    /// The payload of a number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The `true`/`false` payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&Str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The array, if this is one.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The object, if this is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    #[track_caller]
    fn str_ref(&self, operation: &str) -> &Str {
        match self {
            Value::String(s) => s,
            other => kind_mismatch(operation, Kind::String, other.kind()),
        }
    }

    #[track_caller]
    fn array_ref(&self, operation: &str) -> &Array {
        match self {
            Value::Array(a) => a,
            other => kind_mismatch(operation, Kind::Array, other.kind()),
        }
    }

    #[track_caller]
    fn object_ref(&self, operation: &str) -> &Object {
        match self {
            Value::Object(o) => o,
            other => kind_mismatch(operation, Kind::Object, other.kind()),
        }
    }

    #[track_caller]
    fn into_str(self, operation: &str) -> Str {
        match self {
            Value::String(s) => s,
            other => kind_mismatch(operation, Kind::String, other.kind()),
        }
    }

    #[track_caller]
    fn into_array(self, operation: &str) -> Array {
        match self {
            Value::Array(a) => a,
            other => kind_mismatch(operation, Kind::Array, other.kind()),
        }
    }

    #[track_caller]
    fn into_object(self, operation: &str) -> Object {
        match self {
            Value::Object(o) => o,
            other => kind_mismatch(operation, Kind::Object, other.kind()),
        }
    }
}

// Strings

impl Value {
    /// Length of a string in bytes.
    #[track_caller]
    pub fn string_length(&self) -> usize {
        self.str_ref("string_length").len()
    }

    /// Cached hash of a string.
    #[track_caller]
    pub fn string_hash(&self) -> u32 {
        self.str_ref("string_hash").hash_code()
    }

    /// Raw bytes of a string.
    #[track_caller]
    pub fn string_value(&self) -> &[u8] {
        self.str_ref("string_value").as_bytes()
    }

    /// A string with `more` appended.
    #[track_caller]
    #[must_use]
    pub fn string_append(self, more: impl AsRef<[u8]>) -> Value {
        let mut s = self.into_str("string_append");
        s.append(more.as_ref());
        Value::String(s)
    }
}

// Arrays

impl Value {
    /// Number of elements in an array.
    #[track_caller]
    pub fn array_length(&self) -> usize {
        self.array_ref("array_length").len()
    }

    /// Element at `index`, or null when the index is negative or out of range.
    #[track_caller]
    #[must_use]
    pub fn array_get(&self, index: i64) -> Value {
        let array = self.array_ref("array_get");
        usize::try_from(index)
            .ok()
            .and_then(|i| array.get(i))
            .cloned()
            .unwrap_or_default()
    }

    /// An array with the element at `index` replaced; gaps past the end are
    /// filled with null.
    #[track_caller]
    #[must_use]
    pub fn array_set(self, index: usize, value: Value) -> Value {
        let mut array = self.into_array("array_set");
        array.set(index, value);
        Value::Array(array)
    }

    /// An array with `value` appended.
    #[track_caller]
    #[must_use]
    pub fn array_append(self, value: Value) -> Value {
        let mut array = self.into_array("array_append");
        array.push(value);
        Value::Array(array)
    }

    /// The elements of `self` followed by those of `other`.
    #[track_caller]
    #[must_use]
    pub fn array_concat(self, other: Value) -> Value {
        let mut array = self.into_array("array_concat");
        array.concat(other.into_array("array_concat"));
        Value::Array(array)
    }

    /// Elements in `[start, end)`, sharing storage with the input.
    ///
    /// Negative, reversed or past-the-end bounds are an error.
    #[track_caller]
    pub fn array_slice(self, start: i64, end: i64) -> Result<Value, ValueError> {
        let array = self.into_array("array_slice");
        let out_of_range = || ValueError::SliceOutOfRange {
            start,
            end,
            len: array.len(),
        };
        let (Ok(from), Ok(to)) = (usize::try_from(start), usize::try_from(end)) else {
            return Err(out_of_range());
        };
        array.slice(from, to).map(Value::Array).ok_or_else(out_of_range)
    }
}

// Objects

impl Value {
    /// Number of entries in an object.
    #[track_caller]
    pub fn object_length(&self) -> usize {
        self.object_ref("object_length").len()
    }

    /// Value stored under `key`, or null when absent.
    #[track_caller]
    #[must_use]
    pub fn object_get<K: ObjectKey + ?Sized>(&self, key: &K) -> Value {
        self.object_ref("object_get")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether an object has an entry for `key`.
    #[track_caller]
    pub fn object_has<K: ObjectKey + ?Sized>(&self, key: &K) -> bool {
        self.object_ref("object_has").contains_key(key)
    }

    /// An object with `key` bound to `value`.
    #[track_caller]
    #[must_use]
    pub fn object_set(self, key: impl Into<Str>, value: Value) -> Value {
        let mut object = self.into_object("object_set");
        object.insert(key, value);
        Value::Object(object)
    }

    /// An object without `key`. Deleting an absent key is not an error.
    #[track_caller]
    #[must_use]
    pub fn object_delete<K: ObjectKey + ?Sized>(self, key: &K) -> Value {
        let mut object = self.into_object("object_delete");
        object.remove(key);
        Value::Object(object)
    }

    /// The keys of an object as an array of strings, sorted byte-wise.
    #[track_caller]
    #[must_use]
    pub fn object_keys(&self) -> Value {
        let keys = self.object_ref("object_keys").keys();
        Value::Array(keys.into_iter().map(Value::String).collect())
    }

    /// Entries of `self` and `other`; `other` wins on shared keys.
    #[track_caller]
    #[must_use]
    pub fn object_merge(self, other: Value) -> Value {
        let mut object = self.into_object("object_merge");
        object.merge(other.into_object("object_merge"));
        Value::Object(object)
    }

    /// Cursor at the first entry of an object.
    #[track_caller]
    pub fn object_iter_start(&self) -> Cursor {
        self.object_ref("object_iter_start").cursor_start()
    }

    /// Cursor at the entry after `cursor`.
    #[track_caller]
    pub fn object_iter_next(&self, cursor: Cursor) -> Cursor {
        self.object_ref("object_iter_next").cursor_next(cursor)
    }

    /// Whether `cursor` still points at an entry.
    #[track_caller]
    pub fn object_iter_valid(&self, cursor: Cursor) -> bool {
        self.object_ref("object_iter_valid").cursor_valid(cursor)
    }

    /// Key under `cursor`, as a string value.
    #[track_caller]
    #[must_use]
    pub fn object_iter_key(&self, cursor: Cursor) -> Value {
        Value::String(self.object_ref("object_iter_key").cursor_key(cursor).clone())
    }

    /// Value under `cursor`.
    #[track_caller]
    #[must_use]
    pub fn object_iter_value(&self, cursor: Cursor) -> Value {
        self.object_ref("object_iter_value")
            .cursor_value(cursor)
            .clone()
    }
}

/// Deep structural equality.
///
/// Numbers compare with IEEE semantics: `NaN != NaN` (even for the same
/// value twice) and `0.0 == -0.0`. Objects compare as sets of entries.
impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "IEEE equality is the defined number semantics")]
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (Value::Null, Value::Null)
            | (Value::False, Value::False)
            | (Value::True, Value::True) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Value::Null => f.write_str("null"),
            Value::False => f.write_str("false"),
            Value::True => f.write_str("true"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => fmt::Debug::fmt(s, f),
            Value::Object(o) => fmt::Debug::fmt(o, f),
            Value::Array(a) => fmt::Debug::fmt(a, f),
        })
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Str::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Str::from(s))
    }
}

impl From<Str> for Value {
    fn from(s: Str) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}
