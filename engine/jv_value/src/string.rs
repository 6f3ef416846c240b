//! Immutable byte strings with a cached hash.
//!
//! Strings of up to [`INLINE_CAPACITY`] bytes are stored inside the value
//! itself with their hash computed at construction, so they never touch the
//! heap or a reference count. Longer strings live in a [`Shared`] buffer; their
//! hash is computed the first time it is asked for and cached in the buffer.
//!
//! The hash is a pure function of the bytes, so the inline and heap forms of
//! the same content always agree. Object tables rely on this: a key is found
//! by hash first and bytes second, whatever form each side happens to use.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::rc::{OnceCell, Shared};

/// Longest string stored without a heap buffer.
pub const INLINE_CAPACITY: usize = 15;

/// Hash of a byte string, as used for object keys.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the 64-bit hash is folded to 32 bits on purpose"
)]
pub(crate) fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    let full = hasher.finish();
    (full ^ (full >> 32)) as u32
}

/// Heap storage for a long string.
struct StrBuffer {
    bytes: Vec<u8>,
    hash: OnceCell<u32>,
}

impl StrBuffer {
    fn new(bytes: Vec<u8>) -> Self {
        StrBuffer {
            bytes,
            hash: OnceCell::new(),
        }
    }
}

#[derive(Clone)]
enum Repr {
    Inline {
        hash: u32,
        len: u8,
        bytes: [u8; INLINE_CAPACITY],
    },
    Heap(Shared<StrBuffer>),
}

/// An immutable, sized, hashable byte string.
///
/// Contents are usually UTF-8 (everything built from `&str` is), but arbitrary
/// bytes are accepted; see [`Str::to_str`] and [`Str::to_string_lossy`].
#[derive(Clone)]
pub struct Str {
    repr: Repr,
}

impl Str {
    /// Copy `bytes` into a new string.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() <= INLINE_CAPACITY {
            Self::inline(bytes)
        } else {
            Str {
                repr: Repr::Heap(Shared::new(StrBuffer::new(bytes.to_vec()))),
            }
        }
    }

    /// Copy a null-terminated C string (without its terminator).
    pub fn from_c_str(s: &CStr) -> Self {
        Self::from_bytes(s.to_bytes())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "callers guarantee len <= INLINE_CAPACITY"
    )]
    fn inline(content: &[u8]) -> Self {
        debug_assert!(content.len() <= INLINE_CAPACITY);
        let mut bytes = [0; INLINE_CAPACITY];
        bytes[..content.len()].copy_from_slice(content);
        Str {
            repr: Repr::Inline {
                hash: hash_bytes(content),
                len: content.len() as u8,
                bytes,
            },
        }
    }

    /// Raw contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.repr {
            Repr::Inline { len, bytes, .. } => &bytes[..usize::from(*len)],
            Repr::Heap(buffer) => &buffer.bytes,
        }
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the string has no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable 32-bit hash of the contents, computed at most once.
    pub fn hash_code(&self) -> u32 {
        match &self.repr {
            Repr::Inline { hash, .. } => *hash,
            Repr::Heap(buffer) => *buffer.hash.get_or_init(|| hash_bytes(&buffer.bytes)),
        }
    }

    /// Contents as `&str`, or `None` if they are not valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Contents as text, replacing invalid UTF-8 with U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Append bytes to this string.
    ///
    /// A shared heap buffer is cloned (with room for the new bytes) before
    /// the write; a sole owner appends in place. An inline string stays
    /// inline while the result fits.
    pub fn append(&mut self, more: &[u8]) {
        if more.is_empty() {
            return;
        }
        if let Repr::Heap(shared) = &mut self.repr {
            let buffer = shared.make_mut_with(|old| {
                let mut bytes = Vec::with_capacity(old.bytes.len() + more.len());
                bytes.extend_from_slice(&old.bytes);
                StrBuffer::new(bytes)
            });
            buffer.bytes.extend_from_slice(more);
            buffer.hash.take();
            return;
        }
        let mut joined = Vec::with_capacity(self.len() + more.len());
        joined.extend_from_slice(self.as_bytes());
        joined.extend_from_slice(more);
        *self = Str::from(joined);
    }

    /// Reference count of the backing buffer; 1 for inline strings.
    pub fn refcount(&self) -> usize {
        match &self.repr {
            Repr::Inline { .. } => 1,
            Repr::Heap(buffer) => buffer.count(),
        }
    }

    /// Whether both strings use the same heap buffer.
    ///
    /// Always `false` for inline strings, which have no buffer to share.
    pub fn shares_buffer_with(&self, other: &Str) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Heap(a), Repr::Heap(b)) => Shared::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        if let (Repr::Heap(a), Repr::Heap(b)) = (&self.repr, &other.repr) {
            if Shared::ptr_eq(a, b) {
                return true;
            }
        }
        self.len() == other.len()
            && self.hash_code() == other.hash_code()
            && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Str {}

impl PartialOrd for Str {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Byte-wise lexicographic order (the order object keys are sorted in).
impl Ord for Str {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for Str {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Str::from_bytes(s.as_bytes())
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        Str::from(s.into_bytes())
    }
}

impl From<Vec<u8>> for Str {
    fn from(bytes: Vec<u8>) -> Self {
        if bytes.len() <= INLINE_CAPACITY {
            Str::inline(&bytes)
        } else {
            Str {
                repr: Repr::Heap(Shared::new(StrBuffer::new(bytes))),
            }
        }
    }
}

impl From<&[u8]> for Str {
    fn from(bytes: &[u8]) -> Self {
        Str::from_bytes(bytes)
    }
}

impl From<&CStr> for Str {
    fn from(s: &CStr) -> Self {
        Str::from_c_str(s)
    }
}

#[cfg(test)]
mod tests;
