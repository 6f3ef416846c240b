//! jv Value - the persistent JSON value core.
//!
//! This crate provides:
//! - The [`Value`] type: null, booleans, numbers, strings, arrays, objects
//! - A copy-on-write reference-counted buffer shared by every heap-backed kind
//! - String, array and object engines with structural sharing
//! - Path-based reads and functional deep updates ([`Value::insert`])
//!
//! # Ownership
//!
//! Updating operations consume their input and return a new value. Copying a
//! value only adds a reference; the underlying buffer is cloned lazily, the
//! first time a holder that is not the sole owner writes to it.
//!
//! ```text
//! let a = Value::array().array_append(Value::number(1.0));
//! let b = a.copy();                         // one buffer, count 2
//! let b = b.array_append(Value::number(2.0)); // b copies, a untouched
//! ```
//!
//! # Threads
//!
//! With default features, counts are atomic and `Value` is `Send + Sync`, so
//! one immutable value graph can be read from many threads. Writes still
//! follow copy-on-write: a thread only ever mutates buffers it owns alone.
//! The `single-threaded` feature trades that for non-atomic counts.

mod array;
mod error;
mod kind;
mod object;
mod path;
mod rc;
mod release;
mod stack;
mod string;
mod value;

#[cfg(test)]
mod tests;

pub use array::Array;
pub use error::ValueError;
pub use kind::Kind;
pub use object::{Cursor, Iter as ObjectIter, Object, ObjectKey};
pub use path::{Path, PathSegment};
pub use stack::ensure_sufficient_stack;
pub use string::{Str, INLINE_CAPACITY};
pub use value::Value;

#[cfg(any(test, feature = "alloc-stats"))]
pub use rc::live_buffers;
