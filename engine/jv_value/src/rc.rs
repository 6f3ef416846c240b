//! Reference-counted, copy-on-write buffer cell.
//!
//! Every heap-backed value kind (long strings, arrays, objects) keeps its
//! storage in a [`Shared<T>`]. The cell is the only place in the crate that
//! knows how reference counts work:
//!
//! - cloning a `Shared` is a count increment, never a data copy;
//! - dropping a `Shared` is a count decrement, and the buffer is freed when
//!   the count goes from 1 to 0;
//! - [`Shared::make_mut_with`] hands out `&mut T` only when the caller is the
//!   sole owner, and otherwise replaces the handle with a private clone first.
//!
//! # Counting Mode
//!
//! By default the count is atomic (`Arc`), so values are `Send + Sync` and an
//! immutable value graph can be read from several threads. The
//! `single-threaded` feature swaps in `Rc` for non-atomic counts.
//!
//! # Allocation Accounting
//!
//! Under `cfg(test)` or the `alloc-stats` feature every buffer carries a token
//! that bumps a per-thread live counter on allocation and drops it on free.
//! [`live_buffers`] reads that counter, which lets tests prove that a sequence
//! of operations neither leaks nor double-frees.

#[cfg(not(feature = "single-threaded"))]
pub(crate) use std::sync::{Arc as Rc, OnceLock as OnceCell};

#[cfg(feature = "single-threaded")]
pub(crate) use std::{cell::OnceCell, rc::Rc};

/// Heap allocation behind a [`Shared`] handle.
///
/// The payload is kept next to a live-buffer token; the token is a
/// zero-sized type unless allocation accounting is enabled.
struct Buffer<T> {
    data: T,
    _live: LiveToken,
}

/// Shared-ownership handle to a copy-on-write buffer.
pub(crate) struct Shared<T> {
    inner: Rc<Buffer<T>>,
}

impl<T> Shared<T> {
    /// Allocate a fresh buffer with a count of 1.
    pub(crate) fn new(data: T) -> Self {
        Shared {
            inner: Rc::new(Buffer {
                data,
                _live: LiveToken::acquire(),
            }),
        }
    }

    /// Current number of handles sharing this buffer.
    #[inline]
    pub(crate) fn count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Whether this handle is the buffer's sole owner.
    #[inline]
    pub(crate) fn is_unique(&self) -> bool {
        self.count() == 1
    }

    /// Whether two handles point at the same buffer.
    #[inline]
    pub(crate) fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Mutable access, cloning the buffer first if it is shared.
    ///
    /// `clone` receives the current contents and builds the private copy.
    /// Callers pass a closure rather than relying on `T: Clone` so that an
    /// array view can copy only its visible range, or reserve room for the
    /// write that is about to happen.
    pub(crate) fn make_mut_with(&mut self, clone: impl FnOnce(&T) -> T) -> &mut T {
        if !self.is_unique() {
            tracing::trace!(
                buffer = std::any::type_name::<T>(),
                sharers = self.count(),
                "copy-on-write clone"
            );
            *self = Shared::new(clone(&self.inner.data));
        }
        match Rc::get_mut(&mut self.inner) {
            Some(buffer) => &mut buffer.data,
            // No weak handles exist, so a count of 1 always yields access.
            None => unreachable!("sole owner of a buffer was refused mutable access"),
        }
    }

    /// Take the contents out if this is the last handle.
    ///
    /// Hands the handle back unchanged when other owners remain.
    pub(crate) fn try_unwrap(self) -> Result<T, Self> {
        match Rc::try_unwrap(self.inner) {
            Ok(buffer) => Ok(buffer.data),
            Err(inner) => Err(Shared { inner }),
        }
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::ops::Deref for Shared<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner.data
    }
}

#[cfg(any(test, feature = "alloc-stats"))]
mod stats {
    use std::cell::Cell;

    thread_local! {
        static LIVE: Cell<usize> = const { Cell::new(0) };
    }

    /// Counts one live buffer for as long as it exists.
    pub(super) struct LiveToken;

    impl LiveToken {
        pub(super) fn acquire() -> Self {
            LIVE.with(|live| live.set(live.get() + 1));
            LiveToken
        }
    }

    impl Drop for LiveToken {
        fn drop(&mut self) {
            LIVE.with(|live| live.set(live.get().saturating_sub(1)));
        }
    }

    /// Number of heap buffers allocated on this thread that are still alive.
    ///
    /// Buffers freed on a different thread than the one that allocated them
    /// are not reconciled; use this from single-threaded tests only.
    pub fn live_buffers() -> usize {
        LIVE.with(Cell::get)
    }
}

#[cfg(any(test, feature = "alloc-stats"))]
use stats::LiveToken;

#[cfg(any(test, feature = "alloc-stats"))]
pub use stats::live_buffers;

#[cfg(not(any(test, feature = "alloc-stats")))]
struct LiveToken;

#[cfg(not(any(test, feature = "alloc-stats")))]
impl LiveToken {
    #[inline]
    fn acquire() -> Self {
        LiveToken
    }
}

#[cfg(test)]
mod tests;
