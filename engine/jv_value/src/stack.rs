//! Stack growth for recursion over arbitrarily nested values.
//!
//! Equality, path updates, and the text printer/parser all recurse once per
//! nesting level. A value parsed from untrusted input can nest tens of
//! thousands of levels deep, so every such recursion step goes through
//! [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate switches to a freshly allocated
//! segment when less than [`RED_ZONE`] bytes remain. WASM manages its own
//! stack, so the helper is a plain call there.

/// Remaining stack below which a new segment is allocated (100 KiB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1 MiB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Run `f` directly; WASM has no stack switching.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
