//! Crate-level property tests.
//!
//! These live inside the crate rather than under `tests/` so the per-thread
//! allocation counter ([`crate::live_buffers`]) is available without
//! enabling the `alloc-stats` feature.

mod equality_tests;
mod ops_tests;
