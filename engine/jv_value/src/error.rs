//! Error types and contract-violation reporting.
//!
//! Two failure classes exist. Data-level problems that cannot be absorbed
//! into a null result come back as [`ValueError`]. Misuse of the API (a
//! kind-specific operation on the wrong kind, a path segment that does not
//! fit the node it is applied to, a stale iteration cursor) is a programmer
//! error and panics through the helpers below.

use crate::Kind;

/// Recoverable data-level error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// Slice bounds are negative, reversed, or past the end of the array.
    #[error("slice [{start}, {end}) is out of range for an array of length {len}")]
    SliceOutOfRange { start: i64, end: i64, len: usize },
}

/// Report a kind-specific operation applied to the wrong kind.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn kind_mismatch(operation: &str, expected: Kind, found: Kind) -> ! {
    panic!("{operation}: expected {expected}, found {found}")
}

/// Report any other broken usage contract.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn contract_violation(operation: &str, detail: &str) -> ! {
    panic!("{operation}: {detail}")
}
