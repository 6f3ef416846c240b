//! The closed set of value kinds.

use std::fmt;

/// Kind of a [`Value`](crate::Value).
///
/// Fixed at construction: no operation changes the kind of a value, only
/// produces a new value (possibly of a different kind).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    False,
    True,
    Number,
    String,
    Object,
    Array,
}

impl Kind {
    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::False | Kind::True => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }

    /// Whether values of this kind own a reference-counted heap buffer.
    ///
    /// Strings report `true` even though short ones are stored inline.
    pub fn is_heap_backed(self) -> bool {
        matches!(self, Kind::String | Kind::Object | Kind::Array)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
