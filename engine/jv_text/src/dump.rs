//! Value to JSON text.
//!
//! # Numbers
//!
//! Finite numbers print in their shortest round-trip form: plain decimal for
//! magnitudes in `[1e-5, 1e17)`, exponent notation otherwise. JSON has no
//! spelling for the IEEE special values, so:
//!
//! | value       | printed as                 |
//! |-------------|----------------------------|
//! | NaN         | `null`                     |
//! | +infinity   | `1.7976931348623157e308`   |
//! | -infinity   | `-1.7976931348623157e308`  |
//! | -0.0        | `-0`                       |

use std::fmt::Write;

use bitflags::bitflags;
use jv_value::{ensure_sufficient_stack, Array, Object, Str, Value};

use crate::escape::escape_into;

bitflags! {
    /// Output options for [`dump`](crate::dump).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DumpFlags: u32 {
        /// One element per line, indented two spaces per level.
        const PRETTY = 1 << 0;
        /// Indent with tabs instead of spaces. Implies `PRETTY`.
        const TAB = 1 << 1;
        /// Object keys in byte-wise sorted order instead of table order.
        const SORT_KEYS = 1 << 2;
        /// Escape every non-ASCII character as `\uXXXX`.
        const ASCII = 1 << 3;
    }
}

/// Smallest magnitude printed without an exponent.
const PLAIN_MIN: f64 = 1e-5;
/// Magnitude from which exponent notation is used.
const PLAIN_MAX: f64 = 1e17;

pub(crate) struct Printer {
    out: String,
    flags: DumpFlags,
}

impl Printer {
    pub(crate) fn new(flags: DumpFlags) -> Self {
        Printer {
            out: String::new(),
            flags,
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn pretty(&self) -> bool {
        self.flags.intersects(DumpFlags::PRETTY | DumpFlags::TAB)
    }

    fn newline(&mut self, level: usize) {
        if !self.pretty() {
            return;
        }
        self.out.push('\n');
        let unit = if self.flags.contains(DumpFlags::TAB) {
            "\t"
        } else {
            "  "
        };
        for _ in 0..level {
            self.out.push_str(unit);
        }
    }

    pub(crate) fn value(&mut self, value: &Value, level: usize) {
        ensure_sufficient_stack(|| match value {
            Value::Null => self.out.push_str("null"),
            Value::False => self.out.push_str("false"),
            Value::True => self.out.push_str("true"),
            Value::Number(n) => write_number(&mut self.out, *n),
            Value::String(s) => self.string(s),
            Value::Array(a) => self.array(a, level),
            Value::Object(o) => self.object(o, level),
        });
    }

    fn string(&mut self, s: &Str) {
        escape_into(&mut self.out, s.as_bytes(), self.flags.contains(DumpFlags::ASCII));
    }

    fn array(&mut self, array: &Array, level: usize) {
        if array.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        for (i, item) in array.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(level + 1);
            self.value(item, level + 1);
        }
        self.newline(level);
        self.out.push(']');
    }

    fn object(&mut self, object: &Object, level: usize) {
        if object.is_empty() {
            self.out.push_str("{}");
            return;
        }
        let mut entries: Vec<(&Str, &Value)> = object.iter().collect();
        if self.flags.contains(DumpFlags::SORT_KEYS) {
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        }
        self.out.push('{');
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(level + 1);
            self.string(key);
            self.out.push(':');
            if self.pretty() {
                self.out.push(' ');
            }
            self.value(value, level + 1);
        }
        self.newline(level);
        self.out.push('}');
    }
}

/// Append the JSON spelling of `n`.
pub(crate) fn write_number(out: &mut String, n: f64) {
    // Writing to a String cannot fail.
    let _ = if n.is_nan() {
        write!(out, "null")
    } else if n.is_infinite() {
        write!(out, "{:e}", f64::MAX.copysign(n))
    } else if n == 0.0 {
        write!(out, "{}", if n.is_sign_negative() { "-0" } else { "0" })
    } else if (PLAIN_MIN..PLAIN_MAX).contains(&n.abs()) {
        write!(out, "{n}")
    } else {
        write!(out, "{n:e}")
    };
}
