//! Property tests: `parse(dump(v))` reproduces `v`.
//!
//! Generated numbers are finite (NaN and the infinities do not survive the
//! trip by definition; covered separately).

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use jv_text::{dump, parse, DumpFlags};
use jv_value::{Object, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::bool),
        any::<f64>()
            .prop_filter("finite", |n| n.is_finite())
            .prop_map(Value::number),
        any::<i32>().prop_map(|n| Value::number(f64::from(n))),
        any::<String>().prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(5, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::from),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Object>())),
        ]
    })
}

fn flags() -> impl Strategy<Value = DumpFlags> {
    (0_u32..16).prop_map(DumpFlags::from_bits_truncate)
}

proptest! {
    #[test]
    fn dump_then_parse_is_identity(v in value(), flags in flags()) {
        let text = dump(&v, flags);
        let back = parse(&text).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn dump_is_stable_under_reparse(v in value()) {
        let flags = DumpFlags::SORT_KEYS;
        let once = dump(&v, flags);
        let twice = dump(&parse(&once).unwrap(), flags);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,64}") {
        let _ = parse(&text);
    }
}
