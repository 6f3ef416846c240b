//! Randomized operation sequences over a pool of values.
//!
//! Every step picks a pool entry and either duplicates it, releases it, or
//! runs one updating operation on it. Two properties are checked:
//!
//! - after the pool is dropped, the live buffer count is back where it
//!   started (no leak, no double free);
//! - an update on one pool entry never changes any other entry, even when
//!   the entries share buffers.

use proptest::prelude::*;

use super::strategies::{deep_rebuild, key, value};
use crate::{live_buffers, Kind, Value};

#[derive(Debug, Clone)]
enum Op {
    Copy(usize),
    Free(usize),
    Append(usize, Value),
    Set(usize, usize, Value),
    ObjectSet(usize, String, Value),
    ObjectDelete(usize, String),
    Slice(usize, usize, usize),
    Concat(usize, usize),
    StringAppend(usize, String),
    Insert(usize, usize, Value),
}

impl Op {
    /// Pool entry this op rewrites in place, if any.
    fn target(&self, pool_len: usize) -> Option<usize> {
        match self {
            Op::Append(i, _)
            | Op::Set(i, _, _)
            | Op::ObjectSet(i, _, _)
            | Op::ObjectDelete(i, _)
            | Op::Concat(i, _)
            | Op::StringAppend(i, _)
            | Op::Insert(i, _, _) => Some(i % pool_len),
            Op::Copy(_) | Op::Free(_) | Op::Slice(..) => None,
        }
    }
}

fn op() -> impl Strategy<Value = Op> {
    let slot = 0..16_usize;
    prop_oneof![
        slot.clone().prop_map(Op::Copy),
        slot.clone().prop_map(Op::Free),
        (slot.clone(), value()).prop_map(|(i, v)| Op::Append(i, v)),
        (slot.clone(), 0..8_usize, value()).prop_map(|(i, at, v)| Op::Set(i, at, v)),
        (slot.clone(), key(), value()).prop_map(|(i, k, v)| Op::ObjectSet(i, k, v)),
        (slot.clone(), key()).prop_map(|(i, k)| Op::ObjectDelete(i, k)),
        (slot.clone(), 0..8_usize, 0..8_usize).prop_map(|(i, a, b)| Op::Slice(i, a, b)),
        (slot.clone(), slot.clone()).prop_map(|(i, j)| Op::Concat(i, j)),
        (slot.clone(), "[x-z]{1,20}").prop_map(|(i, s)| Op::StringAppend(i, s)),
        (slot, 0..8_usize, value()).prop_map(|(i, which, v)| Op::Insert(i, which, v)),
    ]
}

/// Replace `pool[i]` with `f(pool[i])`.
fn update(pool: &mut [Value], i: usize, f: impl FnOnce(Value) -> Value) {
    let target = std::mem::take(&mut pool[i]);
    pool[i] = f(target);
}

/// Run `op` against the pool. Operation payloads are rebuilt rather than
/// moved so the generated inputs stay untouched (and keep their buffers
/// outside the measured region).
fn apply(pool: &mut Vec<Value>, op: &Op) {
    if pool.is_empty() {
        pool.push(Value::array());
    }
    let len = pool.len();
    match op {
        Op::Copy(i) => {
            let copy = pool[i % len].copy();
            pool.push(copy);
        }
        Op::Free(i) => pool.swap_remove(i % len).free(),
        Op::Append(i, v) => update(pool, i % len, |t| match t.kind() {
            Kind::Array => t.array_append(deep_rebuild(v)),
            _ => t,
        }),
        Op::Set(i, at, v) => update(pool, i % len, |t| match t.kind() {
            Kind::Array => t.array_set(*at, deep_rebuild(v)),
            _ => t,
        }),
        Op::ObjectSet(i, k, v) => update(pool, i % len, |t| match t.kind() {
            Kind::Object => t.object_set(k.as_str(), deep_rebuild(v)),
            _ => t,
        }),
        Op::ObjectDelete(i, k) => update(pool, i % len, |t| match t.kind() {
            Kind::Object => t.object_delete(k.as_str()),
            _ => t,
        }),
        Op::Slice(i, a, b) => {
            let source = &pool[i % len];
            if source.kind() == Kind::Array {
                let n = source.array_length();
                let start = a % (n + 1);
                let end = start + b % (n - start + 1);
                let as_i64 = |x: usize| i64::try_from(x).unwrap_or(i64::MAX);
                if let Ok(slice) = source.copy().array_slice(as_i64(start), as_i64(end)) {
                    pool.push(slice);
                }
            }
        }
        Op::Concat(i, j) => {
            let right = pool[j % len].copy();
            update(pool, i % len, |t| {
                if t.kind() == Kind::Array && right.kind() == Kind::Array {
                    t.array_concat(right)
                } else {
                    t
                }
            });
        }
        Op::StringAppend(i, s) => update(pool, i % len, |t| match t.kind() {
            Kind::String => t.string_append(s),
            _ => t,
        }),
        Op::Insert(i, which, v) => update(pool, i % len, |t| {
            let paths = t.leaf_paths();
            let path = &paths[which % paths.len()];
            t.insert(path, deep_rebuild(v))
        }),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn refcounts_balance(
        seeds in prop::collection::vec(value(), 1..5),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let before = live_buffers();
        {
            let mut pool: Vec<Value> = seeds.iter().map(deep_rebuild).collect();
            for op in &ops {
                apply(&mut pool, op);
            }
        }
        prop_assert_eq!(live_buffers(), before);
    }

    #[test]
    fn updates_are_isolated(
        seeds in prop::collection::vec(value(), 1..5),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut pool: Vec<Value> = seeds.iter().map(deep_rebuild).collect();
        // Start with every entry shared at least once.
        let copies: Vec<Value> = pool.iter().map(Value::copy).collect();
        pool.extend(copies);

        for op in &ops {
            if pool.is_empty() {
                pool.push(Value::array());
            }
            if matches!(op, Op::Free(_)) {
                apply(&mut pool, op);
                continue;
            }
            let snapshot: Vec<Value> = pool.iter().map(deep_rebuild).collect();
            let target = op.target(pool.len());
            apply(&mut pool, op);
            for (index, before) in snapshot.iter().enumerate() {
                if Some(index) != target {
                    prop_assert!(pool[index].equal(before), "entry {} changed by {:?}", index, op);
                }
            }
        }
    }

    #[test]
    fn copy_then_update_leaves_original(v in value(), extra in value()) {
        let snapshot = deep_rebuild(&v);
        let updated = match v.kind() {
            Kind::Array => v.copy().array_append(extra),
            Kind::Object => v.copy().object_set("fresh key", extra),
            Kind::String => v.copy().string_append("!"),
            _ => extra,
        };
        prop_assert!(v.equal(&snapshot));
        prop_assert!(!updated.shares_buffer_with(&v));
    }
}
