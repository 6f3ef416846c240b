use proptest::prelude::*;

use super::strategies::{deep_rebuild, value};
use crate::Value;

proptest! {
    #[test]
    fn reflexive(v in value()) {
        prop_assert!(v.equal(&v));
        prop_assert!(v.equal(&v.copy()));
    }

    #[test]
    fn structural_not_identity(v in value()) {
        let rebuilt = deep_rebuild(&v);
        prop_assert!(v.equal(&rebuilt));
    }

    #[test]
    fn symmetric(a in value(), b in value()) {
        prop_assert_eq!(a.equal(&b), b.equal(&a));
    }

    #[test]
    fn transitive(v in value()) {
        let b = deep_rebuild(&v);
        let c = deep_rebuild(&b);
        prop_assert!(v.equal(&b) && b.equal(&c));
        prop_assert!(v.equal(&c));
    }

    #[test]
    fn object_equality_ignores_insertion_order(
        entries in prop::collection::btree_map("[a-z]{1,8}", -100.0..100.0_f64, 0..10)
    ) {
        let forward = entries
            .iter()
            .fold(Value::object(), |o, (k, n)| o.object_set(k.as_str(), Value::number(*n)));
        let backward = entries
            .iter()
            .rev()
            .fold(Value::object(), |o, (k, n)| o.object_set(k.as_str(), Value::number(*n)));
        prop_assert!(forward.equal(&backward));
    }

    #[test]
    fn differing_kinds_are_unequal(v in value()) {
        let wrapped = Value::from(vec![v.copy()]);
        prop_assert!(!v.equal(&wrapped));
    }
}
