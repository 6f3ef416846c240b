//! Scenarios driven only through the public API.

use jv_value::{Kind, PathSegment, Value, ValueError};
use pretty_assertions::assert_eq;

fn nums(values: &[f64]) -> Value {
    values.iter().copied().map(Value::number).collect()
}

#[test]
fn array_scenarios() {
    assert_eq!(nums(&[10.0, 20.0, 30.0, 40.0]).array_slice(1, 3), Ok(nums(&[20.0, 30.0])));
    assert_eq!(
        nums(&[1.0, 2.0]).array_concat(nums(&[3.0, 4.0])),
        nums(&[1.0, 2.0, 3.0, 4.0])
    );
    assert_eq!(
        nums(&[1.0, 2.0, 3.0]).array_set(1, Value::number(99.0)),
        nums(&[1.0, 99.0, 3.0])
    );
    assert!(matches!(
        nums(&[1.0]).array_slice(0, 5),
        Err(ValueError::SliceOutOfRange { len: 1, .. })
    ));
    assert_eq!(nums(&[1.0]).array_get(-3), Value::null());
}

#[test]
fn object_scenarios() {
    let o = Value::object()
        .object_set("x", Value::number(1.0))
        .object_set("y", Value::number(2.0));
    assert_eq!(o.object_length(), 2);
    assert_eq!(o.object_get("x"), Value::number(1.0));
    assert_eq!(o.object_get("z"), Value::null());

    let mut count = 0;
    let mut cursor = o.object_iter_start();
    while o.object_iter_valid(cursor) {
        count += 1;
        cursor = o.object_iter_next(cursor);
    }
    assert_eq!(count, 2);
}

#[test]
fn path_update_keeps_sibling_buffer() {
    let b = Value::string("the untouched sibling subtree value");
    let root = Value::object()
        .object_set("a", nums(&[1.0, 2.0, 3.0]))
        .object_set("b", b.copy());
    let updated = root.insert(&[PathSegment::from("a"), PathSegment::Index(1)], Value::number(99.0));

    let expected = Value::object()
        .object_set("a", nums(&[1.0, 99.0, 3.0]))
        .object_set("b", b.copy());
    assert_eq!(updated, expected);
    assert!(updated.object_get("b").shares_buffer_with(&b));
}

#[test]
fn kinds_never_change() {
    let v = Value::array().array_append(Value::null());
    assert_eq!(v.kind(), Kind::Array);
    assert_eq!(v.kind().name(), "array");
    assert_eq!(Value::true_().kind().name(), "boolean");
}
