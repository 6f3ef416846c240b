use pretty_assertions::assert_eq;

use super::*;

const LONG: &str = "a string well past the inline capacity";

#[test]
fn short_strings_are_inline() {
    let s = Str::from("hello");
    assert!(matches!(s.repr, Repr::Inline { .. }));
    assert_eq!(s.len(), 5);
    assert_eq!(s.as_bytes(), b"hello");
    assert_eq!(s.refcount(), 1);
}

#[test]
fn inline_boundary() {
    let exact = "x".repeat(INLINE_CAPACITY);
    assert!(matches!(Str::from(exact.as_str()).repr, Repr::Inline { .. }));

    let over = "x".repeat(INLINE_CAPACITY + 1);
    assert!(matches!(Str::from(over.as_str()).repr, Repr::Heap(_)));
}

#[test]
fn long_strings_share_on_clone() {
    let a = Str::from(LONG);
    let b = a.clone();
    assert_eq!(a.refcount(), 2);
    assert!(a.shares_buffer_with(&b));
    assert_eq!(a, b);
}

#[test]
fn hash_agrees_between_inline_and_heap() {
    let mut grown = Str::from("abc");
    grown.append(&b"d".repeat(INLINE_CAPACITY));
    let direct = Str::from_bytes(grown.as_bytes());

    assert!(matches!(grown.repr, Repr::Heap(_)));
    assert_eq!(grown.hash_code(), direct.hash_code());
    assert_eq!(grown, direct);
}

#[test]
fn hash_is_stable_and_content_based() {
    let a = Str::from(LONG);
    let first = a.hash_code();
    assert_eq!(a.hash_code(), first);
    assert_eq!(Str::from(LONG).hash_code(), first);
    assert_ne!(Str::from("left").hash_code(), Str::from("right").hash_code());
}

#[test]
fn append_resets_cached_hash() {
    let mut s = Str::from(LONG);
    let before = s.hash_code();
    s.append(b"!");
    assert_ne!(s.hash_code(), before);
    assert_eq!(s.hash_code(), hash_bytes(s.as_bytes()));
}

#[test]
fn append_copies_shared_buffer() {
    let original = Str::from(LONG);
    let mut copy = original.clone();
    copy.append(b" and more");

    assert_eq!(original.to_str(), Some(LONG));
    assert_eq!(copy.len(), LONG.len() + " and more".len());
    assert!(!copy.shares_buffer_with(&original));
    assert_eq!(original.refcount(), 1);
}

#[test]
fn append_in_place_when_unique() {
    let mut s = Str::from(LONG);
    let before = crate::live_buffers();
    s.append(b"?");
    assert_eq!(crate::live_buffers(), before);
    assert!(s.to_str().is_some_and(|text| text.ends_with('?')));
}

#[test]
fn from_c_str_drops_terminator() {
    assert_eq!(Str::from_c_str(c"key"), Str::from("key"));
}

#[test]
fn non_utf8_bytes() {
    let s = Str::from_bytes(&[b'a', 0xFF, b'b']);
    assert_eq!(s.to_str(), None);
    assert_eq!(s.to_string_lossy(), "a\u{FFFD}b");
}

#[test]
fn ordering_is_bytewise() {
    let mut keys = vec![Str::from("b"), Str::from("B"), Str::from("a"), Str::from("")];
    keys.sort();
    let sorted: Vec<_> = keys.iter().map(|k| k.to_string_lossy().into_owned()).collect();
    assert_eq!(sorted, vec!["", "B", "a", "b"]);
}
