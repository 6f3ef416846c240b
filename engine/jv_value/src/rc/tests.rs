use super::*;

#[test]
fn new_buffer_has_count_one() {
    let cell = Shared::new(vec![1, 2, 3]);
    assert_eq!(cell.count(), 1);
    assert!(cell.is_unique());
}

#[test]
fn clone_shares_buffer() {
    let a = Shared::new(String::from("shared"));
    let b = a.clone();
    assert_eq!(a.count(), 2);
    assert!(Shared::ptr_eq(&a, &b));
    drop(b);
    assert_eq!(a.count(), 1);
}

#[test]
fn make_mut_in_place_when_unique() {
    let mut cell = Shared::new(vec![1]);
    let before = live_buffers();
    cell.make_mut_with(|_| panic!("unique buffer must not be cloned"))
        .push(2);
    assert_eq!(*cell, vec![1, 2]);
    assert_eq!(live_buffers(), before);
}

#[test]
fn make_mut_clones_when_shared() {
    let original = Shared::new(vec![1, 2, 3]);
    let mut copy = original.clone();
    copy.make_mut_with(Clone::clone).push(4);

    assert!(!Shared::ptr_eq(&original, &copy));
    assert_eq!(*original, vec![1, 2, 3]);
    assert_eq!(*copy, vec![1, 2, 3, 4]);
    assert!(original.is_unique());
    assert!(copy.is_unique());
}

#[test]
fn try_unwrap_returns_data_for_last_owner() {
    let cell = Shared::new(7_u32);
    assert!(matches!(cell.try_unwrap(), Ok(7)));

    let a = Shared::new(7_u32);
    let b = a.clone();
    let Err(b) = b.try_unwrap() else {
        panic!("shared buffer must not be unwrapped");
    };
    assert!(Shared::ptr_eq(&a, &b));
    drop(b);
    assert_eq!(a.count(), 1);
}

#[test]
fn live_buffers_tracks_alloc_and_free() {
    let before = live_buffers();
    let a = Shared::new(0_u8);
    let b = a.clone();
    assert_eq!(live_buffers(), before + 1);
    drop(a);
    assert_eq!(live_buffers(), before + 1);
    drop(b);
    assert_eq!(live_buffers(), before);
}
