//! Failure-safety guarantees, observed through instrumented element types.

use std::panic::{self, AssertUnwindSafe};

use stowage_array::{ConstructError, DynArray};
use stowage_test_utils::{
    arm_default_fuse, disarm_default_fuse, Brittle, Charge, Charges, Factory, FactoryError, Fuse,
    LiveCounter,
};

fn values(array: &DynArray<stowage_test_utils::Tracked>) -> Vec<i32> {
    array.iter().map(|t| t.value()).collect()
}

#[test]
fn emplace_back_growth_failure_is_strong_at_every_size() {
    let counter = LiveCounter::new();
    let mut array = DynArray::new();
    for v in 0..33 {
        if array.len() == array.capacity() {
            let (len, cap, ptr) = (array.len(), array.capacity(), array.as_ptr());
            let mut factory = Factory::fails_on(1);
            let err = array
                .try_emplace_back_with(|| factory.make().map(|v| counter.track(v)))
                .unwrap_err();
            assert_eq!(err, ConstructError::Element(FactoryError { call: 1 }));
            assert_eq!(array.len(), len);
            assert_eq!(array.capacity(), cap);
            assert_eq!(array.as_ptr(), ptr);
            assert_eq!(values(&array), (0..v).collect::<Vec<_>>());
        }
        array.push_back(counter.track(v)).unwrap();
    }
    assert_eq!(counter.live(), 33);
    drop(array);
    assert_eq!(counter.live(), 0);
}

#[test]
fn emplace_growth_panic_is_strong_at_every_position() {
    let counter = LiveCounter::new();
    for pos in 0..=4 {
        let mut array: DynArray<_> = (0..4).map(|v| counter.track(v)).collect();
        assert_eq!(array.len(), array.capacity());
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = array.emplace_with(pos, || panic!("refused"));
        }));
        assert!(result.is_err());
        assert_eq!(values(&array), vec![0, 1, 2, 3]);
        assert_eq!(array.capacity(), 4);
    }
    assert_eq!(counter.live(), 0);
}

#[test]
fn mid_array_emplace_failure_changes_nothing() {
    let counter = LiveCounter::new();
    let mut array = DynArray::with_capacity(16).unwrap();
    for v in 0..5 {
        array.push_back(counter.track(v)).unwrap();
    }
    let err = array
        .try_emplace_with(2, || Err::<stowage_test_utils::Tracked, _>("no"))
        .unwrap_err();
    assert_eq!(err.into_element(), Some("no"));
    assert_eq!(values(&array), vec![0, 1, 2, 3, 4]);
    assert_eq!(counter.live(), 5);
}

#[test]
fn sized_construction_failure_leaves_nothing_behind() {
    arm_default_fuse(5);
    let result = panic::catch_unwind(|| DynArray::<Brittle>::with_len(8));
    assert!(result.is_err());
    assert_eq!(Brittle::live(), 0);
    disarm_default_fuse();
}

#[test]
fn clone_failure_leaves_source_intact() {
    let fuse = Fuse::new(3);
    let source: DynArray<_> = (0..6).map(|v| fuse.make(v)).collect();
    let result = panic::catch_unwind(AssertUnwindSafe(|| source.clone()));
    assert!(result.is_err());
    assert_eq!(fuse.live(), 6);
    assert_eq!(source.len(), 6);
    assert!(source.iter().enumerate().all(|(i, f)| f.value() == i as i32));
}

#[test]
fn resize_failure_keeps_existing_elements() {
    let counter = LiveCounter::new();
    let mut array: DynArray<_> = (0..3).map(|v| counter.track(v)).collect();
    let mut factory = Factory::fails_on(2);
    let result = array.try_resize_with(10, || factory.make().map(|v| counter.track(v * 100)));
    assert_eq!(
        result.unwrap_err().into_element(),
        Some(FactoryError { call: 2 })
    );
    assert_eq!(values(&array), vec![0, 1, 2]);
    assert_eq!(counter.live(), 3);
}

#[test]
fn insert_then_erase_never_leaks() {
    let counter = LiveCounter::new();
    let mut array: DynArray<_> = (0..6).map(|v| counter.track(v)).collect();
    for pos in 0..=6 {
        array.insert(pos, counter.track(-1)).unwrap();
        array.erase(pos);
        assert_eq!(values(&array), vec![0, 1, 2, 3, 4, 5]);
    }
    assert_eq!(counter.live(), 6);
    array.clear();
    assert_eq!(counter.live(), 0);
    assert!(array.capacity() >= 6);
}

#[test]
fn owned_iterator_drops_remainder_on_panic() {
    let counter = LiveCounter::new();
    let array: DynArray<_> = (0..4).map(|v| counter.track(v)).collect();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        for item in array {
            if item.value() == 1 {
                panic!("stop");
            }
        }
    }));
    assert!(result.is_err());
    assert_eq!(counter.live(), 0);
}

fn charge_values(array: &DynArray<Charge>) -> Vec<i32> {
    array.iter().map(Charge::value).collect()
}

fn armed(charges: &Charges, explodes_at: i32) -> DynArray<Charge> {
    (0..5)
        .map(|v| {
            if v == explodes_at {
                charges.primed(v)
            } else {
                charges.inert(v)
            }
        })
        .collect()
}

#[test]
fn panicking_destructor_during_erase_drops_once() {
    let charges = Charges::new();
    let mut array = armed(&charges, 1);
    let result = panic::catch_unwind(AssertUnwindSafe(|| array.erase(1)));
    assert!(result.is_err());
    assert_eq!(charge_values(&array), vec![0, 2, 3, 4]);
    assert_eq!(charges.live(), 4);
    drop(array);
    assert_eq!(charges.live(), 0);
}

#[test]
fn panicking_destructor_during_truncate_drops_once() {
    let charges = Charges::new();
    let mut array = armed(&charges, 2);
    let result = panic::catch_unwind(AssertUnwindSafe(|| array.truncate(1)));
    assert!(result.is_err());
    assert_eq!(charge_values(&array), vec![0]);
    assert_eq!(charges.live(), 1);
    array.push_back(charges.inert(9)).unwrap();
    assert_eq!(charge_values(&array), vec![0, 9]);
    drop(array);
    assert_eq!(charges.live(), 0);
}
