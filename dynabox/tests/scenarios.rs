//! End-to-end boxing scenarios.

mod common;

use common::{Player, call_int, int};
use dynabox::{CastError, Dynamic, Function, IntoDynamic, RefMut, Slot, Strategy};

#[test]
fn test_trivial_value_is_mutable_copy() {
    let mut boxed = 5_i32.into_dynamic();

    assert!(!boxed.is_const());
    assert_eq!(boxed.cast::<i32>(), Ok(5));

    boxed.write(|v: &mut i32| *v += 1).unwrap();
    assert_eq!(boxed.cast::<i32>(), Ok(6));
}

#[test]
fn test_const_ref_observes_later_mutation() {
    let greeting = Slot::new(String::from("hi"));
    let mut boxed = greeting.by_ref().into_dynamic();

    greeting.set("bye".into());
    assert_eq!(boxed.cast::<String>(), Ok("bye".to_string()));

    assert_eq!(
        boxed.write(|s: &mut String| s.clear()),
        Err(CastError::ReadOnly {
            type_name: "alloc::string::String"
        })
    );
    assert_eq!(greeting.get(), "bye");
}

#[test]
fn test_shared_handle_keeps_referent_alive() {
    let player = Slot::new(Player::new("ada"));
    let boxed = (&player).into_dynamic();

    drop(player);
    let name = boxed.read(|p: &Player| p.name.clone()).unwrap();
    assert_eq!(name, "ada");
}

#[test]
fn test_unit_is_void() {
    let boxed = ().into_dynamic();

    assert!(boxed.is_void());
    assert!(boxed.type_info().is_void());
    assert_eq!(boxed, Dynamic::void());
}

#[test]
fn test_mut_ref_to_closure_follows_reassignment() {
    let slot = Slot::new(Function::new(|x: i32| x + 1));
    let boxed = slot.by_mut().into_dynamic();
    assert_eq!(
        <RefMut<Function<(i32,), i32>> as IntoDynamic>::STRATEGY,
        Strategy::CallableMutRef
    );

    slot.set(Function::new(|x: i32| x * 100));
    assert_eq!(call_int(&boxed, &[int(3)]), 300);
}

#[test]
fn test_closure_call_matches_direct_call() {
    let concat = Function::new(|a: String, n: usize| a.repeat(n));
    let boxed = (&concat).into_dynamic();

    let result = boxed
        .call(&[String::from("ab").into_dynamic(), 3_usize.into_dynamic()])
        .unwrap();
    assert_eq!(
        result.cast::<String>(),
        Ok(concat.call(("ab".to_string(), 3)))
    );
}
