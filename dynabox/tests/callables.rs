//! Boxed closures and assignable callable slots.

mod common;

use common::{Handler, ON_SCORE, call_int, int, text};
use dynabox::testing::{CountingFunction, RecordingFunction};
use dynabox::{
    DispatchError, Dynamic, Function, FunctionAdapter, IntoDynamic, ProxyFunction, Slot, Strategy,
};

#[test]
fn test_global_slot_reassignment() {
    let boxed = ON_SCORE.by_mut().into_dynamic();
    assert_eq!(call_int(&boxed, &[int(4)]), 4);

    ON_SCORE.set(Function::new(|x: i32| x * x));
    assert_eq!(call_int(&boxed, &[int(4)]), 16);

    // the shared handle form keeps the global slot alive and follows it too
    let shared = (&*ON_SCORE).into_dynamic();
    ON_SCORE.set(Function::new(|x: i32| -x));
    assert_eq!(call_int(&shared, &[int(4)]), -4);
    assert_eq!(call_int(&boxed, &[int(4)]), -4);
}

#[test]
fn test_assign_through_dispatch() {
    let slot: Slot<Handler> = Slot::new(Function::new(|x: i32| x));
    let target = slot.by_mut().into_dynamic().as_function().unwrap();

    let replacement = Function::new(|x: i32| x + 7).into_dynamic();
    target.assign(&replacement.as_function().unwrap()).unwrap();

    assert_eq!(slot.get().call((1,)), 8);
}

#[test]
fn test_assign_from_another_slot() {
    let first: Slot<Handler> = Slot::new(Function::new(|x: i32| x));
    let second: Slot<Handler> = Slot::new(Function::new(|x: i32| x - 1));

    let target = first.by_mut().into_dynamic().as_function().unwrap();
    let source = second.into_dynamic().as_function().unwrap();
    target.assign(&source).unwrap();

    assert_eq!(first.get().call((10,)), 9);
}

#[test]
fn test_assign_rejects_foreign_callables() {
    let slot: Slot<Handler> = Slot::new(Function::new(|x: i32| x));
    let target = slot.by_mut().into_dynamic().as_function().unwrap();

    let counting = CountingFunction::new().into_handle();
    assert!(matches!(
        target.assign(&counting),
        Err(DispatchError::NotAssignable { .. })
    ));

    // plain adapters cannot be assigned to at all
    let plain = FunctionAdapter::new(Function::new(|x: i32| x)).into_handle();
    assert!(matches!(
        plain.assign(&target),
        Err(DispatchError::NotAssignable { .. })
    ));
}

#[test]
fn test_arity_and_argument_errors() {
    let add = Function::new(|a: i32, b: i32| a + b).into_dynamic();

    assert_eq!(
        add.call(&[int(1)]).unwrap_err(),
        DispatchError::ArityMismatch {
            expected: 2,
            found: 1
        }
    );

    let err = add.call(&[int(1), text("two")]).unwrap_err();
    assert!(matches!(err, DispatchError::BadArgument { index: 1, .. }));
}

#[test]
fn test_calling_a_non_callable() {
    let value = 3_i32.into_dynamic();
    assert_eq!(
        value.call(&[]).unwrap_err(),
        DispatchError::NotCallable { type_name: "i32" }
    );
    assert!(!value.is_function());
}

#[test]
fn test_signature_reporting() {
    let repeat = Function::new(|name: String, times: u8| name.len() * times as usize);
    let function = repeat.into_dynamic().as_function().unwrap();

    assert_eq!(function.arity(), 2);
    let types = function.param_types();
    assert!(types[0].is::<usize>());
    assert!(types[1].is::<String>());
    assert!(types[2].is::<u8>());
}

#[test]
fn test_callable_returning_callable() {
    let curry = Function::new(|a: i32| Function::new(move |b: i32| a * b));
    let partial = curry.into_dynamic().call(&[int(6)]).unwrap();

    assert_eq!(call_int(&partial, &[int(7)]), 42);
}

#[test]
fn test_dynamic_arguments_pass_through() {
    let recorder = RecordingFunction::new(2);
    let forward = {
        let handle = recorder.clone().into_handle();
        Function::new(move |a: Dynamic, b: Dynamic| handle.call(&[a, b]).is_ok())
    };

    let result = forward.into_dynamic().call(&[int(1), text("x")]).unwrap();
    assert_eq!(result.cast::<bool>(), Ok(true));
    assert_eq!(recorder.arg_counts(), vec![2]);
    assert!(recorder.calls()[0][1].is::<String>());
}

#[test]
fn test_counting_through_shared_slot() {
    let counter = CountingFunction::new();
    let slot = Slot::new(counter.function());
    let boxed = (&slot).into_dynamic();

    assert_eq!(
        <Slot<Function<(), usize>> as IntoDynamic>::STRATEGY,
        Strategy::SharedCallable
    );

    drop(slot);
    for _ in 0..3 {
        assert!(boxed.call(&[]).is_ok());
    }
    assert_eq!(counter.count(), 3);
}
