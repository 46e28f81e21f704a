//! Boxing of returned values: primitives, standard containers, void and
//! values that are already dynamic.

use crate::strategy::{Boxable, IntoDynamic, Strategy, box_trivial, box_value, trace_boxing};
use dynabox_core::{Dynamic, Number};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Trivially copyable values are moved into an owned payload.
macro_rules! trivial_values {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoDynamic for $t {
                const STRATEGY: Strategy = Strategy::Trivial;

                fn into_dynamic(self) -> Dynamic {
                    box_trivial(self)
                }
            }

            impl Boxable for $t {}
        )*
    };
}

trivial_values!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
);

/// Non-trivial values are moved into a fresh slot with a single owner.
macro_rules! shared_values {
    ($([$($g:ident),*] $t:ty),* $(,)?) => {
        $(
            impl<$($g,)*> IntoDynamic for $t
            where
                $t: Send + Sync + 'static,
            {
                const STRATEGY: Strategy = Strategy::NonTrivial;

                fn into_dynamic(self) -> Dynamic {
                    box_value(self)
                }
            }

            impl<$($g,)*> Boxable for $t where $t: Send + Sync + 'static {}
        )*
    };
}

shared_values!(
    [] String,
    [T] Vec<T>,
    [T] VecDeque<T>,
    [T] Option<T>,
    [T] Box<T>,
    [T, S] HashSet<T, S>,
    [T] BTreeSet<T>,
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
);

impl IntoDynamic for () {
    const STRATEGY: Strategy = Strategy::Void;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<()>(Strategy::Void);
        Dynamic::void()
    }
}

impl IntoDynamic for Dynamic {
    const STRATEGY: Strategy = Strategy::Passthrough;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Dynamic>(Strategy::Passthrough);
        self
    }
}

/// References hand back a clone, which aliases the same payload.
impl IntoDynamic for &Dynamic {
    const STRATEGY: Strategy = Strategy::Passthrough;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Dynamic>(Strategy::Passthrough);
        self.clone()
    }
}

impl IntoDynamic for &mut Dynamic {
    const STRATEGY: Strategy = Strategy::Passthrough;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Dynamic>(Strategy::Passthrough);
        self.clone()
    }
}

impl IntoDynamic for Number {
    const STRATEGY: Strategy = Strategy::Number;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Number>(Strategy::Number);
        Number::into_dynamic(self)
    }
}

impl IntoDynamic for &Number {
    const STRATEGY: Strategy = Strategy::Number;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Number>(Strategy::Number);
        self.as_dynamic().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_is_owned_and_mutable() {
        let value = 5_i32.into_dynamic();
        assert!(value.is_owned());
        assert!(!value.is_const());
        assert_eq!(value.cast::<i32>(), Ok(5));
        assert_eq!(<char as IntoDynamic>::STRATEGY, Strategy::Trivial);
    }

    #[test]
    fn test_non_trivial_is_shared_single_owner() {
        let value = vec![1_u8, 2, 3].into_dynamic();
        assert!(value.is_shared());
        assert!(!value.is_const());

        let slot = value.as_slot::<Vec<u8>>().unwrap();
        // one owner from the value, one from the recovered handle
        assert_eq!(slot.strong_count(), 2);
        assert_eq!(<String as IntoDynamic>::STRATEGY, Strategy::NonTrivial);
    }

    #[test]
    fn test_void() {
        let value = ().into_dynamic();
        assert!(value.is_void());
        assert!(value.type_info().is_void());
        assert_eq!(value, Dynamic::void());
    }

    #[test]
    fn test_passthrough_keeps_identity() {
        let original = String::from("same").into_dynamic();
        let by_ref = (&original).into_dynamic();
        let moved = original.clone().into_dynamic();

        assert_eq!(by_ref, original);
        assert_eq!(moved, original);
        assert_eq!(moved.access_mode(), original.access_mode());
    }

    #[test]
    fn test_mut_passthrough_of_owned_value_writes_back() {
        let mut original = 5_i32.into_dynamic();
        let mut returned = (&mut original).into_dynamic();
        returned.write(|v: &mut i32| *v = 99).unwrap();

        assert_eq!(original.cast::<i32>(), Ok(99));
        assert_eq!(returned, original);
        assert_eq!(<&mut Dynamic as IntoDynamic>::STRATEGY, Strategy::Passthrough);
    }

    #[test]
    fn test_number_unwraps() {
        let number = Number::new(2.5_f32);
        let value = (&number).into_dynamic();
        assert!(value.is_type::<f32>());
        assert_eq!(number.into_dynamic().cast::<f32>(), Ok(2.5));
    }
}
