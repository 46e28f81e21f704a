//! # Argument Extraction
//!
//! Converts boxed arguments back into the static parameter types of a native
//! function, the inverse direction of return boxing.
//!
//! # Extractors
//!
//! - [`FromDynamic`] - A single parameter
//! - [`FromArgs`] - A whole parameter list, implemented for tuples of up to
//!   eight [`FromDynamic`] types
//!
//! Value parameters are cloned out of the argument. Handle parameters
//! ([`Slot`], [`Ref`], [`RefMut`]) alias the argument's referent instead, so
//! a function can mutate a caller's value.

use crate::dynamic::Dynamic;
use crate::error::{CastError, DispatchError};
use crate::function::FunctionHandle;
use crate::number::Number;
use crate::slot::{Ref, RefMut, Slot};
use crate::type_info::{TypeFlags, TypeInfo};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

/// A trait for extracting a parameter from a boxed argument.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be extracted from a dynamic argument",
    label = "missing `FromDynamic` implementation",
    note = "Derive it with `#[derive(Dynamic)]` and `#[dynamic(trivial)]` or `#[dynamic(clone)]`, or take a `Slot<T>`/`Ref<T>` parameter."
)]
pub trait FromDynamic: Sized + 'static {
    /// The parameter type reported in a callable's signature.
    fn param_type() -> TypeInfo {
        TypeInfo::of::<Self>()
    }

    /// Attempt to extract `Self` from the given argument.
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError>;
}

/// Parameter types extracted by cloning the payload.
macro_rules! clone_from_dynamic {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromDynamic for $t {
                fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
                    value.cast::<$t>()
                }
            }
        )*
    };
}

clone_from_dynamic!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    String,
);

impl<T> FromDynamic for Vec<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.cast::<Vec<T>>()
    }
}

impl<T> FromDynamic for VecDeque<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.cast::<VecDeque<T>>()
    }
}

impl<T> FromDynamic for Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.cast::<Option<T>>()
    }
}

impl<K, V, S> FromDynamic for HashMap<K, V, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.cast::<HashMap<K, V, S>>()
    }
}

impl<K, V> FromDynamic for BTreeMap<K, V>
where
    K: Ord + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.cast::<BTreeMap<K, V>>()
    }
}

impl FromDynamic for Dynamic {
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        Ok(value.clone())
    }
}

impl FromDynamic for Number {
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        Number::try_from_dynamic(value.clone())
    }
}

impl FromDynamic for FunctionHandle {
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.as_function()
    }
}

impl<T: Send + Sync + 'static> FromDynamic for Slot<T> {
    fn param_type() -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.as_slot::<T>()
    }
}

impl<T: Send + Sync + 'static> FromDynamic for Ref<T> {
    fn param_type() -> TypeInfo {
        TypeInfo::of::<T>().with_flags(TypeFlags::CONST | TypeFlags::REFERENCE)
    }

    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        value.as_weak::<T>().map(Ref::from_weak)
    }
}

impl<T: Send + Sync + 'static> FromDynamic for RefMut<T> {
    fn param_type() -> TypeInfo {
        TypeInfo::of::<T>().with_flags(TypeFlags::REFERENCE)
    }

    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        if value.is_const() {
            return Err(CastError::ReadOnly {
                type_name: value.type_info().name(),
            });
        }
        value.as_weak::<T>().map(RefMut::from_weak)
    }
}

/// A parameter list extracted from boxed arguments.
pub trait FromArgs: Sized + 'static {
    /// Number of parameters.
    const ARITY: usize;

    /// Each parameter's type, in order.
    fn param_types() -> Vec<TypeInfo>;

    /// Check the argument count and extract every parameter.
    fn from_args(args: &[Dynamic]) -> Result<Self, DispatchError>;
}

/// Macro to implement FromArgs for tuples of extractors.
macro_rules! impl_from_args_tuple {
    ($arity:expr; $($T:ident => $idx:tt),*) => {
        impl<$($T,)*> FromArgs for ($($T,)*)
        where
            $($T: FromDynamic,)*
        {
            const ARITY: usize = $arity;

            fn param_types() -> Vec<TypeInfo> {
                vec![$($T::param_type(),)*]
            }

            fn from_args(args: &[Dynamic]) -> Result<Self, DispatchError> {
                if args.len() != Self::ARITY {
                    return Err(DispatchError::ArityMismatch {
                        expected: Self::ARITY,
                        found: args.len(),
                    });
                }
                Ok(($(
                    $T::from_dynamic(&args[$idx])
                        .map_err(|source| DispatchError::BadArgument { index: $idx, source })?,
                )*))
            }
        }
    };
}

impl_from_args_tuple!(0;);
impl_from_args_tuple!(1; A1 => 0);
impl_from_args_tuple!(2; A1 => 0, A2 => 1);
impl_from_args_tuple!(3; A1 => 0, A2 => 1, A3 => 2);
impl_from_args_tuple!(4; A1 => 0, A2 => 1, A3 => 2, A4 => 3);
impl_from_args_tuple!(5; A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4);
impl_from_args_tuple!(6; A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4, A6 => 5);
impl_from_args_tuple!(7; A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4, A6 => 5, A7 => 6);
impl_from_args_tuple!(8; A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4, A6 => 5, A7 => 6, A8 => 7);
