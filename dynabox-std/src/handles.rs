//! Boxing of shared handles, references and pointers.
//!
//! Slots and references dispatch on their element type through
//! [`Boxable`]. Pointers are boxed the same way for every element type.

use crate::strategy::{Boxable, IntoDynamic, Strategy, trace_boxing};
use dynabox_core::{AccessMode, ConstPtr, Dynamic, Ptr, Ref, RefMut, Slot};

impl<T: Boxable> IntoDynamic for Slot<T> {
    const STRATEGY: Strategy = T::SLOT_STRATEGY;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Self>(Self::STRATEGY);
        T::box_slot(self)
    }
}

impl<T: Boxable> IntoDynamic for &Slot<T> {
    const STRATEGY: Strategy = T::SLOT_STRATEGY;

    fn into_dynamic(self) -> Dynamic {
        self.clone().into_dynamic()
    }
}

impl<T: Boxable> IntoDynamic for &mut Slot<T> {
    const STRATEGY: Strategy = T::SLOT_STRATEGY;

    fn into_dynamic(self) -> Dynamic {
        self.clone().into_dynamic()
    }
}

impl<T: Boxable> IntoDynamic for Ref<T> {
    const STRATEGY: Strategy = T::REF_STRATEGY;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Self>(Self::STRATEGY);
        T::box_ref(self)
    }
}

impl<T: Boxable> IntoDynamic for RefMut<T> {
    const STRATEGY: Strategy = T::REF_MUT_STRATEGY;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Self>(Self::STRATEGY);
        T::box_ref_mut(self)
    }
}

impl<T> IntoDynamic for Ptr<T>
where
    T: Send + Sync + 'static,
{
    const STRATEGY: Strategy = Strategy::Pointer;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Self>(Strategy::Pointer);
        Dynamic::from_ptr(self.into_weak(), AccessMode::ReadWrite)
    }
}

impl<T> IntoDynamic for ConstPtr<T>
where
    T: Send + Sync + 'static,
{
    const STRATEGY: Strategy = Strategy::Pointer;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Self>(Strategy::Pointer);
        Dynamic::from_ptr(self.into_weak(), const_pointer_access())
    }
}

/// Pointers to immutable data are boxed mutable under
/// `legacy-pointer-mutability`.
const fn const_pointer_access() -> AccessMode {
    if cfg!(feature = "legacy-pointer-mutability") {
        AccessMode::ReadWrite
    } else {
        AccessMode::ReadOnly
    }
}
