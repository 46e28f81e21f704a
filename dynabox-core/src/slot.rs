//! # Slots and Non-Owning Handles
//!
//! A [`Slot<T>`] is a reference-counted, interior-mutable cell. It is the
//! shared handle of the boxing layer: cloning it is O(1) and every clone
//! observes the same value.
//!
//! References and pointers into a slot are *weak*: they never extend the
//! lifetime of the referent. Once the last `Slot` is dropped, every access
//! through a [`Ref`], [`RefMut`], [`Ptr`] or [`ConstPtr`] reports the
//! referent as gone instead of dangling.
//!
//! ```rust,ignore
//! let name = Slot::new(String::from("hi"));
//! let view = name.by_ref();
//! name.set("bye".into());
//! assert_eq!(view.read(|s| s.clone()), Some("bye".to_string()));
//! ```

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::{Arc, Weak};

/// A shared, reference-counted, interior-mutable cell.
pub struct Slot<T>(Arc<RwLock<T>>);

impl<T> Slot<T> {
    /// Create a new slot owning `value`.
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Wrap an existing shared lock.
    pub fn from_arc(inner: Arc<RwLock<T>>) -> Self {
        Self(inner)
    }

    /// Get the underlying shared lock.
    pub fn as_arc(&self) -> &Arc<RwLock<T>> {
        &self.0
    }

    /// Consume the slot, returning the underlying shared lock.
    pub fn into_arc(self) -> Arc<RwLock<T>> {
        self.0
    }

    /// Lock the slot for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    /// Lock the slot for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Replace the value, returning the previous one.
    pub fn set(&self, value: T) -> T {
        std::mem::replace(&mut *self.0.write(), value)
    }

    /// Clone the current value out of the slot.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.read().clone()
    }

    /// An immutable non-owning reference to this slot.
    pub fn by_ref(&self) -> Ref<T> {
        Ref(Arc::downgrade(&self.0))
    }

    /// A mutable non-owning reference to this slot.
    pub fn by_mut(&self) -> RefMut<T> {
        RefMut(Arc::downgrade(&self.0))
    }

    /// A mutable non-owning pointer to this slot.
    pub fn as_ptr(&self) -> Ptr<T> {
        Ptr(Arc::downgrade(&self.0))
    }

    /// An immutable non-owning pointer to this slot.
    pub fn as_const_ptr(&self) -> ConstPtr<T> {
        ConstPtr(Arc::downgrade(&self.0))
    }

    /// Returns the number of strong handles to this slot.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Whether both handles point at the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Attempt to unwrap the value if this is the only strong handle.
    ///
    /// Returns `Err(self)` if there are other handles.
    pub fn try_unwrap(self) -> Result<T, Self> {
        Arc::try_unwrap(self.0)
            .map(RwLock::into_inner)
            .map_err(Slot)
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&*self.0.read()).finish()
    }
}

/// Declares a weak handle type with the accessors every handle shares.
macro_rules! weak_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T>(Weak<RwLock<T>>);

        impl<T> $name<T> {
            /// Wrap a weak pointer to a slot's lock.
            pub fn from_weak(target: Weak<RwLock<T>>) -> Self {
                Self(target)
            }

            /// Consume the handle, returning the weak pointer.
            pub fn into_weak(self) -> Weak<RwLock<T>> {
                self.0
            }

            /// Temporarily upgrade to a strong handle, if the referent is alive.
            pub fn upgrade(&self) -> Option<Slot<T>> {
                self.0.upgrade().map(Slot)
            }

            /// Whether the referent has been dropped (or never existed).
            pub fn is_dangling(&self) -> bool {
                self.0.strong_count() == 0
            }

            /// Run `f` on the referent, if it is still alive.
            pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
                let target = self.0.upgrade()?;
                let guard = target.read();
                Some(f(&guard))
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                Self(Weak::clone(&self.0))
            }
        }

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("type", &std::any::type_name::<T>())
                    .field("dangling", &self.is_dangling())
                    .finish()
            }
        }
    };
}

/// Adds mutable access to a weak handle type.
macro_rules! weak_handle_mut {
    ($name:ident) => {
        impl<T> $name<T> {
            /// Run `f` on the referent mutably, if it is still alive.
            pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
                let target = self.0.upgrade()?;
                let mut guard = target.write();
                Some(f(&mut guard))
            }
        }
    };
}

weak_handle!(
    /// An immutable, non-owning reference into a [`Slot`].
    Ref
);

weak_handle!(
    /// A mutable, non-owning reference into a [`Slot`].
    RefMut
);

weak_handle!(
    /// A mutable, non-owning, nullable pointer into a [`Slot`].
    Ptr
);

weak_handle!(
    /// An immutable, non-owning, nullable pointer into a [`Slot`].
    ConstPtr
);

weak_handle_mut!(RefMut);
weak_handle_mut!(Ptr);

impl<T> Ptr<T> {
    /// A pointer that refers to nothing.
    pub fn null() -> Self {
        Self(Weak::new())
    }
}

impl<T> ConstPtr<T> {
    /// A pointer that refers to nothing.
    pub fn null() -> Self {
        Self(Weak::new())
    }
}

impl<T> From<RefMut<T>> for Ref<T> {
    fn from(target: RefMut<T>) -> Self {
        Ref(target.0)
    }
}
