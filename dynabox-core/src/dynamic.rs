//! # Dynamic Values
//!
//! [`Dynamic`] is the uniform, type-erased value that flows through a dynamic
//! dispatch engine. Its payload is held under exactly one ownership mode:
//!
//! | Mode     | Payload                               | Keeps referent alive |
//! |----------|---------------------------------------|----------------------|
//! | `Void`   | nothing                               | -                    |
//! | `Owned`  | the value itself                      | yes                  |
//! | `Shared` | a strong [`Slot`] handle              | yes (joint)          |
//! | `Ref`    | a weak pointer into a [`Slot`]        | no                   |
//!
//! The [`AccessMode`] is chosen at construction and decides whether
//! [`Dynamic::write`] is allowed. Clones of a dynamic value alias its payload
//! in every mode, so a value handed back unchanged is the same value.

use crate::error::CastError;
use crate::slot::Slot;
use crate::type_info::{TypeFlags, TypeInfo};
use parking_lot::RwLock;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::{Arc, Weak};

/// Whether a dynamic value may be written through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessMode {
    /// Mutable.
    #[default]
    ReadWrite,
    /// Immutable.
    ReadOnly,
}

impl AccessMode {
    /// Whether writes are allowed.
    pub const fn is_mutable(self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}

type AnyOwned = Arc<RwLock<Box<dyn Any + Send + Sync>>>;
type AnyShared = Arc<dyn Any + Send + Sync>;
type AnyWeak = Weak<dyn Any + Send + Sync>;

enum Payload {
    Void,
    // Moved in at construction; only clones of the dynamic value alias it.
    Owned(AnyOwned),
    // Always an `RwLock<T>` behind the erasure.
    Shared(AnyShared),
    Ref(AnyWeak),
}

impl Clone for Payload {
    fn clone(&self) -> Self {
        match self {
            Payload::Void => Payload::Void,
            Payload::Owned(cell) => Payload::Owned(Arc::clone(cell)),
            Payload::Shared(target) => Payload::Shared(Arc::clone(target)),
            Payload::Ref(target) => Payload::Ref(Weak::clone(target)),
        }
    }
}

/// A type-erased runtime value.
///
/// Cloning never copies the payload: the clone aliases the same owned cell,
/// shared slot or referent.
#[derive(Clone)]
#[must_use]
pub struct Dynamic {
    payload: Payload,
    type_info: TypeInfo,
    access: AccessMode,
}

impl Dynamic {
    /// The value representing the absence of a value.
    pub fn void() -> Self {
        Self {
            payload: Payload::Void,
            type_info: TypeInfo::void(),
            access: AccessMode::ReadWrite,
        }
    }

    /// Box a value the dynamic value will own.
    pub fn from_owned<T>(value: T, access: AccessMode) -> Self
    where
        T: Any + Send + Sync,
    {
        let value: Box<dyn Any + Send + Sync> = Box::new(value);
        Self {
            payload: Payload::Owned(Arc::new(RwLock::new(value))),
            type_info: qualified::<T>(access, TypeFlags::empty()),
            access,
        }
    }

    /// Box a shared handle; the dynamic value joins in owning the referent.
    pub fn from_shared<T>(slot: Slot<T>, access: AccessMode) -> Self
    where
        T: Send + Sync + 'static,
    {
        let target: AnyShared = slot.into_arc();
        Self {
            payload: Payload::Shared(target),
            type_info: qualified::<T>(access, TypeFlags::empty()),
            access,
        }
    }

    /// Box a non-owning reference to the contents of a slot.
    pub fn from_ref<T>(target: Weak<RwLock<T>>, access: AccessMode) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::weak(target, access, TypeFlags::REFERENCE)
    }

    /// Box a non-owning, possibly null, pointer to the contents of a slot.
    pub fn from_ptr<T>(target: Weak<RwLock<T>>, access: AccessMode) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::weak(target, access, TypeFlags::POINTER)
    }

    fn weak<T>(target: Weak<RwLock<T>>, access: AccessMode, flags: TypeFlags) -> Self
    where
        T: Send + Sync + 'static,
    {
        let target: AnyWeak = target;
        Self {
            payload: Payload::Ref(target),
            type_info: qualified::<T>(access, flags),
            access,
        }
    }

    /// The erased static type of the payload.
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// The access mode chosen at construction.
    pub fn access_mode(&self) -> AccessMode {
        self.access
    }

    /// Whether the payload is of type `T`.
    pub fn is_type<T: ?Sized + 'static>(&self) -> bool {
        self.type_info.is::<T>()
    }

    /// Whether this is the void value.
    pub fn is_void(&self) -> bool {
        matches!(self.payload, Payload::Void)
    }

    /// Whether this is a reference or pointer whose referent is gone.
    pub fn is_null(&self) -> bool {
        match &self.payload {
            Payload::Ref(target) => target.strong_count() == 0,
            _ => false,
        }
    }

    /// Whether this value owns its payload rather than sharing a slot.
    pub fn is_owned(&self) -> bool {
        matches!(self.payload, Payload::Owned(_))
    }

    /// Whether this value shares ownership of its payload.
    pub fn is_shared(&self) -> bool {
        matches!(self.payload, Payload::Shared(_))
    }

    /// Whether this value is a non-owning reference or pointer.
    pub fn is_ref(&self) -> bool {
        matches!(self.payload, Payload::Ref(_))
    }

    /// Whether writes through this value are rejected.
    pub fn is_const(&self) -> bool {
        !self.access.is_mutable()
    }

    /// Run `f` on the payload.
    pub fn read<T, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, CastError>
    where
        T: Any,
    {
        let found = self.type_info.name();
        match &self.payload {
            Payload::Void => Err(CastError::Void),
            Payload::Owned(cell) => {
                let guard = cell.read();
                (**guard)
                    .downcast_ref::<T>()
                    .map(f)
                    .ok_or_else(|| mismatch::<T>(found))
            }
            Payload::Shared(target) => {
                let guard = lock_of::<T>(&**target, found)?.read();
                Ok(f(&guard))
            }
            Payload::Ref(target) => {
                let target = target.upgrade().ok_or(CastError::Dangling { type_name: found })?;
                let guard = lock_of::<T>(&*target, found)?.read();
                Ok(f(&guard))
            }
        }
    }

    /// Run `f` on the payload mutably.
    ///
    /// Fails with [`CastError::ReadOnly`] when the value was boxed read-only.
    pub fn write<T, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, CastError>
    where
        T: Any,
    {
        let found = self.type_info.name();
        if !self.access.is_mutable() {
            return Err(CastError::ReadOnly { type_name: found });
        }
        match &mut self.payload {
            Payload::Void => Err(CastError::Void),
            Payload::Owned(cell) => {
                let mut guard = cell.write();
                (**guard)
                    .downcast_mut::<T>()
                    .map(f)
                    .ok_or_else(|| mismatch::<T>(found))
            }
            Payload::Shared(target) => {
                let mut guard = lock_of::<T>(&**target, found)?.write();
                Ok(f(&mut guard))
            }
            Payload::Ref(target) => {
                let target = target.upgrade().ok_or(CastError::Dangling { type_name: found })?;
                let mut guard = lock_of::<T>(&*target, found)?.write();
                Ok(f(&mut guard))
            }
        }
    }

    /// Clone the payload out as a `T`.
    pub fn cast<T>(&self) -> Result<T, CastError>
    where
        T: Any + Clone,
    {
        self.read(T::clone)
    }

    /// Recover the shared handle of a shared value.
    pub fn as_slot<T>(&self) -> Result<Slot<T>, CastError>
    where
        T: Send + Sync + 'static,
    {
        match &self.payload {
            Payload::Void => Err(CastError::Void),
            Payload::Shared(target) => Arc::clone(target)
                .downcast::<RwLock<T>>()
                .map(Slot::from_arc)
                .map_err(|_| mismatch::<T>(self.type_info.name())),
            Payload::Owned(_) | Payload::Ref(_) => Err(CastError::NotShared {
                type_name: self.type_info.name(),
            }),
        }
    }

    /// Recover a weak pointer to the referent of a shared or reference value.
    pub fn as_weak<T>(&self) -> Result<Weak<RwLock<T>>, CastError>
    where
        T: Send + Sync + 'static,
    {
        match &self.payload {
            Payload::Void => Err(CastError::Void),
            Payload::Shared(_) => self.as_slot::<T>().map(|slot| Arc::downgrade(slot.as_arc())),
            Payload::Ref(target) => {
                let target = target.upgrade().ok_or(CastError::Dangling {
                    type_name: self.type_info.name(),
                })?;
                target
                    .downcast::<RwLock<T>>()
                    .map(|target| Arc::downgrade(&target))
                    .map_err(|_| mismatch::<T>(self.type_info.name()))
            }
            Payload::Owned(_) => Err(CastError::NotShared {
                type_name: self.type_info.name(),
            }),
        }
    }
}

fn lock_of<'a, T: Any>(
    target: &'a (dyn Any + Send + Sync),
    found: &'static str,
) -> Result<&'a RwLock<T>, CastError> {
    target
        .downcast_ref::<RwLock<T>>()
        .ok_or_else(|| mismatch::<T>(found))
}

fn mismatch<T>(found: &'static str) -> CastError {
    CastError::TypeMismatch {
        expected: type_name::<T>(),
        found,
    }
}

fn qualified<T: 'static>(access: AccessMode, flags: TypeFlags) -> TypeInfo {
    let info = TypeInfo::of::<T>().with_flags(flags);
    match access {
        AccessMode::ReadWrite => info,
        AccessMode::ReadOnly => info.with_flags(TypeFlags::CONST),
    }
}

impl Default for Dynamic {
    fn default() -> Self {
        Self::void()
    }
}

/// Identity comparison.
///
/// Two void values are equal. Every other value is equal to the values that
/// alias its payload: its own clones, and for shared and reference values
/// anything pointing at the same slot. Two references that are both null are
/// equal only when they were boxed with the same type.
impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        fn addr(target: &(dyn Any + Send + Sync)) -> *const () {
            target as *const (dyn Any + Send + Sync) as *const ()
        }

        match (&self.payload, &other.payload) {
            (Payload::Void, Payload::Void) => true,
            (Payload::Owned(a), Payload::Owned(b)) => Arc::ptr_eq(a, b),
            (Payload::Shared(a), Payload::Shared(b)) => Arc::ptr_eq(a, b),
            (Payload::Shared(a), Payload::Ref(b)) | (Payload::Ref(b), Payload::Shared(a)) => {
                b.upgrade().is_some_and(|b| addr(&*b) == addr(&**a))
            }
            (Payload::Ref(a), Payload::Ref(b)) => {
                Weak::ptr_eq(a, b) && self.type_info.bare_equal(&other.type_info)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.payload {
            Payload::Void => "void",
            Payload::Owned(_) => "owned",
            Payload::Shared(_) => "shared",
            Payload::Ref(_) => "ref",
        };
        f.debug_struct("Dynamic")
            .field("mode", &mode)
            .field("type", &self.type_info.to_string())
            .field("access", &self.access)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_values_compare_equal() {
        let a = Dynamic::void();
        let b = Dynamic::default();
        assert!(a.is_void());
        assert_eq!(a, b);
        assert_eq!(a.read(|v: &()| *v), Err(CastError::Void));
    }

    #[test]
    fn test_owned_read_write() {
        let mut value = Dynamic::from_owned(5_i32, AccessMode::ReadWrite);
        assert!(value.is_owned());
        assert_eq!(value.cast::<i32>(), Ok(5));

        value.write(|v: &mut i32| *v += 1).unwrap();
        assert_eq!(value.cast::<i32>(), Ok(6));
    }

    #[test]
    fn test_owned_clone_aliases() {
        let mut original = Dynamic::from_owned(1_u8, AccessMode::ReadWrite);
        let alias = original.clone();
        original.write(|v: &mut u8| *v = 9).unwrap();

        assert_eq!(alias.cast::<u8>(), Ok(9));
        assert_eq!(original, alias);
    }

    #[test]
    fn test_owned_equality_is_identity() {
        let value = Dynamic::from_owned(5_i32, AccessMode::ReadWrite);
        let twin = Dynamic::from_owned(5_i32, AccessMode::ReadWrite);

        assert_eq!(value, value);
        assert_eq!(value, value.clone());
        assert_ne!(value, twin);
    }

    #[test]
    fn test_type_mismatch() {
        let value = Dynamic::from_owned(5_i32, AccessMode::ReadWrite);
        let err = value.cast::<String>().unwrap_err();
        assert_eq!(
            err,
            CastError::TypeMismatch {
                expected: "alloc::string::String",
                found: "i32",
            }
        );
    }

    #[test]
    fn test_shared_aliases_slot() {
        let slot = Slot::new(String::from("a"));
        let mut value = Dynamic::from_shared(slot.clone(), AccessMode::ReadWrite);
        assert!(value.is_shared());
        assert_eq!(slot.strong_count(), 2);

        value.write(|s: &mut String| s.push('b')).unwrap();
        assert_eq!(slot.get(), "ab");

        let recovered = value.as_slot::<String>().unwrap();
        assert!(recovered.ptr_eq(&slot));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let slot = Slot::new(3_u32);
        let mut value = Dynamic::from_ref(Arc::downgrade(slot.as_arc()), AccessMode::ReadOnly);

        assert!(value.is_const());
        assert!(value.type_info().is_const());
        assert!(value.type_info().is_reference());
        assert_eq!(
            value.write(|v: &mut u32| *v = 0),
            Err(CastError::ReadOnly { type_name: "u32" })
        );
        assert_eq!(slot.get(), 3);
    }

    #[test]
    fn test_ref_reports_dangling() {
        let slot = Slot::new(1_i64);
        let value = Dynamic::from_ptr(Arc::downgrade(slot.as_arc()), AccessMode::ReadWrite);
        assert!(!value.is_null());
        assert!(value.type_info().is_pointer());

        drop(slot);
        assert!(value.is_null());
        assert_eq!(
            value.cast::<i64>(),
            Err(CastError::Dangling { type_name: "i64" })
        );
    }

    #[test]
    fn test_identity_between_shared_and_ref() {
        let slot = Slot::new(0_i32);
        let shared = Dynamic::from_shared(slot.clone(), AccessMode::ReadWrite);
        let reference = Dynamic::from_ref(Arc::downgrade(slot.as_arc()), AccessMode::ReadOnly);
        let other = Dynamic::from_shared(Slot::new(0_i32), AccessMode::ReadWrite);

        assert_eq!(shared, reference);
        assert_eq!(reference, shared);
        assert_ne!(shared, other);
    }

    #[test]
    fn test_null_refs_compare_by_type() {
        let null_int = Dynamic::from_ptr(Weak::<RwLock<i32>>::new(), AccessMode::ReadWrite);
        let other_int = Dynamic::from_ptr(Weak::<RwLock<i32>>::new(), AccessMode::ReadWrite);
        let null_text = Dynamic::from_ptr(Weak::<RwLock<String>>::new(), AccessMode::ReadWrite);

        assert!(null_int.is_null() && null_text.is_null());
        assert_eq!(null_int, other_int);
        assert_ne!(null_int, null_text);
        assert_ne!(null_text, null_int);
    }

    #[test]
    fn test_as_weak_from_owned_is_rejected() {
        let value = Dynamic::from_owned(1_i32, AccessMode::ReadWrite);
        assert_eq!(
            value.as_weak::<i32>().unwrap_err(),
            CastError::NotShared { type_name: "i32" }
        );
    }
}
