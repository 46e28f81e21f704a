//! Runtime type identity for boxed values.

use bitflags::bitflags;
use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

bitflags! {
    /// Qualifiers recorded alongside the bare type of a boxed value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        /// The value is the absence of a value.
        const VOID = 1 << 0;
        /// The bare type is a numeric primitive.
        const ARITHMETIC = 1 << 1;
        /// The value may not be written through.
        const CONST = 1 << 2;
        /// The value is a non-owning reference.
        const REFERENCE = 1 << 3;
        /// The value is a non-owning, possibly null, pointer.
        const POINTER = 1 << 4;
    }
}

/// The erased static type of a boxed value.
///
/// Two `TypeInfo`s are equal when both the bare type and the qualifiers
/// match; use [`TypeInfo::bare_equal`] to ignore qualifiers.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    flags: TypeFlags,
}

impl TypeInfo {
    /// Type identity of `T` with no qualifiers besides the intrinsic ones.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        let mut flags = TypeFlags::empty();
        if id == TypeId::of::<()>() {
            flags |= TypeFlags::VOID;
        }
        if is_arithmetic(id) {
            flags |= TypeFlags::ARITHMETIC;
        }
        Self {
            id,
            name: type_name::<T>(),
            flags,
        }
    }

    /// Type identity of the void value.
    pub fn void() -> Self {
        Self::of::<()>()
    }

    /// Returns a copy with the given qualifiers added.
    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// The `TypeId` of the bare type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The name of the bare type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All recorded qualifiers.
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Whether the bare type is `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Compares bare types only.
    pub fn bare_equal(&self, other: &TypeInfo) -> bool {
        self.id == other.id
    }

    /// Whether this describes the absence of a value.
    pub fn is_void(&self) -> bool {
        self.flags.contains(TypeFlags::VOID)
    }

    /// Whether the bare type is a numeric primitive.
    pub fn is_arithmetic(&self) -> bool {
        self.flags.contains(TypeFlags::ARITHMETIC)
    }

    /// Whether the value is read-only.
    pub fn is_const(&self) -> bool {
        self.flags.contains(TypeFlags::CONST)
    }

    /// Whether the value is a non-owning reference.
    pub fn is_reference(&self) -> bool {
        self.flags.contains(TypeFlags::REFERENCE)
    }

    /// Whether the value is a non-owning pointer.
    pub fn is_pointer(&self) -> bool {
        self.flags.contains(TypeFlags::POINTER)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.flags == other.flags
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.flags.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const() {
            f.write_str("const ")?;
        }
        if self.is_reference() {
            f.write_str("&")?;
        } else if self.is_pointer() {
            f.write_str("*")?;
        }
        f.write_str(self.name)
    }
}

fn is_arithmetic(id: TypeId) -> bool {
    [
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
    ]
    .contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_flags() {
        assert!(TypeInfo::void().is_void());
        assert!(TypeInfo::of::<u16>().is_arithmetic());
        assert!(TypeInfo::of::<f64>().is_arithmetic());
        assert!(!TypeInfo::of::<bool>().is_arithmetic());
        assert!(!TypeInfo::of::<String>().is_void());
    }

    #[test]
    fn test_qualifiers_affect_equality_but_not_bare_equality() {
        let plain = TypeInfo::of::<String>();
        let const_ref = plain.with_flags(TypeFlags::CONST | TypeFlags::REFERENCE);

        assert_ne!(plain, const_ref);
        assert!(plain.bare_equal(&const_ref));
        assert!(const_ref.is::<String>());
    }

    #[test]
    fn test_display_qualifiers() {
        let info = TypeInfo::of::<i32>().with_flags(TypeFlags::CONST | TypeFlags::REFERENCE);
        assert_eq!(info.to_string(), "const &i32");

        let ptr = TypeInfo::of::<i32>().with_flags(TypeFlags::POINTER);
        assert_eq!(ptr.to_string(), "*i32");
    }
}
