//! Numeric dynamic values.
//!
//! [`Number`] wraps a [`Dynamic`] known to hold an arithmetic primitive.
//! Arithmetic promotes both operands to a common representation: `i64` when
//! both are integers, `f64` otherwise.

use crate::dynamic::{AccessMode, Dynamic};
use crate::error::{CastError, NumberError};

mod sealed {
    pub trait Sealed {}
}

/// Numeric primitives a [`Number`] can be built from.
pub trait Arithmetic: Copy + Send + Sync + 'static + sealed::Sealed {}

macro_rules! arithmetic {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}
            impl Arithmetic for $t {}
        )*
    };
}

arithmetic!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Int(i64),
    Float(f64),
}

/// A dynamic value holding an arithmetic primitive.
#[derive(Debug, Clone)]
pub struct Number(Dynamic);

impl Number {
    /// Box a numeric primitive.
    pub fn new<T: Arithmetic>(value: T) -> Self {
        Self(Dynamic::from_owned(value, AccessMode::ReadWrite))
    }

    /// Wrap a dynamic value, checking that it holds a numeric primitive.
    pub fn try_from_dynamic(value: Dynamic) -> Result<Self, CastError> {
        if value.is_void() {
            return Err(CastError::Void);
        }
        if !value.type_info().is_arithmetic() {
            return Err(CastError::NotArithmetic {
                type_name: value.type_info().name(),
            });
        }
        Ok(Self(value))
    }

    /// The underlying dynamic value.
    pub fn as_dynamic(&self) -> &Dynamic {
        &self.0
    }

    /// Unwrap into the underlying dynamic value, unchanged.
    pub fn into_dynamic(self) -> Dynamic {
        self.0
    }

    /// Convert to `i64`. Floats are truncated toward zero.
    pub fn to_i64(&self) -> Result<i64, NumberError> {
        match self.numeric()? {
            Numeric::Int(v) => Ok(v),
            #[allow(clippy::cast_possible_truncation)]
            Numeric::Float(v) => Ok(v as i64),
        }
    }

    /// Convert to `f64`.
    pub fn to_f64(&self) -> Result<f64, NumberError> {
        match self.numeric()? {
            #[allow(clippy::cast_precision_loss)]
            Numeric::Int(v) => Ok(v as f64),
            Numeric::Float(v) => Ok(v),
        }
    }

    /// Checked addition.
    pub fn checked_add(&self, other: &Number) -> Result<Number, NumberError> {
        self.binary(other, i64::checked_add, |a, b| a + b)
    }

    /// Checked subtraction.
    pub fn checked_sub(&self, other: &Number) -> Result<Number, NumberError> {
        self.binary(other, i64::checked_sub, |a, b| a - b)
    }

    /// Checked multiplication.
    pub fn checked_mul(&self, other: &Number) -> Result<Number, NumberError> {
        self.binary(other, i64::checked_mul, |a, b| a * b)
    }

    /// Checked division. Integer division by zero is an error.
    pub fn checked_div(&self, other: &Number) -> Result<Number, NumberError> {
        if other.numeric()? == Numeric::Int(0) && matches!(self.numeric()?, Numeric::Int(_)) {
            return Err(NumberError::DivisionByZero);
        }
        self.binary(other, i64::checked_div, |a, b| a / b)
    }

    fn binary(
        &self,
        other: &Number,
        int: fn(i64, i64) -> Option<i64>,
        float: fn(f64, f64) -> f64,
    ) -> Result<Number, NumberError> {
        match (self.numeric()?, other.numeric()?) {
            (Numeric::Int(a), Numeric::Int(b)) => {
                int(a, b).map(Number::new).ok_or(NumberError::Overflow)
            }
            _ => Ok(Number::new(float(self.to_f64()?, other.to_f64()?))),
        }
    }

    fn numeric(&self) -> Result<Numeric, NumberError> {
        let value = &self.0;

        macro_rules! int {
            ($($t:ty),*) => {
                $(
                    if value.is_type::<$t>() {
                        let v = value.cast::<$t>()?;
                        return i64::try_from(v)
                            .map(Numeric::Int)
                            .map_err(|_| NumberError::Overflow);
                    }
                )*
            };
        }

        int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

        if value.is_type::<f32>() {
            return Ok(Numeric::Float(f64::from(value.cast::<f32>()?)));
        }
        if value.is_type::<f64>() {
            return Ok(Numeric::Float(value.cast::<f64>()?));
        }

        Err(NumberError::Cast(CastError::NotArithmetic {
            type_name: value.type_info().name(),
        }))
    }
}

impl<T: Arithmetic> From<T> for Number {
    fn from(value: T) -> Self {
        Number::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_is_unchanged() {
        let number = Number::new(3_u16);
        let value = number.into_dynamic();
        assert!(value.is_type::<u16>());
        assert_eq!(value.cast::<u16>(), Ok(3));
    }

    #[test]
    fn test_rejects_non_arithmetic() {
        let value = Dynamic::from_owned(true, AccessMode::ReadWrite);
        assert_eq!(
            Number::try_from_dynamic(value).unwrap_err(),
            CastError::NotArithmetic { type_name: "bool" }
        );
        assert_eq!(
            Number::try_from_dynamic(Dynamic::void()).unwrap_err(),
            CastError::Void
        );
    }

    #[test]
    fn test_integer_arithmetic() {
        let a = Number::new(7_i32);
        let b = Number::new(2_u8);

        assert_eq!(a.checked_add(&b).unwrap().to_i64(), Ok(9));
        assert_eq!(a.checked_sub(&b).unwrap().to_i64(), Ok(5));
        assert_eq!(a.checked_mul(&b).unwrap().to_i64(), Ok(14));
        assert_eq!(a.checked_div(&b).unwrap().to_i64(), Ok(3));
        assert!(a.checked_add(&b).unwrap().as_dynamic().is_type::<i64>());
    }

    #[test]
    fn test_float_promotion() {
        let a = Number::new(1_i32);
        let b = Number::new(0.5_f64);
        let sum = a.checked_add(&b).unwrap();

        assert!(sum.as_dynamic().is_type::<f64>());
        assert_eq!(sum.to_f64(), Ok(1.5));

        let quotient = Number::new(1.0_f32).checked_div(&Number::new(0_i32)).unwrap();
        assert_eq!(quotient.to_f64(), Ok(f64::INFINITY));
    }

    #[test]
    fn test_integer_errors() {
        let max = Number::new(i64::MAX);
        assert_eq!(max.checked_add(&Number::new(1_i8)).unwrap_err(), NumberError::Overflow);
        assert_eq!(
            Number::new(1_i32).checked_div(&Number::new(0_u32)).unwrap_err(),
            NumberError::DivisionByZero
        );
        assert_eq!(Number::new(u128::MAX).to_i64().unwrap_err(), NumberError::Overflow);
    }
}
