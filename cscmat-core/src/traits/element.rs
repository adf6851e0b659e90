//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored as nonzero values of a CSC matrix.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

use crate::format::DataType;

/// Trait for types that can be stored as matrix elements
///
/// All matrix element types must be:
/// - Copy: values are moved around the CSC arrays by plain copies
/// - PartialEq: zero detection and value replacement compare elements
/// - Pod: the value array can be viewed as raw bytes for persistence
/// - closed under the four arithmetic operators, for scaling and
///   accumulating duplicate locations
///
/// Arithmetic follows the native operators of the type, including
/// overflow behavior for integers.
pub trait MatrixElement:
    Copy
    + Clone
    + PartialEq
    + Debug
    + Default
    + Send
    + Sync
    + bytemuck::Pod
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + 'static
{
    /// Get the DataType tag for this element type
    fn data_type() -> DataType;

    /// The additive identity, never stored explicitly
    fn zero() -> Self;

    /// The multiplicative identity
    fn one() -> Self;

    /// Get the size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// True when the value would be dropped from storage
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Convert from f64 for generic construction
    ///
    /// Used by the random constructors, which draw values as f64.
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for generic operations
    fn to_f64(self) -> f64;

    /// False for infinities and NaN; always true for integers
    #[inline]
    fn is_finite(self) -> bool {
        true
    }

    /// True for NaN; always false for integers
    #[inline]
    fn is_nan(self) -> bool {
        false
    }

    /// True for positive or negative infinity; always false for integers
    #[inline]
    fn is_infinite(self) -> bool {
        false
    }
}

macro_rules! impl_float_element {
    ($ty:ty, $tag:expr) => {
        impl MatrixElement for $ty {
            fn data_type() -> DataType {
                $tag
            }

            fn zero() -> Self {
                0.0
            }

            fn one() -> Self {
                1.0
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            fn is_nan(self) -> bool {
                <$ty>::is_nan(self)
            }

            fn is_infinite(self) -> bool {
                <$ty>::is_infinite(self)
            }
        }
    };
}

macro_rules! impl_int_element {
    ($ty:ty, $tag:expr) => {
        impl MatrixElement for $ty {
            fn data_type() -> DataType {
                $tag
            }

            fn zero() -> Self {
                0
            }

            fn one() -> Self {
                1
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_float_element!(f32, DataType::F32);
impl_float_element!(f64, DataType::F64);
impl_int_element!(i32, DataType::I32);
impl_int_element!(i64, DataType::I64);
impl_int_element!(u32, DataType::U32);
impl_int_element!(u64, DataType::U64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_detection() {
        assert!(0.0f64.is_zero());
        assert!((-0.0f64).is_zero());
        assert!(!1e-300f64.is_zero());
        assert!(0i32.is_zero());
        assert!(!f64::NAN.is_zero());
    }

    #[test]
    fn test_float_classification() {
        assert!(MatrixElement::is_nan(f32::NAN));
        assert!(MatrixElement::is_infinite(f64::NEG_INFINITY));
        assert!(!MatrixElement::is_finite(f64::INFINITY));
        assert!(MatrixElement::is_finite(7i64));
        assert!(!MatrixElement::is_nan(7u32));
    }

    #[test]
    fn test_data_type_tags() {
        assert_eq!(f32::data_type(), DataType::F32);
        assert_eq!(u64::data_type(), DataType::U64);
        assert_eq!(f64::size_bytes(), 8);
    }
}
