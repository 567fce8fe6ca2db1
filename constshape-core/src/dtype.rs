use std::{
    fmt::Debug,
    ops::{Add, Mul, Sub},
};

#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "half")]
use half::f16;

use rand::Rng;

use crate::{Element, IntoElement};

/// Sample a value of this type from the uniform distribution.
///
/// Floating point types sample from `[0, 1)`, integral types from their full range.
pub trait RandDispatch {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self
    where
        Self: Sized;
}

pub trait DTypeOps:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + RandDispatch
{
}

/// Marker trait for tensor datatypes.
pub trait DType: Debug + PartialEq + DTypeOps + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    const NAME: &'static str;
    const INTEGRAL: bool;

    fn to_f64(&self) -> f64;
    fn from_f64(x: f64) -> Self;
}

macro_rules! dtype {
    ($rt:ident, $zero:expr, $one:expr, $integral:expr) => {
        impl DTypeOps for $rt {}
        impl DType for $rt {
            const ZERO: $rt = $zero;
            const ONE: $rt = $one;
            const NAME: &'static str = stringify!($rt);
            const INTEGRAL: bool = $integral;

            fn to_f64(&self) -> f64 {
                *self as f64
            }
            fn from_f64(x: f64) -> Self {
                x as $rt
            }
        }
        impl RandDispatch for $rt {
            fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
                rng.random::<$rt>()
            }
        }
        impl IntoElement<$rt> for $rt {
            fn into_element(self) -> Element<$rt> {
                Element::Leaf(self)
            }
        }
    };
}

dtype!(u8, 0u8, 1u8, true);
dtype!(u32, 0u32, 1u32, true);
dtype!(i32, 0i32, 1i32, true);
dtype!(i64, 0i64, 1i64, true);
dtype!(f32, 0f32, 1f32, false);
dtype!(f64, 0f64, 1f64, false);

macro_rules! half_dtype {
    ($rt:ident) => {
        impl DTypeOps for $rt {}
        impl DType for $rt {
            const ZERO: $rt = $rt::from_f64_const(0.0);
            const ONE: $rt = $rt::from_f64_const(1.0);
            const NAME: &'static str = stringify!($rt);
            const INTEGRAL: bool = false;

            fn to_f64(&self) -> f64 {
                self.to_f64_const()
            }
            fn from_f64(x: f64) -> Self {
                Self::from_f64_const(x)
            }
        }
        impl RandDispatch for $rt {
            fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
                $rt::from_f32(rng.random::<f32>())
            }
        }
        impl IntoElement<$rt> for $rt {
            fn into_element(self) -> Element<$rt> {
                Element::Leaf(self)
            }
        }
    };
}

#[cfg(feature = "half")]
half_dtype!(f16);
#[cfg(feature = "bfloat")]
half_dtype!(bf16);
