//! Constshape is a small tensor library whose shapes are checked by the compiler.
//!
//! A [`Tensor<S, T>`] carries its shape `S` in its type. Shapes are lists of
//! positive extents built from [`R0`] and [`Dim`], with the aliases
//! [`R1`]..[`R6`] for the common ranks, and the tensor stores its elements as
//! nested arrays of exactly that shape. Operations that combine tensors only
//! type-check when the shapes are compatible:
//!
//! - [`Tensor::matmul`] requires the inner dimensions to agree.
//! - [`Tensor::dot`] and [`Tensor::outer`] require vectors of equal length.
//! - [`Tensor::concat`] and [`Tensor::flatten`] produce extents computed by the
//!   [`algebra`] module during compilation.
//!
//! When shapes are only known at run time, [`DynTensor`] validates the shape
//! once at construction and reports incompatible arguments as [`Error`]s.
//!
//! ## What can you do with it?
//! ```
//! use constshape_core::{Matrix, Tensor, Vector, R2, R3};
//!
//! let a = Tensor::<R2<2, 3>, i32>::new([[1, 2, 3], [4, 5, 6]]);
//! let b = a.transpose();
//! assert_eq!(b.into_data(), [[1, 4], [2, 5], [3, 6]]);
//!
//! let c: Matrix<2, 2, i32> = a.matmul(&b);
//! assert_eq!(c.into_data(), [[14, 32], [32, 77]]);
//!
//! let t = Tensor::<R3<2, 3, 4>, i32>::from_fn(|i| i as i32 + 1);
//! let flat: Vector<24, i32> = t.flatten();
//! assert_eq!(flat.to_vec(), (1..=24).collect::<Vec<_>>());
//! ```
//!
//! Zero extents are rejected as well:
//!
//! ```compile_fail
//! use constshape_core::{Tensor, R2};
//!
//! let _ = Tensor::<R2<0, 3>, f32>::zeros();
//! ```

pub mod algebra;
mod dtype;
mod error;
mod shape;
mod tensor;

pub use algebra::{Arith, RangeExceeded};
pub use dtype::{DType, RandDispatch};
pub use error::{Context, Error, Result};
pub use shape::{
    Dim, Dims, MatrixShape, NonScalar, ScalarShape, Shape, VectorShape, R0, R1, R2, R3, R4, R5,
    R6,
};
pub use tensor::{DynTensor, Element, IntoElement, Matrix, Scalar, Tensor, Vector};
