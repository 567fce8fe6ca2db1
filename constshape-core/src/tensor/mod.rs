pub mod concretetensor;
pub mod dyntensor;

pub use concretetensor::{Matrix, Scalar, Tensor, Vector};
pub use dyntensor::{DynTensor, Element, IntoElement};
