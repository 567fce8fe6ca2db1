//! Arithmetic over tensor extents.
//!
//! Every function here is a `const fn`, so the same definitions serve both
//! the compiler (result extents of [`Tensor`](crate::Tensor) operations are
//! checked inside `const` blocks) and the runtime validation performed by
//! [`DynTensor`](crate::DynTensor).
//!
//! The operations follow the usual recursive laws:
//!
//! ```text
//! add(n, 0)           = n
//! add(n, m)           = add(increment(n), decrement(m))
//! multiply(n, 0)      = 0
//! multiply(n, m)      = add(multiply(n, decrement(m)), n)
//! product([])         = 1
//! product([h, ..t])   = multiply(h, product(t))
//! ```
//!
//! They are evaluated with checked native arithmetic, so the only bound is
//! [`MAX_NATURAL`].

use std::fmt;

/// The largest natural number the algebra can represent.
pub const MAX_NATURAL: usize = usize::MAX;

/// The arithmetic operation which left the natural range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arith {
    Increment,
    Decrement,
    Add,
    Multiply,
    Product,
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Product => "product",
        };
        f.write_str(name)
    }
}

/// A computed extent fell outside `0..=MAX_NATURAL`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{op} of {lhs} and {rhs} is outside the natural range 0..={max}", max = MAX_NATURAL)]
pub struct RangeExceeded {
    pub op: Arith,
    pub lhs: usize,
    pub rhs: usize,
}

impl RangeExceeded {
    const fn new(op: Arith, lhs: usize, rhs: usize) -> Self {
        Self { op, lhs, rhs }
    }
}

pub const fn increment(n: usize) -> Result<usize, RangeExceeded> {
    match n.checked_add(1) {
        Some(v) => Ok(v),
        None => Err(RangeExceeded::new(Arith::Increment, n, 1)),
    }
}

/// `decrement(0)` has no natural result and is reported as [`RangeExceeded`].
pub const fn decrement(n: usize) -> Result<usize, RangeExceeded> {
    match n.checked_sub(1) {
        Some(v) => Ok(v),
        None => Err(RangeExceeded::new(Arith::Decrement, n, 1)),
    }
}

pub const fn add(n: usize, m: usize) -> Result<usize, RangeExceeded> {
    match n.checked_add(m) {
        Some(v) => Ok(v),
        None => Err(RangeExceeded::new(Arith::Add, n, m)),
    }
}

pub const fn multiply(n: usize, m: usize) -> Result<usize, RangeExceeded> {
    match n.checked_mul(m) {
        Some(v) => Ok(v),
        None => Err(RangeExceeded::new(Arith::Multiply, n, m)),
    }
}

/// Total element count implied by a shape. The empty shape (a scalar) has one element.
pub const fn product(dims: &[usize]) -> Result<usize, RangeExceeded> {
    let mut acc = 1usize;
    // Fold from the innermost axis outwards: product([h, ..t]) = h * product(t).
    let mut i = dims.len();
    while i > 0 {
        i -= 1;
        acc = match dims[i].checked_mul(acc) {
            Some(v) => v,
            None => return Err(RangeExceeded::new(Arith::Product, dims[i], acc)),
        };
    }
    Ok(acc)
}

/// [`add`] for use in constant evaluation. Overflow aborts compilation.
pub const fn static_add(n: usize, m: usize) -> usize {
    match add(n, m) {
        Ok(v) => v,
        Err(_) => panic!("extent sum overflows usize"),
    }
}

/// [`multiply`] for use in constant evaluation. Overflow aborts compilation.
pub const fn static_multiply(n: usize, m: usize) -> usize {
    match multiply(n, m) {
        Ok(v) => v,
        Err(_) => panic!("extent product overflows usize"),
    }
}

/// [`product`] for use in constant evaluation. Overflow aborts compilation.
pub const fn static_product(dims: &[usize]) -> usize {
    match product(dims) {
        Ok(v) => v,
        Err(_) => panic!("element count overflows usize"),
    }
}
