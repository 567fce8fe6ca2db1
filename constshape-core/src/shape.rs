use std::{fmt, marker::PhantomData};

use crate::{algebra, DType, Error, Result};

/// A tensor shape known to the compiler.
///
/// Shapes are built like a list: [`R0`] is the empty shape of a scalar and
/// [`Dim<N, S>`] prepends an axis of extent `N` to the shape `S`. The aliases
/// [`R1`] to [`R6`] spell out the common ranks.
pub trait Shape: Copy + fmt::Debug + Send + Sync + 'static {
    /// Number of axes.
    const RANK: usize;
    /// Product of all extents. Evaluating it rejects zero extents.
    const ELEMENT_COUNT: usize;

    /// Nested array holding the elements of a tensor with this shape.
    type Repr<T: DType>: Copy + fmt::Debug + PartialEq + Send + Sync;

    fn shape() -> Vec<usize>;

    fn element_count() -> usize {
        Self::ELEMENT_COUNT
    }

    /// Runtime descriptor of this shape.
    fn dims() -> Dims {
        Dims(Self::shape())
    }

    /// Build a representation by calling `f` with each row-major flat index,
    /// starting at `offset`.
    fn build<T: DType, F: FnMut(usize) -> T>(offset: usize, f: &mut F) -> Self::Repr<T>;

    /// Element at row-major flat index `idx`. Panics if `idx >= ELEMENT_COUNT`.
    fn get_flat<T: DType>(repr: &Self::Repr<T>, idx: usize) -> T;
}

/// Shapes with at least one axis.
pub trait NonScalar: Shape {
    /// Extent of the outermost axis.
    const HEAD: usize;
    /// The remaining axes.
    type Tail: Shape;
}

/// The empty shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct R0;

impl Shape for R0 {
    const RANK: usize = 0;
    const ELEMENT_COUNT: usize = 1;

    type Repr<T: DType> = T;

    fn shape() -> Vec<usize> {
        Vec::new()
    }

    fn build<T: DType, F: FnMut(usize) -> T>(offset: usize, f: &mut F) -> Self::Repr<T> {
        f(offset)
    }

    fn get_flat<T: DType>(repr: &Self::Repr<T>, _idx: usize) -> T {
        *repr
    }
}

/// An axis of extent `N` in front of the axes of `S`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dim<const N: usize, S: Shape>(PhantomData<S>);

impl<const N: usize, S: Shape> Shape for Dim<N, S> {
    const RANK: usize = S::RANK + 1;
    const ELEMENT_COUNT: usize = {
        assert!(N > 0, "tensor extents must be positive");
        algebra::static_multiply(N, S::ELEMENT_COUNT)
    };

    type Repr<T: DType> = [S::Repr<T>; N];

    fn shape() -> Vec<usize> {
        let mut shape = Vec::with_capacity(Self::RANK);
        shape.push(N);
        shape.extend(S::shape());
        shape
    }

    fn build<T: DType, F: FnMut(usize) -> T>(offset: usize, f: &mut F) -> Self::Repr<T> {
        let stride = S::ELEMENT_COUNT;
        std::array::from_fn(|i| S::build(offset + i * stride, f))
    }

    fn get_flat<T: DType>(repr: &Self::Repr<T>, idx: usize) -> T {
        let stride = S::ELEMENT_COUNT;
        S::get_flat(&repr[idx / stride], idx % stride)
    }
}

impl<const N: usize, S: Shape> NonScalar for Dim<N, S> {
    const HEAD: usize = N;
    type Tail = S;
}

pub type R1<const A: usize> = Dim<A, R0>;
pub type R2<const A: usize, const B: usize> = Dim<A, R1<B>>;
pub type R3<const A: usize, const B: usize, const C: usize> = Dim<A, R2<B, C>>;
pub type R4<const A: usize, const B: usize, const C: usize, const D: usize> =
    Dim<A, R3<B, C, D>>;
pub type R5<const A: usize, const B: usize, const C: usize, const D: usize, const E: usize> =
    Dim<A, R4<B, C, D, E>>;
pub type R6<
    const A: usize,
    const B: usize,
    const C: usize,
    const D: usize,
    const E: usize,
    const F: usize,
> = Dim<A, R5<B, C, D, E, F>>;

pub type ScalarShape = R0;
pub type VectorShape<const N: usize> = R1<N>;
pub type MatrixShape<const ROWS: usize, const COLS: usize> = R2<ROWS, COLS>;

/// A shape only known at run time: an ordered list of positive extents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Dims(pub(crate) Vec<usize>);

impl Dims {
    /// Validate a list of extents. Zero extents and element counts beyond
    /// the natural range are rejected.
    pub fn new(dims: Vec<usize>) -> Result<Self> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(Error::ZeroExtent { axis });
        }
        algebra::product(&dims)?;
        Ok(Self(dims))
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn vector(len: usize) -> Result<Self> {
        Self::new(vec![len])
    }

    pub fn matrix(rows: usize, cols: usize) -> Result<Self> {
        Self::new(vec![rows, cols])
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    pub fn element_count(&self) -> Result<usize> {
        Ok(algebra::product(&self.0)?)
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{d}")?;
        }
        f.write_str("]")
    }
}
