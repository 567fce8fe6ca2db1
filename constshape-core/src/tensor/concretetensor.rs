use std::{
    fmt,
    marker::PhantomData,
    ops::{Add, Mul, Sub},
};

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    algebra,
    shape::{Dim, R0, R1, R2, R3},
    Context, DType, Result, Shape,
};

/// A tensor whose shape `S` is part of its type.
///
/// The elements are stored as nested arrays (`S::Repr<T>`), so the nesting
/// depth is the rank of `S` and every level has exactly the extent `S`
/// declares. Tensors are immutable values; every operation returns a new one.
pub struct Tensor<S: Shape, T: DType> {
    data: S::Repr<T>,
    _ghost: PhantomData<S>,
}

pub type Scalar<T> = Tensor<R0, T>;
pub type Vector<const N: usize, T> = Tensor<R1<N>, T>;
pub type Matrix<const ROWS: usize, const COLS: usize, T> = Tensor<R2<ROWS, COLS>, T>;

impl<S: Shape, T: DType> Clone for Tensor<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Shape, T: DType> Copy for Tensor<S, T> {}

impl<S: Shape, T: DType> PartialEq for Tensor<S, T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<S: Shape, T: DType> fmt::Debug for Tensor<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &S::shape())
            .field("dtype", &T::NAME)
            .field("data", &self.data)
            .finish()
    }
}

impl<S: Shape, T: DType> Tensor<S, T> {
    fn from_repr(data: S::Repr<T>) -> Self {
        const { assert!(S::ELEMENT_COUNT > 0) };
        Self {
            data,
            _ghost: PhantomData,
        }
    }

    /// Create a tensor from nested arrays, e.g. `[[1, 2, 3], [4, 5, 6]]` for `R2<2, 3>`.
    pub fn new(data: S::Repr<T>) -> Self {
        Self::from_repr(data)
    }

    /// Create a tensor by evaluating `f` at every row-major flat index.
    pub fn from_fn<F: FnMut(usize) -> T>(mut f: F) -> Self {
        Self::from_repr(S::build(0, &mut f))
    }

    /// Create a tensor filled with some value.
    pub fn full(v: T) -> Self {
        Self::from_fn(|_| v)
    }

    /// Create a tensor filled with zeros.
    pub fn zeros() -> Self {
        Self::full(T::ZERO)
    }

    /// Create a tensor filled with ones.
    pub fn ones() -> Self {
        Self::full(T::ONE)
    }

    /// Create a tensor of uniform random values using the thread-local generator.
    pub fn rand() -> Self {
        Self::rand_with(&mut rand::rng())
    }

    pub fn rand_with<R: Rng>(rng: &mut R) -> Self {
        Self::from_fn(|_| T::sample_uniform(rng))
    }

    /// Create a tensor of normally distributed values. Only supported for floating point dtypes.
    pub fn randn(mean: T, std: T) -> Result<Self> {
        Self::randn_with(&mut rand::rng(), mean, std)
    }

    pub fn randn_with<R: Rng>(rng: &mut R, mean: T, std: T) -> Result<Self> {
        if T::INTEGRAL {
            crate::bail!("Normal random fill is not supported for dtype {}", T::NAME);
        }
        if std.to_f64() < 0.0 {
            crate::bail!("standard deviation must be non-negative, got {std:?}");
        }
        let normal = Normal::new(mean.to_f64(), std.to_f64())
            .with_context(|| format!("invalid normal distribution N({mean:?}, {std:?})"))?;
        Ok(Self::from_fn(|_| T::from_f64(normal.sample(rng))))
    }

    /// Borrow the nested array representation.
    pub fn data(&self) -> &S::Repr<T> {
        &self.data
    }

    pub fn into_data(self) -> S::Repr<T> {
        self.data
    }

    pub fn shape(&self) -> Vec<usize> {
        S::shape()
    }

    pub fn rank(&self) -> usize {
        S::RANK
    }

    /// Whether this tensor is a single value rather than a sequence.
    pub fn is_scalar(&self) -> bool {
        S::RANK == 0
    }

    /// Elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        (0..S::ELEMENT_COUNT)
            .map(|i| S::get_flat(&self.data, i))
            .collect()
    }

    /// Apply `f` to every element.
    pub fn map<U: DType, F: FnMut(T) -> U>(&self, mut f: F) -> Tensor<S, U> {
        Tensor::from_fn(|i| f(S::get_flat(&self.data, i)))
    }

    /// Cast this tensor to a different dtype `U`.
    pub fn cast<U: DType>(&self) -> Tensor<S, U> {
        self.map(|x| U::from_f64(x.to_f64()))
    }

    fn zip_with<F: FnMut(T, T) -> T>(&self, rhs: &Self, mut f: F) -> Self {
        Self::from_fn(|i| f(S::get_flat(&self.data, i), S::get_flat(&rhs.data, i)))
    }

    /// Row-major flattening into a vector of `P` elements.
    ///
    /// `P` must be the product of the extents of `S`; any other length is
    /// rejected when the program is compiled.
    ///
    /// ```
    /// use constshape_core::{Tensor, Vector, R2};
    ///
    /// let m = Tensor::<R2<2, 3>, i32>::new([[1, 2, 3], [4, 5, 6]]);
    /// let v: Vector<6, i32> = m.flatten();
    /// assert_eq!(v.into_data(), [1, 2, 3, 4, 5, 6]);
    /// ```
    ///
    /// ```compile_fail
    /// use constshape_core::{Tensor, Vector, R2};
    ///
    /// let m = Tensor::<R2<2, 3>, i32>::new([[1, 2, 3], [4, 5, 6]]);
    /// let v: Vector<5, i32> = m.flatten();
    /// ```
    pub fn flatten<const P: usize>(&self) -> Vector<P, T> {
        const {
            assert!(
                P == S::ELEMENT_COUNT,
                "flatten: result length must be the product of the extents"
            )
        };
        Tensor::from_fn(|i| S::get_flat(&self.data, i))
    }
}

impl<T: DType> Tensor<R0, T> {
    pub fn scalar(v: T) -> Self {
        Self::from_repr(v)
    }

    pub fn value(&self) -> T {
        self.data
    }
}

impl<T: DType> From<T> for Tensor<R0, T> {
    fn from(v: T) -> Self {
        Self::scalar(v)
    }
}

impl<const N: usize, S: Shape, T: DType> Tensor<Dim<N, S>, T> {
    /// The `i`th sub-tensor along the outermost axis.
    pub fn get(&self, i: usize) -> Option<Tensor<S, T>> {
        self.data.get(i).map(|d| Tensor::from_repr(*d))
    }

    /// Sub-tensors along the outermost axis, in order.
    pub fn iter(&self) -> impl Iterator<Item = Tensor<S, T>> + '_ {
        self.data.iter().map(|d| Tensor::from_repr(*d))
    }
}

impl<const N: usize, T: DType> Tensor<R1<N>, T> {
    /// The elements of `self` followed by the elements of `rhs`.
    ///
    /// `O` must equal `N + M`, which is usually inferred from the binding:
    ///
    /// ```
    /// use constshape_core::{Tensor, Vector, R1};
    ///
    /// let a = Tensor::<R1<1>, i32>::new([20]);
    /// let b = Tensor::<R1<4>, i32>::new([1, 2, 3, 4]);
    /// let c: Vector<5, i32> = a.concat(&b);
    /// assert_eq!(c.into_data(), [20, 1, 2, 3, 4]);
    /// ```
    ///
    /// ```compile_fail
    /// use constshape_core::{Tensor, Vector, R1};
    ///
    /// let a = Tensor::<R1<1>, i32>::new([20]);
    /// let b = Tensor::<R1<4>, i32>::new([1, 2, 3, 4]);
    /// let c: Vector<4, i32> = a.concat(&b);
    /// ```
    pub fn concat<const M: usize, const O: usize>(&self, rhs: &Vector<M, T>) -> Vector<O, T> {
        const {
            assert!(
                O == algebra::static_add(N, M),
                "concat: result length must be the sum of the input lengths"
            )
        };
        Tensor::from_fn(|i| if i < N { self.data[i] } else { rhs.data[i - N] })
    }

    /// Sum of element-wise products, accumulated left to right from zero.
    ///
    /// ```compile_fail
    /// use constshape_core::{Tensor, R1};
    ///
    /// let a = Tensor::<R1<3>, f32>::ones();
    /// let b = Tensor::<R1<4>, f32>::ones();
    /// let _ = a.dot(&b);
    /// ```
    pub fn dot(&self, rhs: &Self) -> Tensor<R0, T> {
        let sum = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::ZERO, |acc, (&a, &b)| acc + a * b);
        Tensor::scalar(sum)
    }

    /// Entry `(i, j)` is `self[i] * rhs[j]`.
    pub fn outer(&self, rhs: &Self) -> Matrix<N, N, T> {
        Tensor::new(std::array::from_fn(|i| {
            std::array::from_fn(|j| self.data[i] * rhs.data[j])
        }))
    }
}

impl<const ROWS: usize, const COLS: usize, T: DType> Tensor<R2<ROWS, COLS>, T> {
    /// Entry `(j, i)` of the result is entry `(i, j)` of `self`.
    pub fn transpose(&self) -> Matrix<COLS, ROWS, T> {
        Tensor::new(std::array::from_fn(|j| {
            std::array::from_fn(|i| self.data[i][j])
        }))
    }

    /// Matrix multiplication: (ROWS x COLS) * (COLS x P) = (ROWS x P)
    ///
    /// The inner dimensions must agree:
    ///
    /// ```compile_fail
    /// use constshape_core::{Tensor, R2};
    ///
    /// let a = Tensor::<R2<2, 3>, f32>::ones();
    /// let b = Tensor::<R2<2, 3>, f32>::ones();
    /// let _ = a.matmul(&b);
    /// ```
    pub fn matmul<const P: usize>(&self, rhs: &Matrix<COLS, P, T>) -> Matrix<ROWS, P, T> {
        Tensor::new(std::array::from_fn(|i| {
            std::array::from_fn(|j| {
                (0..COLS).fold(T::ZERO, |acc, k| acc + self.data[i][k] * rhs.data[k][j])
            })
        }))
    }
}

impl<const B: usize, const M: usize, const K: usize, T: DType> Tensor<R3<B, M, K>, T> {
    /// Batched matrix multiplication: (B x M x K) * (B x K x N) = (B x M x N)
    pub fn matmul<const N: usize>(&self, rhs: &Tensor<R3<B, K, N>, T>) -> Tensor<R3<B, M, N>, T> {
        Tensor::new(std::array::from_fn(|b| {
            let l: Matrix<M, K, T> = Tensor::new(self.data[b]);
            let r: Matrix<K, N, T> = Tensor::new(rhs.data[b]);
            l.matmul(&r).into_data()
        }))
    }
}

macro_rules! tensor_binop {
    ($trait:ident, $fn_name:ident) => {
        impl<S: Shape, T: DType> $trait for Tensor<S, T> {
            type Output = Tensor<S, T>;
            /// Elementwise operation between tensors of the same shape.
            fn $fn_name(self, rhs: Self) -> Self::Output {
                self.zip_with(&rhs, |a, b| a.$fn_name(b))
            }
        }
    };
}

tensor_binop!(Add, add);
tensor_binop!(Mul, mul);
tensor_binop!(Sub, sub);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shows_shape() {
        let t = Tensor::<R1<2>, u8>::ones();
        assert_eq!(
            format!("{t:?}"),
            "Tensor { shape: [2], dtype: \"u8\", data: [1, 1] }"
        );
    }

    #[test]
    fn scalar_from_value() {
        let s: Tensor<R0, f64> = 2.5.into();
        assert!(s.is_scalar());
        assert_eq!(s.value(), 2.5);
        assert_eq!(s.to_vec(), vec![2.5]);
    }
}
