use log::{debug, trace};

use crate::{DType, Dims, Error, Result, Shape, Tensor};

/// A tensor value whose nesting is only known at run time.
///
/// `Leaf` is a single number and `Node` a sequence of sub-tensors.
#[derive(Clone, Debug, PartialEq)]
pub enum Element<T> {
    Leaf(T),
    Node(Vec<Element<T>>),
}

impl<T: DType> Element<T> {
    /// Whether this is a single value rather than a sequence.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Build the nested value for `dims` from row-major `flat` data.
    ///
    /// `flat` must hold exactly the element count of `dims`.
    fn from_flat(dims: &[usize], flat: &[T]) -> Self {
        match dims.split_first() {
            None => Self::Leaf(flat[0]),
            Some((_, rest)) => {
                let stride: usize = rest.iter().product();
                Self::Node(
                    flat.chunks(stride)
                        .map(|chunk| Self::from_flat(rest, chunk))
                        .collect(),
                )
            }
        }
    }

    fn push_leaves(&self, out: &mut Vec<T>) {
        match self {
            Self::Leaf(v) => out.push(*v),
            Self::Node(children) => children.iter().for_each(|c| c.push_leaves(out)),
        }
    }

    /// Infer the shape of a nested value, rejecting ragged and empty sequences.
    fn infer_dims(&self, axis: usize) -> Result<Vec<usize>> {
        let Self::Node(children) = self else {
            return Ok(Vec::new());
        };
        let (first, rest) = children
            .split_first()
            .ok_or(Error::ZeroExtent { axis })?;
        let inner = first.infer_dims(axis + 1)?;
        for child in rest {
            let got = child.infer_dims(axis + 1)?;
            if got != inner {
                return Err(Error::ShapeMismatch {
                    op: "construct",
                    expected: Dims(inner),
                    got: Dims(got),
                });
            }
        }
        let mut dims = Vec::with_capacity(inner.len() + 1);
        dims.push(children.len());
        dims.extend(inner);
        Ok(dims)
    }
}

/// Conversion of nested arrays, vectors and numbers into an [`Element`].
pub trait IntoElement<T: DType> {
    fn into_element(self) -> Element<T>;
}

impl<T: DType> IntoElement<T> for Element<T> {
    fn into_element(self) -> Element<T> {
        self
    }
}

impl<T: DType, U: IntoElement<T>, const N: usize> IntoElement<T> for [U; N] {
    fn into_element(self) -> Element<T> {
        Element::Node(self.into_iter().map(IntoElement::into_element).collect())
    }
}

impl<T: DType, U: IntoElement<T>> IntoElement<T> for Vec<U> {
    fn into_element(self) -> Element<T> {
        Element::Node(self.into_iter().map(IntoElement::into_element).collect())
    }
}

/// A tensor whose shape is validated once, when it is constructed.
///
/// Every operation checks the shapes of its arguments before touching any
/// element and fails with [`Error::ShapeMismatch`] or [`Error::RankMismatch`]
/// instead of truncating, padding or partially computing a result.
#[derive(Clone, Debug, PartialEq)]
pub struct DynTensor<T: DType> {
    dims: Dims,
    root: Element<T>,
}

fn check_rank<T: DType>(op: &'static str, t: &DynTensor<T>, rank: usize) -> Result<()> {
    if t.dims.rank() != rank {
        debug!("{op}: rejecting shape {} (expected rank {rank})", t.dims);
        return Err(Error::RankMismatch {
            op,
            expected: rank,
            got: t.dims.clone(),
        });
    }
    Ok(())
}

fn check_dims(op: &'static str, expected: &Dims, got: &Dims) -> Result<()> {
    if expected != got {
        debug!("{op}: rejecting shape {got} (expected {expected})");
        return Err(Error::ShapeMismatch {
            op,
            expected: expected.clone(),
            got: got.clone(),
        });
    }
    Ok(())
}

impl<T: DType> DynTensor<T> {
    /// Validate a nested value and infer its shape.
    ///
    /// ```
    /// use constshape_core::DynTensor;
    ///
    /// let m = DynTensor::<i32>::new([[1, 2, 3], [4, 5, 6]]).unwrap();
    /// assert_eq!(m.dims().as_slice(), &[2, 3]);
    /// assert!(DynTensor::<i32>::new(vec![vec![1, 2], vec![3]]).is_err());
    /// ```
    pub fn new(value: impl IntoElement<T>) -> Result<Self> {
        let root = value.into_element();
        let dims = root.infer_dims(0).inspect_err(|e| {
            debug!("rejecting tensor: {e}");
        })?;
        let dims = Dims::new(dims)?;
        trace!("constructed {} tensor of shape {dims}", T::NAME);
        Ok(Self { dims, root })
    }

    /// Validate a nested value against a declared shape.
    pub fn with_dims(dims: Dims, value: impl IntoElement<T>) -> Result<Self> {
        let t = Self::new(value)?;
        check_dims("with_dims", &dims, &t.dims)?;
        Ok(t)
    }

    pub fn scalar(v: T) -> Self {
        Self {
            dims: Dims::scalar(),
            root: Element::Leaf(v),
        }
    }

    /// A vector holding `data`. Empty vectors are rejected.
    pub fn from_vec(data: Vec<T>) -> Result<Self> {
        Self::new(data.into_iter().map(Element::Leaf).collect::<Vec<_>>())
    }

    /// Trusted constructor for results whose shape was already checked.
    fn from_flat(dims: Dims, flat: &[T]) -> Self {
        let root = Element::from_flat(dims.as_slice(), flat);
        Self { dims, root }
    }

    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.rank()
    }

    /// Whether this tensor is a single value rather than a sequence.
    pub fn is_scalar(&self) -> bool {
        self.root.is_scalar()
    }

    pub fn element(&self) -> &Element<T> {
        &self.root
    }

    pub fn as_scalar(&self) -> Option<T> {
        match self.root {
            Element::Leaf(v) => Some(v),
            Element::Node(_) => None,
        }
    }

    /// Elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::new();
        self.root.push_leaves(&mut out);
        out
    }

    /// Row-major flattening into a vector whose length is the product of the extents.
    pub fn flatten(&self) -> Result<Self> {
        let len = self.dims.element_count()?;
        Ok(Self::from_flat(Dims(vec![len]), &self.to_vec()))
    }

    /// The elements of `self` followed by the elements of `rhs`.
    pub fn concat(&self, rhs: &Self) -> Result<Self> {
        check_rank("concat", self, 1)?;
        check_rank("concat", rhs, 1)?;
        let len = crate::algebra::add(self.dims.0[0], rhs.dims.0[0])?;
        let mut flat = self.to_vec();
        flat.extend(rhs.to_vec());
        Ok(Self::from_flat(Dims(vec![len]), &flat))
    }

    /// Sum of element-wise products, accumulated left to right from zero.
    pub fn dot(&self, rhs: &Self) -> Result<Self> {
        check_rank("dot", self, 1)?;
        check_dims("dot", &self.dims, &rhs.dims)?;
        let sum = self
            .to_vec()
            .into_iter()
            .zip(rhs.to_vec())
            .fold(T::ZERO, |acc, (a, b)| acc + a * b);
        Ok(Self::scalar(sum))
    }

    /// Entry `(i, j)` is `self[i] * rhs[j]`.
    pub fn outer(&self, rhs: &Self) -> Result<Self> {
        check_rank("outer", self, 1)?;
        check_dims("outer", &self.dims, &rhs.dims)?;
        let (a, b) = (self.to_vec(), rhs.to_vec());
        let flat: Vec<T> = a
            .iter()
            .flat_map(|&x| b.iter().map(move |&y| x * y))
            .collect();
        let n = self.dims.0[0];
        Ok(Self::from_flat(Dims(vec![n, n]), &flat))
    }

    /// Entry `(j, i)` of the result is entry `(i, j)` of `self`.
    pub fn transpose(&self) -> Result<Self> {
        check_rank("transpose", self, 2)?;
        let (rows, cols) = (self.dims.0[0], self.dims.0[1]);
        let src = self.to_vec();
        let flat: Vec<T> = (0..cols)
            .flat_map(|j| (0..rows).map(move |i| (i, j)))
            .map(|(i, j)| src[i * cols + j])
            .collect();
        Ok(Self::from_flat(Dims(vec![cols, rows]), &flat))
    }

    /// Matrix multiplication: (N x M) * (M x P) = (N x P)
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        check_rank("matmul", self, 2)?;
        check_rank("matmul", rhs, 2)?;
        let (n, m) = (self.dims.0[0], self.dims.0[1]);
        let p = rhs.dims.0[1];
        check_dims("matmul", &Dims(vec![m, p]), &rhs.dims)?;
        let (a, b) = (self.to_vec(), rhs.to_vec());
        let flat: Vec<T> = (0..n)
            .flat_map(|i| (0..p).map(move |j| (i, j)))
            .map(|(i, j)| (0..m).fold(T::ZERO, |acc, k| acc + a[i * m + k] * b[k * p + j]))
            .collect();
        Ok(Self::from_flat(Dims(vec![n, p]), &flat))
    }
}

impl<S: Shape, T: DType> From<Tensor<S, T>> for DynTensor<T> {
    fn from(t: Tensor<S, T>) -> Self {
        Self::from_flat(S::dims(), &t.to_vec())
    }
}

impl<S: Shape, T: DType> TryFrom<DynTensor<T>> for Tensor<S, T> {
    type Error = Error;

    fn try_from(t: DynTensor<T>) -> Result<Self> {
        check_dims("try_from", &S::dims(), &t.dims)?;
        let flat = t.to_vec();
        Ok(Tensor::from_fn(|i| flat[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flat_nests_row_major() {
        let e = Element::from_flat(&[2, 2], &[1, 2, 3, 4]);
        assert_eq!(
            e,
            Element::Node(vec![
                Element::Node(vec![Element::Leaf(1), Element::Leaf(2)]),
                Element::Node(vec![Element::Leaf(3), Element::Leaf(4)]),
            ])
        );
    }

    #[test]
    fn infer_reports_axis_of_empty_sequence() {
        let e: Element<f32> = Element::Node(vec![Element::Node(vec![])]);
        assert!(matches!(e.infer_dims(0), Err(Error::ZeroExtent { axis: 1 })));
    }
}
