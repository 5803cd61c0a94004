pub mod aliases;
mod block;
mod echelon;
mod math;
mod ops;
mod predicates;
mod product;
#[cfg(feature = "serde")]
mod serialize;
mod stats;
mod util;

pub use ops::Operand;
pub use stats::{By, CenterOptions, NormKind, ScaleOptions, VarianceOptions};

use core::ops::{Deref, Index, IndexMut};

use rand::Rng;

use crate::error::{MatrixError, Result};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
use crate::view::MatrixView;

/// Dense matrix with runtime dimensions.
///
/// Row-major `Vec<T>` storage: element `(i, j)` lives at `data[i * cols + j]`,
/// so every row is a contiguous slice. Implements [`MatrixRef`] and
/// [`MatrixMut`], so every decomposition and free function in
/// [`linalg`](crate::linalg) accepts it directly.
///
/// Mutating operations work in place and return `&mut Self` (or
/// `Result<&mut Self>` when a shape check can fail) so calls chain.
///
/// # Examples
///
/// ```
/// use densela::Matrix;
///
/// let a = Matrix::from_1d_array(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.rows(), 2);
/// assert_eq!(a.columns(), 2);
///
/// let b = Matrix::<f64>::eye(3);
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Options for [`Matrix::rand_int`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandIntOptions {
    /// Inclusive lower bound. Default `0`.
    pub min: i64,
    /// Exclusive upper bound. Default `1000`.
    pub max: i64,
}

impl Default for RandIntOptions {
    fn default() -> Self {
        Self { min: 0, max: 1000 }
    }
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Create a zero-filled `rows x cols` matrix.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::<f64>::new(2, 3);
    /// assert_eq!(m.rows(), 2);
    /// assert_eq!(m.columns(), 3);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
        }
    }

    /// Copy a 2D array (slice of rows) into a new matrix.
    ///
    /// Fails with `InvalidArgument` when there is no row or the first row is
    /// empty, and with `DimensionMismatch` when row lengths differ.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_2d(&[[1, 2, 3], [4, 5, 6]]).unwrap();
    /// assert_eq!(m[(1, 0)], 4);
    ///
    /// let ragged = vec![vec![1.0], vec![2.0, 3.0]];
    /// assert!(Matrix::from_2d(&ragged).is_err());
    /// ```
    pub fn from_2d<R: AsRef<[T]>>(data: &[R]) -> Result<Self> {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.as_ref().len());
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidArgument {
                reason: "Data must be a 2D array with at least one element",
            });
        }
        let mut flat = Vec::with_capacity(rows * cols);
        for row in data {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixError::mismatch((rows, cols), (rows, row.len())));
            }
            flat.extend_from_slice(row);
        }
        Ok(Self {
            data: flat,
            rows,
            cols,
        })
    }

    /// Create a matrix from a flat row-major slice.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_1d_array(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(m[(0, 2)], 3);
    /// assert_eq!(m[(1, 0)], 4);
    /// assert!(Matrix::from_1d_array(2, 2, &[1, 2, 3]).is_err());
    /// ```
    pub fn from_1d_array(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Take ownership of a flat row-major `Vec<T>`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::DimensionMismatch {
                expected: (rows, cols),
                got: (1, data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Copy any [`MatrixRef`] (matrix, view, slice wrapper) into an owned matrix.
    pub fn copy_from<M: MatrixRef<T> + ?Sized>(m: &M) -> Self {
        Self::from_fn(m.nrows(), m.ncols(), |i, j| *m.get(i, j))
    }

    /// Accept anything convertible into a matrix; a `Matrix` passes through
    /// unchanged.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::check_matrix(vec![vec![1.0, 2.0]]).unwrap();
    /// assert_eq!(m.columns(), 2);
    /// let same = Matrix::check_matrix(m.clone()).unwrap();
    /// assert_eq!(same, m);
    /// ```
    pub fn check_matrix(value: impl IntoMatrix<T>) -> Result<Self> {
        value.into_matrix()
    }

    /// Zero-filled `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols)
    }

    /// Matrix of ones.
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::fill(rows, cols, T::one())
    }

    /// Matrix filled with `value`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::fill(2, 3, 7.0_f64);
    /// assert_eq!(m[(0, 0)], 7.0);
    /// assert_eq!(m[(1, 2)], 7.0);
    /// ```
    pub fn fill(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// `n x n` identity matrix.
    pub fn eye(n: usize) -> Self {
        Self::eye_with(n, n, T::one())
    }

    /// `rows x cols` matrix with `value` on the main diagonal.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::eye_with(2, 3, 5);
    /// assert_eq!(m.to_2d_array(), vec![vec![5, 0, 0], vec![0, 5, 0]]);
    /// ```
    pub fn eye_with(rows: usize, cols: usize, value: T) -> Self {
        let mut m = Self::new(rows, cols);
        for i in 0..rows.min(cols) {
            m[(i, i)] = value;
        }
        m
    }

    /// Square matrix with `data` on the diagonal.
    pub fn diag(data: &[T]) -> Self {
        Self::diag_with(data, data.len(), data.len())
    }

    /// `rows x cols` matrix with `data` on the diagonal. Extra diagonal
    /// values are dropped; missing ones stay zero.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::diag_with(&[1.0, 2.0, 3.0], 2, 4);
    /// assert_eq!(m[(1, 1)], 2.0);
    /// assert_eq!(m.rows(), 2);
    /// ```
    pub fn diag_with(data: &[T], rows: usize, cols: usize) -> Self {
        let mut m = Self::new(rows, cols);
        for (i, &v) in data.iter().take(rows.min(cols)).enumerate() {
            m[(i, i)] = v;
        }
        m
    }

    /// `1 x n` matrix from a flat slice.
    pub fn row_vector(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
            rows: 1,
            cols: data.len(),
        }
    }

    /// `n x 1` matrix from a flat slice.
    pub fn column_vector(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
            rows: data.len(),
            cols: 1,
        }
    }

    /// Random integers in `[options.min, options.max)` using the thread RNG.
    pub fn rand_int(rows: usize, cols: usize, options: RandIntOptions) -> Result<Self> {
        Self::rand_int_with(rows, cols, options, &mut rand::rng())
    }

    /// Random integers in `[options.min, options.max)` drawn from `rng`.
    ///
    /// Fails with `InvalidConfiguration` when `min >= max` or the range does
    /// not fit the element type.
    ///
    /// ```
    /// use densela::Matrix;
    /// use densela::matrix::RandIntOptions;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let opts = RandIntOptions { min: -3, max: 3 };
    /// let m = Matrix::<i32>::rand_int_with(4, 4, opts, &mut rng).unwrap();
    /// assert!(m.as_slice().iter().all(|&x| (-3..3).contains(&x)));
    ///
    /// let bad = RandIntOptions { min: 5, max: 5 };
    /// assert!(Matrix::<i32>::rand_int_with(1, 1, bad, &mut rng).is_err());
    /// ```
    pub fn rand_int_with<R: Rng>(
        rows: usize,
        cols: usize,
        options: RandIntOptions,
        rng: &mut R,
    ) -> Result<Self> {
        let RandIntOptions { min, max } = options;
        if min >= max {
            return Err(MatrixError::InvalidConfiguration {
                reason: "min must be smaller than max",
            });
        }
        if T::from(min).is_none() || T::from(max - 1).is_none() {
            return Err(MatrixError::InvalidConfiguration {
                reason: "range does not fit the element type",
            });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for _ in 0..rows * cols {
            let v: i64 = rng.random_range(min..max);
            data.push(T::from(v).unwrap_or_else(T::zero));
        }
        Ok(Self { data, rows, cols })
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Uniform random values in `[0, 1)` using the thread RNG.
    pub fn rand(rows: usize, cols: usize) -> Self {
        Self::rand_with(rows, cols, &mut rand::rng())
    }

    /// Uniform random values in `[0, 1)` drawn from `rng`.
    pub fn rand_with<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self::from_fn(rows, cols, |_, _| {
            let x: f64 = rng.random();
            T::from(x).unwrap_or_else(T::zero)
        })
    }
}

impl<T> Matrix<T> {
    /// Create a matrix by calling `f(row, col)` for each element, in
    /// row-major order.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// assert_eq!(m[(1, 1)], 4.0);
    /// ```
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { data, rows, cols }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Total number of elements, `rows * columns`.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Row-major backing storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major backing storage.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Row `i` as a contiguous slice. Panics if `i >= rows`.
    #[inline]
    pub fn row_slice(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i` as a mutable slice. Panics if `i >= rows`.
    #[inline]
    pub fn row_slice_mut(&mut self, i: usize) -> &mut [T] {
        let cols = self.cols;
        &mut self.data[i * cols..(i + 1) * cols]
    }

    /// Consume the matrix, returning its row-major storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate over all elements in row-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over all elements in row-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Matrix<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Copy> Matrix<T> {
    /// Element at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Overwrite element `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) -> &mut Self {
        self.data[row * self.cols + col] = value;
        self
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }
}

impl<T> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.cols + col]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[row * self.cols + col]
    }
}

// ── Conversions ─────────────────────────────────────────────────────

/// Values accepted by [`Matrix::check_matrix`].
pub trait IntoMatrix<T> {
    fn into_matrix(self) -> Result<Matrix<T>>;
}

impl<T: Scalar> IntoMatrix<T> for Matrix<T> {
    fn into_matrix(self) -> Result<Matrix<T>> {
        Ok(self)
    }
}

impl<T: Scalar> IntoMatrix<T> for &Matrix<T> {
    fn into_matrix(self) -> Result<Matrix<T>> {
        Ok(self.clone())
    }
}

impl<T: Scalar> IntoMatrix<T> for Vec<Vec<T>> {
    fn into_matrix(self) -> Result<Matrix<T>> {
        Matrix::from_2d(&self)
    }
}

impl<T: Scalar, const R: usize, const C: usize> IntoMatrix<T> for [[T; C]; R] {
    fn into_matrix(self) -> Result<Matrix<T>> {
        Matrix::from_2d(&self)
    }
}

impl<T: Scalar, B: Deref<Target = Matrix<T>>> IntoMatrix<T> for MatrixView<B> {
    fn into_matrix(self) -> Result<Matrix<T>> {
        Ok(self.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_is_zero_filled() {
        let m = Matrix::<f64>::new(3, 4);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.columns(), 4);
        assert_eq!(m.size(), 12);
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn from_2d_rejects_empty() {
        let empty: Vec<Vec<f64>> = vec![];
        let err = Matrix::from_2d(&empty).unwrap_err();
        assert_eq!(
            err,
            MatrixError::InvalidArgument {
                reason: "Data must be a 2D array with at least one element"
            }
        );
        let no_cols: Vec<Vec<f64>> = vec![vec![]];
        assert!(Matrix::from_2d(&no_cols).is_err());
    }

    #[test]
    fn from_2d_ragged() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Matrix::from_2d(&ragged).unwrap_err();
        assert_eq!(err, MatrixError::mismatch((2, 2), (2, 1)));
    }

    #[test]
    fn from_1d_array_is_row_major() {
        let m = Matrix::from_1d_array(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.get(0, 2), 3);
        assert_eq!(m.get(1, 0), 4);
        assert_eq!(m.row_slice(1), &[4, 5, 6]);
    }

    #[test]
    fn from_1d_array_wrong_length() {
        let err = Matrix::from_1d_array(2, 2, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
    }

    #[test]
    fn eye_rectangular() {
        let m = Matrix::<f64>::eye_with(2, 3, 1.0);
        for i in 0..2 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(m[(i, j)], expected);
            }
        }
    }

    #[test]
    fn diag_truncates() {
        let m = Matrix::diag_with(&[1, 2, 3], 2, 2);
        assert_eq!(m.to_2d_array(), vec![vec![1, 0], vec![0, 2]]);
        let sq = Matrix::diag(&[4.0, 5.0]);
        assert_eq!(sq[(1, 1)], 5.0);
        assert_eq!(sq[(0, 1)], 0.0);
    }

    #[test]
    fn vectors() {
        let r = Matrix::row_vector(&[1.0, 2.0, 3.0]);
        assert_eq!((r.rows(), r.columns()), (1, 3));
        let c = Matrix::column_vector(&[1.0, 2.0, 3.0]);
        assert_eq!((c.rows(), c.columns()), (3, 1));
        assert_eq!(c[(2, 0)], 3.0);
    }

    #[test]
    fn rand_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let m = Matrix::<f64>::rand_with(5, 5, &mut rng);
        assert!(m.as_slice().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn rand_int_rejects_bad_range() {
        let opts = RandIntOptions { min: 10, max: 2 };
        let err = Matrix::<i64>::rand_int(2, 2, opts).unwrap_err();
        assert_eq!(
            err,
            MatrixError::InvalidConfiguration {
                reason: "min must be smaller than max"
            }
        );
        let negative = RandIntOptions { min: -5, max: 5 };
        assert!(Matrix::<u32>::rand_int(2, 2, negative).is_err());
    }

    #[test]
    fn rand_int_default_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let m = Matrix::<i32>::rand_int_with(10, 10, RandIntOptions::default(), &mut rng).unwrap();
        assert!(m.as_slice().iter().all(|&x| (0..1000).contains(&x)));
    }

    #[test]
    fn set_chains() {
        let mut m = Matrix::<i32>::new(2, 2);
        m.set(0, 0, 1).set(1, 1, 2);
        assert_eq!(m.as_slice(), &[1, 0, 0, 2]);
    }

    #[test]
    fn matrix_ref_trait() {
        let m = Matrix::from_1d_array(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        fn trace<T: Scalar>(m: &impl MatrixRef<T>) -> T {
            let mut sum = T::zero();
            for i in 0..m.nrows().min(m.ncols()) {
                sum = sum + *m.get(i, i);
            }
            sum
        }
        assert_eq!(trace(&m), 5.0);
    }

    #[test]
    fn matrix_mut_trait() {
        let mut m = Matrix::<f64>::new(2, 2);
        fn set_diag<T: Scalar>(m: &mut impl MatrixMut<T>, val: T) {
            for i in 0..m.nrows().min(m.ncols()) {
                *m.get_mut(i, i) = val;
            }
        }
        set_diag(&mut m, 7.0);
        assert_eq!(m[(0, 0)], 7.0);
        assert_eq!(m[(1, 1)], 7.0);
        assert_eq!(m[(0, 1)], 0.0);
    }

    #[test]
    fn check_matrix_is_idempotent() {
        let m = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let a = Matrix::check_matrix(&m).unwrap();
        assert_eq!(a, m);
        let b = Matrix::check_matrix([[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(b, m);
    }
}
