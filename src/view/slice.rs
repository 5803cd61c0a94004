use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// A flat row-major buffer seen as a matrix, without copying.
///
/// Built with [`wrap_1d`]. `S` is any owner or borrow of a `[T]`
/// (`&[T]`, `&mut [T]`, `Vec<T>`); a mutable `S` makes the wrapper
/// [`MatrixMut`].
#[derive(Debug, Clone)]
pub struct MatrixSlice<S> {
    data: S,
    rows: usize,
    cols: usize,
}

/// Wrap a flat row-major buffer as a `rows x (len / rows)` matrix.
///
/// ```
/// use densela::{wrap_1d, Matrix, MatrixRef};
/// use densela::linalg::LuDecomposition;
///
/// let data = [4.0_f64, 3.0, 6.0, 3.0];
/// let a = wrap_1d(&data[..], 2).unwrap();
/// assert_eq!(*a.get(1, 0), 6.0);
/// let lu = LuDecomposition::new(&a);
/// assert!((lu.determinant().unwrap() - -6.0).abs() < 1e-12);
/// ```
pub fn wrap_1d<T, S: Deref<Target = [T]>>(data: S, rows: usize) -> Result<MatrixSlice<S>> {
    if data.is_empty() {
        return Err(MatrixError::TypeArgument {
            reason: "data must contain at least one element",
        });
    }
    if rows == 0 || data.len() % rows != 0 {
        return Err(MatrixError::InvalidArgument {
            reason: "the data length is not divisible by the number of rows",
        });
    }
    let cols = data.len() / rows;
    Ok(MatrixSlice { data, rows, cols })
}

impl<T: Scalar, S: Deref<Target = [T]>> MatrixSlice<S> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.cols
    }

    /// Copy into an owned matrix.
    pub fn to_matrix(&self) -> Matrix<T> {
        Matrix::copy_from(self)
    }

    /// Give back the wrapped buffer.
    pub fn into_inner(self) -> S {
        self.data
    }
}

impl<T: Scalar, S: Deref<Target = [T]>> MatrixRef<T> for MatrixSlice<S> {
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

impl<T: Scalar, S: DerefMut<Target = [T]>> MatrixMut<T> for MatrixSlice<S> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.cols + col]
    }
}

/// A slice of equally long rows seen as a matrix, without copying.
///
/// Built with [`wrap_2d`].
#[derive(Debug, Clone, Copy)]
pub struct NestedSlice<'a, T, R> {
    rows: &'a [R],
    cols: usize,
    _marker: PhantomData<T>,
}

/// Wrap a 2D array (slice of rows) as a matrix.
///
/// Fails with `TypeArgument` when there is no row and with
/// `DimensionMismatch` when the rows differ in length.
///
/// ```
/// use densela::{wrap_2d, MatrixRef};
/// let rows = vec![vec![1, 2, 3], vec![4, 5, 6]];
/// let w = wrap_2d(&rows).unwrap();
/// assert_eq!((w.nrows(), w.ncols()), (2, 3));
/// assert_eq!(*w.get(1, 2), 6);
/// ```
pub fn wrap_2d<T, R: AsRef<[T]>>(data: &[R]) -> Result<NestedSlice<'_, T, R>> {
    let Some(first) = data.first() else {
        return Err(MatrixError::TypeArgument {
            reason: "data must contain at least one row",
        });
    };
    let cols = first.as_ref().len();
    if let Some(bad) = data.iter().find(|r| r.as_ref().len() != cols) {
        return Err(MatrixError::mismatch(
            (data.len(), cols),
            (data.len(), bad.as_ref().len()),
        ));
    }
    Ok(NestedSlice {
        rows: data,
        cols,
        _marker: PhantomData,
    })
}

impl<T: Scalar, R: AsRef<[T]>> NestedSlice<'_, T, R> {
    /// Copy into an owned matrix.
    pub fn to_matrix(&self) -> Matrix<T> {
        Matrix::copy_from(self)
    }
}

impl<T: Scalar, R: AsRef<[T]>> MatrixRef<T> for NestedSlice<'_, T, R> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.rows[row].as_ref()[col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_1d_shapes() {
        let data = [1, 2, 3, 4, 5, 6];
        let w = wrap_1d(&data[..], 3).unwrap();
        assert_eq!((w.rows(), w.columns()), (3, 2));
        assert_eq!(*w.get(2, 1), 6);
        assert_eq!(w.to_matrix().row_slice(1), &[3, 4]);
        assert!(wrap_1d(&data[..], 4).is_err());
        let empty: [i32; 0] = [];
        assert!(matches!(
            wrap_1d(&empty[..], 1).unwrap_err(),
            MatrixError::TypeArgument { .. }
        ));
    }

    #[test]
    fn wrap_1d_writes_through() {
        let mut data = vec![0.0_f64; 4];
        {
            let mut w = wrap_1d(&mut data[..], 2).unwrap();
            *w.get_mut(1, 0) = 5.0;
        }
        assert_eq!(data, vec![0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn wrap_2d_checks_rows() {
        let ragged = vec![vec![1.0], vec![2.0, 3.0]];
        assert!(wrap_2d(&ragged).is_err());
        let none: Vec<Vec<f64>> = vec![];
        assert!(wrap_2d(&none).is_err());
        let arrays = [[1.0, 2.0], [3.0, 4.0]];
        let w = wrap_2d(&arrays).unwrap();
        assert_eq!(w.to_matrix(), Matrix::from_2d(&arrays).unwrap());
    }
}
