//! Zero-copy windows onto a [`Matrix`].
//!
//! A [`MatrixView`] pairs a borrow of a base matrix with a [`Mapping`] that
//! translates view coordinates into base coordinates. Borrowing with
//! `&Matrix` gives a read-only view; borrowing with `&mut Matrix` lets
//! [`MatrixView::set`] write straight into the base.
//!
//! ```
//! use densela::{Matrix, MatrixView};
//!
//! let mut m = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! {
//!     let mut t = MatrixView::transpose(&mut m);
//!     t.set(0, 1, 9.0);
//! }
//! assert_eq!(m[(1, 0)], 9.0);
//! ```

mod slice;

pub use slice::{wrap_1d, wrap_2d, MatrixSlice, NestedSlice};

use core::ops::{Deref, DerefMut};

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Index translation applied by a [`MatrixView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    /// One row of the base, seen as a `1 x cols` matrix.
    Row(usize),
    /// One column of the base, seen as a `rows x 1` matrix.
    Column(usize),
    /// Rectangular block with its top-left corner at `(start_row, start_col)`.
    Sub {
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    },
    /// The base transposed.
    Transpose,
    /// Picked rows and picked columns, in the given order.
    Selection { rows: Vec<usize>, cols: Vec<usize> },
    /// Picked rows, all columns.
    RowSelection(Vec<usize>),
    /// All rows, picked columns.
    ColumnSelection(Vec<usize>),
    /// Rows in reverse order.
    FlipRow,
    /// Columns in reverse order.
    FlipColumn,
}

/// Non-owning window onto a matrix.
///
/// `B` is the borrow of the base: `&Matrix<T>` for a read-only view,
/// `&mut Matrix<T>` for a write-through view. Constructors validate their
/// indices and fail with `OutOfRange`; element access afterwards is
/// unchecked against the view shape, like [`Matrix::get`].
#[derive(Debug)]
pub struct MatrixView<B> {
    base: B,
    mapping: Mapping,
}

impl<T: Scalar, B: Deref<Target = Matrix<T>>> MatrixView<B> {
    fn with(base: B, mapping: Mapping) -> Self {
        Self { base, mapping }
    }

    /// Row `index` of `base`.
    pub fn row(base: B, index: usize) -> Result<Self> {
        if index >= base.rows() {
            return Err(MatrixError::out_of_range("Row index out of range"));
        }
        Ok(Self::with(base, Mapping::Row(index)))
    }

    /// Column `index` of `base`.
    pub fn column(base: B, index: usize) -> Result<Self> {
        if index >= base.columns() {
            return Err(MatrixError::out_of_range("Column index out of range"));
        }
        Ok(Self::with(base, Mapping::Column(index)))
    }

    /// Rows `start_row..=end_row`, columns `start_col..=end_col`.
    ///
    /// ```
    /// use densela::{Matrix, MatrixView};
    /// let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let v = MatrixView::sub(&m, 1, 2, 0, 1).unwrap();
    /// assert_eq!(v.get(1, 1), 7.0);
    /// assert!(MatrixView::sub(&m, 0, 3, 0, 0).is_err());
    /// ```
    pub fn sub(base: B, start_row: usize, end_row: usize, start_col: usize, end_col: usize) -> Result<Self> {
        if start_row > end_row
            || start_col > end_col
            || end_row >= base.rows()
            || end_col >= base.columns()
        {
            return Err(MatrixError::out_of_range("Submatrix indices are out of range"));
        }
        let mapping = Mapping::Sub {
            start_row,
            start_col,
            rows: end_row - start_row + 1,
            cols: end_col - start_col + 1,
        };
        Ok(Self::with(base, mapping))
    }

    pub fn transpose(base: B) -> Self {
        Self::with(base, Mapping::Transpose)
    }

    /// Rows `rows` and columns `cols` of `base`, in the given order.
    pub fn selection(base: B, rows: &[usize], cols: &[usize]) -> Result<Self> {
        check_rows(&base, rows)?;
        check_cols(&base, cols)?;
        let mapping = Mapping::Selection {
            rows: rows.to_vec(),
            cols: cols.to_vec(),
        };
        Ok(Self::with(base, mapping))
    }

    pub fn row_selection(base: B, rows: &[usize]) -> Result<Self> {
        check_rows(&base, rows)?;
        Ok(Self::with(base, Mapping::RowSelection(rows.to_vec())))
    }

    pub fn column_selection(base: B, cols: &[usize]) -> Result<Self> {
        check_cols(&base, cols)?;
        Ok(Self::with(base, Mapping::ColumnSelection(cols.to_vec())))
    }

    /// Base with its rows in reverse order.
    pub fn flip_row(base: B) -> Self {
        Self::with(base, Mapping::FlipRow)
    }

    /// Base with its columns in reverse order.
    pub fn flip_column(base: B) -> Self {
        Self::with(base, Mapping::FlipColumn)
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The viewed matrix.
    pub fn base(&self) -> &Matrix<T> {
        &self.base
    }

    pub fn rows(&self) -> usize {
        match &self.mapping {
            Mapping::Row(_) => 1,
            Mapping::Column(_) | Mapping::FlipRow | Mapping::FlipColumn | Mapping::ColumnSelection(_) => {
                self.base.rows()
            }
            Mapping::Sub { rows, .. } => *rows,
            Mapping::Transpose => self.base.columns(),
            Mapping::Selection { rows, .. } | Mapping::RowSelection(rows) => rows.len(),
        }
    }

    pub fn columns(&self) -> usize {
        match &self.mapping {
            Mapping::Column(_) => 1,
            Mapping::Row(_) | Mapping::FlipRow | Mapping::FlipColumn | Mapping::RowSelection(_) => {
                self.base.columns()
            }
            Mapping::Sub { cols, .. } => *cols,
            Mapping::Transpose => self.base.rows(),
            Mapping::Selection { cols, .. } | Mapping::ColumnSelection(cols) => cols.len(),
        }
    }

    /// Base coordinates of view element `(row, col)`.
    fn locate(&self, row: usize, col: usize) -> (usize, usize) {
        match &self.mapping {
            Mapping::Row(r) => (*r, col),
            Mapping::Column(c) => (row, *c),
            Mapping::Sub {
                start_row,
                start_col,
                ..
            } => (start_row + row, start_col + col),
            Mapping::Transpose => (col, row),
            Mapping::Selection { rows, cols } => (rows[row], cols[col]),
            Mapping::RowSelection(rows) => (rows[row], col),
            Mapping::ColumnSelection(cols) => (row, cols[col]),
            Mapping::FlipRow => (self.base.rows() - 1 - row, col),
            Mapping::FlipColumn => (row, self.base.columns() - 1 - col),
        }
    }

    /// Element at view coordinates `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> T {
        let (r, c) = self.locate(row, col);
        self.base.get(r, c)
    }

    /// Copy the visible elements into a new matrix.
    pub fn to_matrix(&self) -> Matrix<T> {
        Matrix::from_fn(self.rows(), self.columns(), |i, j| self.get(i, j))
    }
}

impl<T: Scalar, B: DerefMut<Target = Matrix<T>>> MatrixView<B> {
    /// Write `value` at view coordinates `(row, col)`, i.e. into the base.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> &mut Self {
        let (r, c) = self.locate(row, col);
        self.base.set(r, c, value);
        self
    }
}

fn check_rows<T>(base: &Matrix<T>, rows: &[usize]) -> Result<()> {
    if rows.iter().any(|&i| i >= base.rows()) {
        return Err(MatrixError::out_of_range("Row indices are out of range"));
    }
    Ok(())
}

fn check_cols<T>(base: &Matrix<T>, cols: &[usize]) -> Result<()> {
    if cols.iter().any(|&j| j >= base.columns()) {
        return Err(MatrixError::out_of_range("Column indices are out of range"));
    }
    Ok(())
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T: Scalar, B: Deref<Target = Matrix<T>>> MatrixRef<T> for MatrixView<B> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.columns()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        let (r, c) = self.locate(row, col);
        MatrixRef::get(&*self.base, r, c)
    }
}

impl<T: Scalar, B: DerefMut<Target = Matrix<T>>> MatrixMut<T> for MatrixView<B> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let (r, c) = self.locate(row, col);
        self.base.get_mut(r, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<i32> {
        Matrix::from_2d(&[[1, 2, 3], [4, 5, 6]]).unwrap()
    }

    #[test]
    fn row_and_column() {
        let m = sample();
        let r = MatrixView::row(&m, 1).unwrap();
        assert_eq!((r.rows(), r.columns()), (1, 3));
        assert_eq!(r.to_matrix().as_slice(), &[4, 5, 6]);
        let c = MatrixView::column(&m, 2).unwrap();
        assert_eq!(c.to_matrix().as_slice(), &[3, 6]);
        assert!(MatrixView::row(&m, 2).is_err());
        assert_eq!(
            MatrixView::column(&m, 3).unwrap_err(),
            MatrixError::out_of_range("Column index out of range")
        );
    }

    #[test]
    fn transpose_shape() {
        let m = sample();
        let t = MatrixView::transpose(&m);
        assert_eq!((t.rows(), t.columns()), (3, 2));
        assert_eq!(t.to_matrix(), m.transpose());
    }

    #[test]
    fn selections() {
        let m = sample();
        let s = MatrixView::selection(&m, &[1, 0], &[2]).unwrap();
        assert_eq!(s.to_matrix().as_slice(), &[6, 3]);
        let rs = MatrixView::row_selection(&m, &[1, 1]).unwrap();
        assert_eq!(rs.to_matrix().as_slice(), &[4, 5, 6, 4, 5, 6]);
        let cs = MatrixView::column_selection(&m, &[0, 2]).unwrap();
        assert_eq!(cs.to_matrix().as_slice(), &[1, 3, 4, 6]);
        assert_eq!(
            MatrixView::selection(&m, &[2], &[0]).unwrap_err(),
            MatrixError::out_of_range("Row indices are out of range")
        );
        assert!(MatrixView::column_selection(&m, &[3]).is_err());
    }

    #[test]
    fn flips() {
        let m = sample();
        let fr = MatrixView::flip_row(&m);
        assert_eq!(fr.to_matrix().as_slice(), &[4, 5, 6, 1, 2, 3]);
        let fc = MatrixView::flip_column(&m);
        assert_eq!(fc.to_matrix().as_slice(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn write_through_sub_view() {
        let mut m = sample();
        {
            let mut v = MatrixView::sub(&mut m, 0, 1, 1, 2).unwrap();
            v.set(1, 1, 60).set(0, 0, 20);
            *v.get_mut(0, 1) = 30;
        }
        assert_eq!(m.as_slice(), &[1, 20, 30, 4, 5, 60]);
    }

    #[test]
    fn views_feed_generic_code() {
        let m = sample();
        let v = MatrixView::column(&m, 1).unwrap();
        let copied = Matrix::copy_from(&v);
        assert_eq!(copied.as_slice(), &[2, 5]);
    }
}
