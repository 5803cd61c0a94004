use core::cmp::Ordering;

use crate::error::{MatrixError, Result};
use crate::traits::{MatrixRef, Scalar};

use super::Matrix;

// ── Index checks ────────────────────────────────────────────────────

impl<T> Matrix<T> {
    pub(crate) fn check_row_index(&self, index: usize) -> Result<()> {
        if index >= self.rows {
            return Err(MatrixError::out_of_range("Row index out of range"));
        }
        Ok(())
    }

    pub(crate) fn check_column_index(&self, index: usize) -> Result<()> {
        if index >= self.cols {
            return Err(MatrixError::out_of_range("Column index out of range"));
        }
        Ok(())
    }

    fn check_range(&self, start_row: usize, end_row: usize, start_col: usize, end_col: usize) -> Result<()> {
        if start_row > end_row
            || start_col > end_col
            || end_row >= self.rows
            || end_col >= self.cols
        {
            return Err(MatrixError::out_of_range("Submatrix indices are out of range"));
        }
        Ok(())
    }
}

// ── Rows, columns, diagonal ─────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Copy of row `index`.
    pub fn get_row(&self, index: usize) -> Result<Vec<T>> {
        self.check_row_index(index)?;
        Ok(self.row_slice(index).to_vec())
    }

    /// Row `index` as a `1 x cols` matrix.
    pub fn get_row_vector(&self, index: usize) -> Result<Matrix<T>> {
        Ok(Matrix::row_vector(&self.get_row(index)?))
    }

    /// Copy of column `index`.
    pub fn get_column(&self, index: usize) -> Result<Vec<T>> {
        self.check_column_index(index)?;
        Ok((0..self.rows).map(|i| self.get(i, index)).collect())
    }

    /// Column `index` as a `rows x 1` matrix.
    pub fn get_column_vector(&self, index: usize) -> Result<Matrix<T>> {
        Ok(Matrix::column_vector(&self.get_column(index)?))
    }

    /// Overwrite row `index`; `values.len()` must equal the column count.
    pub fn set_row(&mut self, index: usize, values: &[T]) -> Result<&mut Self> {
        self.check_row_index(index)?;
        if values.len() != self.cols {
            return Err(MatrixError::mismatch((1, self.cols), (1, values.len())));
        }
        self.row_slice_mut(index).copy_from_slice(values);
        Ok(self)
    }

    /// Overwrite column `index`; `values.len()` must equal the row count.
    pub fn set_column(&mut self, index: usize, values: &[T]) -> Result<&mut Self> {
        self.check_column_index(index)?;
        if values.len() != self.rows {
            return Err(MatrixError::mismatch((self.rows, 1), (values.len(), 1)));
        }
        for (i, &v) in values.iter().enumerate() {
            self[(i, index)] = v;
        }
        Ok(self)
    }

    /// Main diagonal, `min(rows, cols)` entries.
    pub fn diag_vector(&self) -> Vec<T> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Nested row arrays.
    pub fn to_2d_array(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|i| self.row_slice(i).to_vec()).collect()
    }

    /// Flat row-major copy.
    pub fn to_1d_array(&self) -> Vec<T> {
        self.data.clone()
    }
}

// ── Transpose and sub-matrices ──────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Materialized transpose.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_2d(&[[1, 2, 3], [4, 5, 6]]).unwrap();
    /// let t = m.transpose();
    /// assert_eq!((t.rows(), t.columns()), (3, 2));
    /// assert_eq!(t[(2, 0)], 3);
    /// ```
    pub fn transpose(&self) -> Matrix<T> {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.get(j, i))
    }

    /// Unchecked copy of the `rows x cols` block at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub(crate) fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Matrix<T> {
        assert!(
            i + rows <= self.rows && j + cols <= self.cols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.rows, self.cols,
        );
        Matrix::from_fn(rows, cols, |r, c| self.get(i + r, j + c))
    }

    /// Copy of rows `start_row..=end_row` and columns `start_col..=end_col`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let b = m.sub_matrix(1, 2, 1, 2).unwrap();
    /// assert_eq!(b.to_2d_array(), vec![vec![4.0, 5.0], vec![7.0, 8.0]]);
    /// assert!(m.sub_matrix(1, 3, 0, 0).is_err());
    /// ```
    pub fn sub_matrix(
        &self,
        start_row: usize,
        end_row: usize,
        start_col: usize,
        end_col: usize,
    ) -> Result<Matrix<T>> {
        self.check_range(start_row, end_row, start_col, end_col)?;
        Ok(self.block(
            start_row,
            start_col,
            end_row - start_row + 1,
            end_col - start_col + 1,
        ))
    }

    /// Rows picked by `indices`, restricted to columns `start_col..=end_col`.
    pub fn sub_matrix_row(&self, indices: &[usize], start_col: usize, end_col: usize) -> Result<Matrix<T>> {
        if start_col > end_col || end_col >= self.cols {
            return Err(MatrixError::out_of_range("Column index out of range"));
        }
        for &i in indices {
            self.check_row_index(i)?;
        }
        Ok(Matrix::from_fn(indices.len(), end_col - start_col + 1, |r, c| {
            self.get(indices[r], start_col + c)
        }))
    }

    /// Columns picked by `indices`, restricted to rows `start_row..=end_row`.
    pub fn sub_matrix_column(&self, indices: &[usize], start_row: usize, end_row: usize) -> Result<Matrix<T>> {
        if start_row > end_row || end_row >= self.rows {
            return Err(MatrixError::out_of_range("Row index out of range"));
        }
        for &j in indices {
            self.check_column_index(j)?;
        }
        Ok(Matrix::from_fn(end_row - start_row + 1, indices.len(), |r, c| {
            self.get(start_row + r, indices[c])
        }))
    }

    /// Paste `source` with its top-left corner at `(start_row, start_col)`.
    ///
    /// ```
    /// use densela::Matrix;
    /// let mut m = Matrix::<f64>::zeros(3, 3);
    /// let patch = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// m.set_sub_matrix(&patch, 1, 1).unwrap();
    /// assert_eq!(m[(2, 2)], 4.0);
    /// assert!(m.set_sub_matrix(&patch, 2, 0).is_err());
    /// ```
    pub fn set_sub_matrix<M: MatrixRef<T> + ?Sized>(
        &mut self,
        source: &M,
        start_row: usize,
        start_col: usize,
    ) -> Result<&mut Self> {
        let (rows, cols) = (source.nrows(), source.ncols());
        if rows == 0 || cols == 0 {
            return Ok(self);
        }
        self.check_range(start_row, start_row + rows - 1, start_col, start_col + cols - 1)?;
        for r in 0..rows {
            for c in 0..cols {
                self[(start_row + r, start_col + c)] = *source.get(r, c);
            }
        }
        Ok(self)
    }

    /// Copy of the rows and columns picked by the two index lists, in order.
    pub fn selection(&self, row_indices: &[usize], col_indices: &[usize]) -> Result<Matrix<T>> {
        if row_indices.iter().any(|&i| i >= self.rows) {
            return Err(MatrixError::out_of_range("Row indices are out of range"));
        }
        if col_indices.iter().any(|&j| j >= self.cols) {
            return Err(MatrixError::out_of_range("Column indices are out of range"));
        }
        Ok(Matrix::from_fn(row_indices.len(), col_indices.len(), |r, c| {
            self.get(row_indices[r], col_indices[c])
        }))
    }
}

// ── In-place structural edits ───────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.check_row_index(a)?;
        self.check_row_index(b)?;
        if a != b {
            let cols = self.cols;
            for j in 0..cols {
                self.data.swap(a * cols + j, b * cols + j);
            }
        }
        Ok(self)
    }

    pub fn swap_columns(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.check_column_index(a)?;
        self.check_column_index(b)?;
        if a != b {
            let cols = self.cols;
            for i in 0..self.rows {
                self.data.swap(i * cols + a, i * cols + b);
            }
        }
        Ok(self)
    }

    /// Insert `row` before row `index` (`index == rows` appends).
    ///
    /// ```
    /// use densela::Matrix;
    /// let mut m = Matrix::from_2d(&[[1, 2], [5, 6]]).unwrap();
    /// m.add_row(1, &[3, 4]).unwrap();
    /// assert_eq!(m.to_2d_array(), vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
    /// ```
    pub fn add_row(&mut self, index: usize, row: &[T]) -> Result<&mut Self> {
        if index > self.rows {
            return Err(MatrixError::out_of_range("Row index out of range"));
        }
        if row.len() != self.cols {
            return Err(MatrixError::mismatch((1, self.cols), (1, row.len())));
        }
        let at = index * self.cols;
        self.data.splice(at..at, row.iter().copied());
        self.rows += 1;
        Ok(self)
    }

    pub fn remove_row(&mut self, index: usize) -> Result<&mut Self> {
        self.check_row_index(index)?;
        if self.rows == 1 {
            return Err(MatrixError::out_of_range("A matrix cannot have less than one row"));
        }
        let at = index * self.cols;
        self.data.drain(at..at + self.cols);
        self.rows -= 1;
        Ok(self)
    }

    /// Insert `column` before column `index` (`index == cols` appends).
    pub fn add_column(&mut self, index: usize, column: &[T]) -> Result<&mut Self> {
        if index > self.cols {
            return Err(MatrixError::out_of_range("Column index out of range"));
        }
        if column.len() != self.rows {
            return Err(MatrixError::mismatch((self.rows, 1), (column.len(), 1)));
        }
        let new_cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * new_cols);
        for (i, &v) in column.iter().enumerate() {
            let row = self.row_slice(i);
            data.extend_from_slice(&row[..index]);
            data.push(v);
            data.extend_from_slice(&row[index..]);
        }
        self.data = data;
        self.cols = new_cols;
        Ok(self)
    }

    pub fn remove_column(&mut self, index: usize) -> Result<&mut Self> {
        self.check_column_index(index)?;
        if self.cols == 1 {
            return Err(MatrixError::out_of_range("A matrix cannot have less than one column"));
        }
        let cols = self.cols;
        let mut k = 0;
        self.data.retain(|_| {
            let keep = k % cols != index;
            k += 1;
            keep
        });
        self.cols -= 1;
        Ok(self)
    }

    /// Reverse the element order inside every row.
    pub fn flip_rows(&mut self) -> &mut Self {
        for i in 0..self.rows {
            self.row_slice_mut(i).reverse();
        }
        self
    }

    /// Reverse the element order inside every column.
    pub fn flip_columns(&mut self) -> &mut Self {
        let (rows, cols) = (self.rows, self.cols);
        for i in 0..rows / 2 {
            for j in 0..cols {
                self.data.swap(i * cols + j, (rows - 1 - i) * cols + j);
            }
        }
        self
    }

    /// Tile the matrix `row_times` down and `col_times` across.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_2d(&[[1, 2]]).unwrap();
    /// let r = m.repeat(2, 2);
    /// assert_eq!(r.to_2d_array(), vec![vec![1, 2, 1, 2], vec![1, 2, 1, 2]]);
    /// ```
    pub fn repeat(&self, row_times: usize, col_times: usize) -> Matrix<T> {
        Matrix::from_fn(self.rows * row_times, self.cols * col_times, |i, j| {
            self.get(i % self.rows, j % self.cols)
        })
    }

    /// Sort the values inside every row with `compare`.
    pub fn sort_rows_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) -> &mut Self {
        for i in 0..self.rows {
            self.row_slice_mut(i).sort_by(&mut compare);
        }
        self
    }

    /// Sort the values inside every row ascending. Incomparable values
    /// (NaN) compare equal.
    pub fn sort_rows(&mut self) -> &mut Self {
        self.sort_rows_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// Sort the values inside every column with `compare`.
    pub fn sort_columns_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) -> &mut Self {
        let cols = self.cols;
        for j in 0..cols {
            let mut column: Vec<T> = (0..self.rows).map(|i| self.get(i, j)).collect();
            column.sort_by(&mut compare);
            for (i, v) in column.into_iter().enumerate() {
                self.data[i * cols + j] = v;
            }
        }
        self
    }

    /// Sort the values inside every column ascending.
    pub fn sort_columns(&mut self) -> &mut Self {
        self.sort_columns_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }
}
