use crate::traits::Scalar;

use super::Matrix;

impl<T> Matrix<T> {
    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Whether the matrix has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn is_row_vector(&self) -> bool {
        self.rows == 1
    }

    #[inline]
    pub fn is_column_vector(&self) -> bool {
        self.cols == 1
    }

    /// Row or column vector.
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }
}

impl<T: Scalar> Matrix<T> {
    /// Square and exactly equal to its transpose.
    ///
    /// ```
    /// use densela::Matrix;
    /// let s = Matrix::from_2d(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
    /// assert!(s.is_symmetric());
    /// let r = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert!(!r.is_symmetric());
    /// ```
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in 0..i {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }

    /// Symmetric with an all-zero diagonal, the shape of a distance matrix.
    pub fn is_distance(&self) -> bool {
        self.is_symmetric() && (0..self.rows).all(|i| self.get(i, i) == T::zero())
    }

    /// Row echelon form: every non-zero row starts with a `1` strictly right
    /// of the previous row's leading `1`, and zero rows sit at the bottom.
    pub fn is_echelon_form(&self) -> bool {
        self.pivot_columns().is_some()
    }

    /// Echelon form where each pivot column is zero outside its pivot.
    ///
    /// ```
    /// use densela::Matrix;
    /// let r = Matrix::from_2d(&[[1.0, 0.0, 2.0], [0.0, 1.0, 3.0]]).unwrap();
    /// assert!(r.is_reduced_echelon_form());
    /// let e = Matrix::from_2d(&[[1.0, 4.0, 2.0], [0.0, 1.0, 3.0]]).unwrap();
    /// assert!(e.is_echelon_form());
    /// assert!(!e.is_reduced_echelon_form());
    /// ```
    pub fn is_reduced_echelon_form(&self) -> bool {
        let Some(pivots) = self.pivot_columns() else {
            return false;
        };
        pivots.iter().enumerate().all(|(row, &col)| {
            (0..self.rows).all(|i| i == row || self.get(i, col) == T::zero())
        })
    }

    /// Leading-one column of every non-zero row, or `None` when the matrix
    /// is not in echelon form.
    fn pivot_columns(&self) -> Option<Vec<usize>> {
        let mut pivots = Vec::new();
        let mut seen_zero_row = false;
        for i in 0..self.rows {
            match self.row_slice(i).iter().position(|&x| x != T::zero()) {
                None => seen_zero_row = true,
                Some(j) => {
                    if seen_zero_row || self.get(i, j) != T::one() {
                        return None;
                    }
                    if pivots.last().is_some_and(|&prev| j <= prev) {
                        return None;
                    }
                    pivots.push(j);
                }
            }
        }
        Some(pivots)
    }
}
