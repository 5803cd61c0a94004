use crate::traits::FloatScalar;

use super::Matrix;

impl<T: FloatScalar> Matrix<T> {
    /// Row echelon form by Gaussian elimination.
    ///
    /// Pivots on the largest absolute value in the current column, divides
    /// the pivot row so the leading entry is `1` and clears the entries
    /// below it. Columns with no non-zero candidate are skipped.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_2d(&[[1.0, 2.0], [4.0, 6.0]]).unwrap();
    /// let e = m.echelon_form();
    /// assert!(e.is_echelon_form());
    /// assert_eq!(e.get_row(0).unwrap(), vec![1.0, 1.5]);
    /// ```
    pub fn echelon_form(&self) -> Matrix<T> {
        let mut result = self.clone();
        let (rows, cols) = (self.rows, self.cols);
        let (mut h, mut k) = (0, 0);
        while h < rows && k < cols {
            let mut i_max = h;
            for i in h + 1..rows {
                if result.get(i, k).abs() > result.get(i_max, k).abs() {
                    i_max = i;
                }
            }
            if result.get(i_max, k) == T::zero() {
                k += 1;
                continue;
            }
            if i_max != h {
                for j in 0..cols {
                    result.data.swap(h * cols + j, i_max * cols + j);
                }
            }
            let pivot = result.get(h, k);
            for j in k..cols {
                result[(h, j)] = result[(h, j)] / pivot;
            }
            result[(h, k)] = T::one();
            for i in h + 1..rows {
                let factor = result.get(i, k);
                result[(i, k)] = T::zero();
                for j in k + 1..cols {
                    result[(i, j)] = result[(i, j)] - result[(h, j)] * factor;
                }
            }
            h += 1;
            k += 1;
        }
        result
    }

    /// Reduced row echelon form: the echelon form with every pivot column
    /// cleared above its pivot as well.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_2d(&[[2.0, 4.0, 2.0], [1.0, 3.0, 2.0]]).unwrap();
    /// let r = m.reduced_echelon_form();
    /// assert!(r.is_reduced_echelon_form());
    /// assert_eq!(r.to_2d_array(), vec![vec![1.0, 0.0, -1.0], vec![0.0, 1.0, 1.0]]);
    /// ```
    pub fn reduced_echelon_form(&self) -> Matrix<T> {
        let mut result = self.echelon_form();
        let cols = self.cols;
        for h in (0..self.rows).rev() {
            let Some(p) = result.row_slice(h).iter().position(|&x| x != T::zero()) else {
                continue;
            };
            for i in 0..h {
                let factor = result.get(i, p);
                if factor == T::zero() {
                    continue;
                }
                for j in p..cols {
                    result[(i, j)] = result[(i, j)] - factor * result[(h, j)];
                }
                result[(i, p)] = T::zero();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn rank_deficient_rows() {
        let m = Matrix::from_2d(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 0.0, 1.0]]).unwrap();
        let e = m.echelon_form();
        assert!(e.is_echelon_form());
        assert_eq!(e.get_row(2).unwrap(), vec![0.0, 0.0, 0.0]);
        let r = m.reduced_echelon_form();
        assert!(r.is_reduced_echelon_form());
        assert_near(r[(0, 2)], 1.0, 1e-12, "r[0][2]");
        assert_near(r[(1, 2)], 1.0, 1e-12, "r[1][2]");
    }

    #[test]
    fn skips_zero_column() {
        let m = Matrix::from_2d(&[[0.0, 2.0], [0.0, 4.0]]).unwrap();
        let r = m.reduced_echelon_form();
        assert_eq!(r.to_2d_array(), vec![vec![0.0, 1.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn input_untouched() {
        let m = Matrix::from_2d(&[[3.0, 1.0], [1.0, 2.0]]).unwrap();
        let copy = m.clone();
        let _ = m.reduced_echelon_form();
        assert_eq!(m, copy);
    }
}
