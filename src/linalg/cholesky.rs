use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixRef};

/// Cholesky decomposition `A = L·Lᵗ` of a symmetric matrix.
///
/// The input must be exactly symmetric. Positive definiteness is not
/// required up front: a non-positive pivot is clamped to zero before its
/// square root, the factorization is marked not positive definite, and
/// [`solve`](Self::solve) refuses it. Check
/// [`is_positive_definite`](Self::is_positive_definite) before trusting
/// `L` on such input.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::CholeskyDecomposition;
///
/// let a = Matrix::from_2d(&[[4.0_f64, 2.0], [2.0, 3.0]]).unwrap();
/// let chol = CholeskyDecomposition::new(&a).unwrap();
/// assert!(chol.is_positive_definite());
/// let l = chol.lower_triangular_matrix();
/// assert_eq!(l[(0, 0)], 2.0);
/// assert_eq!(l[(1, 0)], 1.0);
/// assert!((l[(1, 1)] - 2.0_f64.sqrt()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: Matrix<T>,
    positive_definite: bool,
}

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Factor `value`. Fails with `NotSymmetric` unless `value` equals its
    /// transpose.
    pub fn new<M: MatrixRef<T> + ?Sized>(value: &M) -> Result<Self> {
        let a = Matrix::copy_from(value);
        if !a.is_symmetric() {
            return Err(MatrixError::NotSymmetric);
        }

        let n = a.rows();
        let mut l = Matrix::new(n, n);
        let mut positive_definite = true;

        for j in 0..n {
            let mut d = T::zero();
            for k in 0..j {
                let mut s = T::zero();
                for i in 0..k {
                    s = s + l[(k, i)] * l[(j, i)];
                }
                s = (a[(j, k)] - s) / l[(k, k)];
                l[(j, k)] = s;
                d = d + s * s;
            }

            d = a[(j, j)] - d;
            positive_definite &= d > T::zero();
            l[(j, j)] = d.max(T::zero()).sqrt();
        }

        Ok(Self {
            l,
            positive_definite,
        })
    }

    pub fn is_positive_definite(&self) -> bool {
        self.positive_definite
    }

    /// Solve `A·X = B` by forward substitution with `L` and back
    /// substitution with `Lᵗ`.
    ///
    /// Fails with `DimensionMismatch` when `b` does not have as many rows
    /// as `A`, and with `NotPositiveDefinite` when the factorization is
    /// not positive definite.
    pub fn solve<M: MatrixRef<T> + ?Sized>(&self, b: &M) -> Result<Matrix<T>> {
        let l = &self.l;
        let n = l.rows();
        if b.nrows() != n {
            return Err(MatrixError::mismatch((n, b.ncols()), (b.nrows(), b.ncols())));
        }
        if !self.positive_definite {
            return Err(MatrixError::NotPositiveDefinite);
        }

        let count = b.ncols();
        let mut x = Matrix::copy_from(b);

        for k in 0..n {
            for j in 0..count {
                for i in 0..k {
                    x[(k, j)] = x[(k, j)] - x[(i, j)] * l[(k, i)];
                }
                x[(k, j)] = x[(k, j)] / l[(k, k)];
            }
        }
        for k in (0..n).rev() {
            for j in 0..count {
                for i in k + 1..n {
                    x[(k, j)] = x[(k, j)] - x[(i, j)] * l[(i, k)];
                }
                x[(k, j)] = x[(k, j)] / l[(k, k)];
            }
        }
        Ok(x)
    }

    pub fn lower_triangular_matrix(&self) -> &Matrix<T> {
        &self.l
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn spd_3x3() {
        let a = Matrix::from_2d(&[[4.0, 12.0, -16.0], [12.0, 37.0, -43.0], [-16.0, -43.0, 98.0]]).unwrap();
        let chol = CholeskyDecomposition::new(&a).unwrap();
        assert!(chol.is_positive_definite());
        let l = chol.lower_triangular_matrix();
        let expected = [[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_near(l[(i, j)], expected[i][j], 1e-12, &format!("L[{i}][{j}]"));
            }
        }
        let llt = l.mmul(&l.transpose()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_near(llt[(i, j)], a[(i, j)], 1e-10, "L*Lᵗ");
            }
        }
    }

    #[test]
    fn solve_spd() {
        let a = Matrix::from_2d(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
        let b = Matrix::column_vector(&[6.0, 5.0]);
        let x = CholeskyDecomposition::new(&a).unwrap().solve(&b).unwrap();
        assert_near(x[(0, 0)], 1.0, 1e-12, "x0");
        assert_near(x[(1, 0)], 1.0, 1e-12, "x1");
    }

    #[test]
    fn not_symmetric() {
        let a = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(CholeskyDecomposition::new(&a).unwrap_err(), MatrixError::NotSymmetric);
    }

    #[test]
    fn indefinite_is_flagged_not_rejected() {
        let a = Matrix::from_2d(&[[1.0, 5.0], [5.0, 1.0]]).unwrap();
        let chol = CholeskyDecomposition::new(&a).unwrap();
        assert!(!chol.is_positive_definite());
        assert_eq!(chol.lower_triangular_matrix()[(1, 1)], 0.0);
        assert_eq!(
            chol.solve(&Matrix::<f64>::eye(2)).unwrap_err(),
            MatrixError::NotPositiveDefinite
        );
    }

    #[test]
    fn solve_checks_rows() {
        let chol = CholeskyDecomposition::new(&Matrix::<f64>::eye(2)).unwrap();
        assert!(matches!(
            chol.solve(&Matrix::<f64>::new(3, 2)).unwrap_err(),
            MatrixError::DimensionMismatch { .. }
        ));
    }
}
