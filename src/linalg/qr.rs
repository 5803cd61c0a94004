use crate::error::{MatrixError, Result};
use crate::linalg::hypotenuse;
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixRef};

/// QR decomposition by Householder reflections, `A = Q·R`.
///
/// The working matrix keeps the reflection vectors below the diagonal and
/// the strict upper part of `R` above it; the diagonal of `R` is stored
/// separately. Each reflection takes the sign opposite to the current
/// diagonal entry.
///
/// For an `m x n` input with `m >= n`, [`solve`](Self::solve) returns the
/// least-squares solution.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::QrDecomposition;
///
/// let a = Matrix::from_2d(&[[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
/// let qr = QrDecomposition::new(&a);
/// assert!(qr.is_full_rank());
/// let x = qr.solve(&Matrix::column_vector(&[1.0, 2.0, 3.0])).unwrap();
/// assert_eq!((x.rows(), x.columns()), (2, 1));
/// assert!(x[(0, 0)].abs() < 1e-12);
/// assert!((x[(1, 0)] - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    qr: Matrix<T>,
    rdiag: Vec<T>,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Factor `a` (any shape).
    pub fn new<M: MatrixRef<T> + ?Sized>(a: &M) -> Self {
        let mut qr = Matrix::copy_from(a);
        let (m, n) = (qr.rows(), qr.columns());
        let mut rdiag = vec![T::zero(); n];

        for k in 0..n {
            let mut nrm = T::zero();
            for i in k..m {
                nrm = hypotenuse(nrm, qr[(i, k)]);
            }
            if nrm != T::zero() {
                if qr[(k, k)] < T::zero() {
                    nrm = -nrm;
                }
                for i in k..m {
                    qr[(i, k)] = qr[(i, k)] / nrm;
                }
                qr[(k, k)] = qr[(k, k)] + T::one();

                for j in k + 1..n {
                    let mut s = T::zero();
                    for i in k..m {
                        s = s + qr[(i, k)] * qr[(i, j)];
                    }
                    s = -s / qr[(k, k)];
                    for i in k..m {
                        qr[(i, j)] = qr[(i, j)] + s * qr[(i, k)];
                    }
                }
            }
            rdiag[k] = -nrm;
        }

        Self { qr, rdiag }
    }

    /// `true` when no diagonal entry of `R` is exactly zero.
    pub fn is_full_rank(&self) -> bool {
        self.rdiag.iter().all(|&d| d != T::zero())
    }

    /// Least-squares solution of `A·X = B`, an `n x b.cols` matrix.
    ///
    /// Fails with `DimensionMismatch` when `b` does not have as many rows
    /// as `A`, and with `RankDeficient` when `R` has a zero on its diagonal.
    pub fn solve<M: MatrixRef<T> + ?Sized>(&self, b: &M) -> Result<Matrix<T>> {
        let (m, n) = (self.qr.rows(), self.qr.columns());
        if b.nrows() != m {
            return Err(MatrixError::mismatch((m, b.ncols()), (b.nrows(), b.ncols())));
        }
        if !self.is_full_rank() {
            return Err(MatrixError::RankDeficient);
        }

        let count = b.ncols();
        let mut x = Matrix::copy_from(b);

        // Y = Qᵗ·B
        for k in 0..n {
            for j in 0..count {
                let mut s = T::zero();
                for i in k..m {
                    s = s + self.qr[(i, k)] * x[(i, j)];
                }
                s = -s / self.qr[(k, k)];
                for i in k..m {
                    x[(i, j)] = x[(i, j)] + s * self.qr[(i, k)];
                }
            }
        }
        // R·X = Y
        for k in (0..n).rev() {
            for j in 0..count {
                x[(k, j)] = x[(k, j)] / self.rdiag[k];
            }
            for i in 0..k {
                let r = self.qr[(i, k)];
                for j in 0..count {
                    x[(i, j)] = x[(i, j)] - x[(k, j)] * r;
                }
            }
        }

        Ok(Matrix::from_fn(n, count, |i, j| x[(i, j)]))
    }

    /// Upper triangular factor `R`, `min(m, n) x n`.
    pub fn upper_triangular_matrix(&self) -> Matrix<T> {
        let k = self.qr.rows().min(self.qr.columns());
        Matrix::from_fn(k, self.qr.columns(), |i, j| {
            if i < j {
                self.qr[(i, j)]
            } else if i == j {
                self.rdiag[i]
            } else {
                T::zero()
            }
        })
    }

    /// Orthogonal factor `Q`, `m x min(m, n)` with orthonormal columns.
    pub fn orthogonal_matrix(&self) -> Matrix<T> {
        let m = self.qr.rows();
        let kn = m.min(self.qr.columns());
        let mut x = Matrix::new(m, kn);
        for k in (0..kn).rev() {
            x[(k, k)] = T::one();
            if self.qr[(k, k)] == T::zero() {
                continue;
            }
            for j in k..kn {
                let mut s = T::zero();
                for i in k..m {
                    s = s + self.qr[(i, k)] * x[(i, j)];
                }
                s = -s / self.qr[(k, k)];
                for i in k..m {
                    x[(i, j)] = x[(i, j)] + s * self.qr[(i, k)];
                }
            }
        }
        x
    }
}
