use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixRef};

/// LU decomposition with partial pivoting, `P·A = L·U`.
///
/// Computed with Crout's "dot product" ordering: each column is updated
/// with the previously finished columns, then the entry of largest
/// magnitude on or below the diagonal is swapped into the pivot position.
/// On ties the first (lowest row) candidate wins.
///
/// Construction never fails. A singular input still produces a
/// factorization; [`is_singular`](Self::is_singular) tells you, and
/// [`solve`](Self::solve) refuses to use it.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::LuDecomposition;
///
/// let a = Matrix::from_2d(&[[2.0_f64, 1.0], [4.0, 3.0]]).unwrap();
/// let lu = LuDecomposition::new(&a);
/// assert!(!lu.is_singular());
/// assert!((lu.determinant().unwrap() - 2.0).abs() < 1e-12);
///
/// let b = Matrix::column_vector(&[3.0, 7.0]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: Matrix<T>,
    piv: Vec<usize>,
    pivot_sign: T,
}

impl<T: FloatScalar> LuDecomposition<T> {
    /// Factor `a` (any shape).
    pub fn new<M: MatrixRef<T> + ?Sized>(a: &M) -> Self {
        let mut lu = Matrix::copy_from(a);
        let (rows, cols) = (lu.rows(), lu.columns());
        let mut piv: Vec<usize> = (0..rows).collect();
        let mut pivot_sign = T::one();
        let mut col_j = vec![T::zero(); rows];

        for j in 0..cols {
            for (i, c) in col_j.iter_mut().enumerate() {
                *c = lu[(i, j)];
            }

            for i in 0..rows {
                let kmax = i.min(j);
                let mut s = T::zero();
                for k in 0..kmax {
                    s = s + lu[(i, k)] * col_j[k];
                }
                col_j[i] = col_j[i] - s;
                lu[(i, j)] = col_j[i];
            }

            let mut p = j;
            for i in j + 1..rows {
                if col_j[i].abs() > col_j[p].abs() {
                    p = i;
                }
            }

            if p != j {
                for k in 0..cols {
                    let t = lu[(p, k)];
                    lu[(p, k)] = lu[(j, k)];
                    lu[(j, k)] = t;
                }
                piv.swap(p, j);
                pivot_sign = -pivot_sign;
            }

            if j < rows && lu[(j, j)] != T::zero() {
                let d = lu[(j, j)];
                for i in j + 1..rows {
                    lu[(i, j)] = lu[(i, j)] / d;
                }
            }
        }

        Self {
            lu,
            piv,
            pivot_sign,
        }
    }

    /// The packed factors: `U` on and above the diagonal, `L` strictly below.
    pub fn lu(&self) -> &Matrix<T> {
        &self.lu
    }

    /// `true` when some diagonal entry of `U` is exactly zero.
    pub fn is_singular(&self) -> bool {
        let n = self.lu.rows().min(self.lu.columns());
        (0..n).any(|j| self.lu[(j, j)] == T::zero())
    }

    /// Solve `A·X = B`.
    ///
    /// Fails with `DimensionMismatch` when `b` does not have as many rows
    /// as `A`, and with `Singular` when the factorization is singular.
    pub fn solve<M: MatrixRef<T> + ?Sized>(&self, b: &M) -> Result<Matrix<T>> {
        let rows = self.lu.rows();
        if b.nrows() != rows {
            return Err(MatrixError::mismatch((rows, b.ncols()), (b.nrows(), b.ncols())));
        }
        if self.is_singular() {
            return Err(MatrixError::Singular);
        }

        let count = b.ncols();
        let mut x = Matrix::from_fn(rows, count, |i, j| *b.get(self.piv[i], j));
        let n = rows.min(self.lu.columns());

        // L·Y = P·B
        for k in 0..n {
            for i in k + 1..n {
                let l = self.lu[(i, k)];
                for j in 0..count {
                    x[(i, j)] = x[(i, j)] - x[(k, j)] * l;
                }
            }
        }
        // U·X = Y
        for k in (0..n).rev() {
            let d = self.lu[(k, k)];
            for j in 0..count {
                x[(k, j)] = x[(k, j)] / d;
            }
            for i in 0..k {
                let u = self.lu[(i, k)];
                for j in 0..count {
                    x[(i, j)] = x[(i, j)] - x[(k, j)] * u;
                }
            }
        }
        Ok(x)
    }

    /// `det(A)`, the product of the diagonal of `U` times the pivot sign.
    ///
    /// Fails with `NotSquare` for a rectangular input.
    pub fn determinant(&self) -> Result<T> {
        if !self.lu.is_square() {
            return Err(MatrixError::NotSquare);
        }
        let mut det = self.pivot_sign;
        for j in 0..self.lu.columns() {
            det = det * self.lu[(j, j)];
        }
        Ok(det)
    }

    /// Unit lower triangular factor `L`, `rows x min(rows, cols)`.
    pub fn lower_triangular_matrix(&self) -> Matrix<T> {
        let k = self.lu.rows().min(self.lu.columns());
        Matrix::from_fn(self.lu.rows(), k, |i, j| {
            if i > j {
                self.lu[(i, j)]
            } else if i == j {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Upper triangular factor `U`, `min(rows, cols) x cols`.
    pub fn upper_triangular_matrix(&self) -> Matrix<T> {
        let k = self.lu.rows().min(self.lu.columns());
        Matrix::from_fn(k, self.lu.columns(), |i, j| {
            if i <= j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        })
    }

    /// Row `i` of `L·U` is row `pivot_permutation_vector()[i]` of `A`.
    pub fn pivot_permutation_vector(&self) -> &[usize] {
        &self.piv
    }

    /// `+1` or `-1` depending on the parity of the row swaps.
    pub fn pivot_sign(&self) -> T {
        self.pivot_sign
    }
}
