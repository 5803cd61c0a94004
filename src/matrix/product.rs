use log::debug;

use crate::error::{MatrixError, Result};
use crate::traits::Scalar;

use super::Matrix;

/// Block size at or below which [`Matrix::mmul_strassen`] uses the naive
/// product.
pub const STRASSEN_THRESHOLD: usize = 512;

impl<T: Scalar> Matrix<T> {
    /// Matrix product `self * other`.
    ///
    /// With the `parallel` feature the output rows are computed on the rayon
    /// thread pool.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::from_2d(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// let b = Matrix::from_2d(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]).unwrap();
    /// let c = a.mmul(&b).unwrap();
    /// assert_eq!(c.to_2d_array(), vec![vec![58.0, 64.0], vec![139.0, 154.0]]);
    /// assert!(a.mmul(&a).is_err());
    /// ```
    pub fn mmul(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if self.cols != other.rows {
            return Err(MatrixError::mismatch(
                (self.cols, other.cols),
                (other.rows, other.cols),
            ));
        }
        Ok(self.mmul_rows(other))
    }

    #[cfg(not(feature = "parallel"))]
    fn mmul_rows(&self, other: &Matrix<T>) -> Matrix<T> {
        self.mmul_unchecked(other)
    }

    #[cfg(feature = "parallel")]
    fn mmul_rows(&self, other: &Matrix<T>) -> Matrix<T> {
        use rayon::prelude::*;

        let n = self.cols;
        let p = other.cols;
        let mut data = vec![T::zero(); self.rows * p];
        if p > 0 {
            data.par_chunks_mut(p).enumerate().for_each(|(i, out)| {
                for k in 0..n {
                    let a_ik = self.data[i * n + k];
                    for (o, &b) in out.iter_mut().zip(other.row_slice(k)) {
                        *o = *o + a_ik * b;
                    }
                }
            });
        }
        Matrix {
            data,
            rows: self.rows,
            cols: p,
        }
    }

    /// Kronecker (tensor) product.
    ///
    /// ```
    /// use densela::Matrix;
    /// let a = Matrix::from_2d(&[[1, 2]]).unwrap();
    /// let b = Matrix::from_2d(&[[0, 1], [1, 0]]).unwrap();
    /// let k = a.kronecker_product(&b);
    /// assert_eq!(k.to_2d_array(), vec![vec![0, 1, 0, 2], vec![1, 0, 2, 0]]);
    /// ```
    pub fn kronecker_product(&self, other: &Matrix<T>) -> Matrix<T> {
        let (p, q) = (other.rows, other.cols);
        Matrix::from_fn(self.rows * p, self.cols * q, |r, c| {
            self.get(r / p, c / q) * other.get(r % p, c % q)
        })
    }

    /// Kronecker sum `A ⊗ I + I ⊗ B`; both operands must be square.
    pub fn kronecker_sum(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if !self.is_square() || !other.is_square() {
            return Err(MatrixError::NotSquare);
        }
        let left = self.kronecker_product(&Matrix::eye(other.rows));
        let right = Matrix::eye(self.rows).kronecker_product(other);
        Ok(&left + &right)
    }

    /// Zero-embed into a larger `rows x cols` matrix.
    fn embed(&self, rows: usize, cols: usize) -> Matrix<T> {
        let mut out = Matrix::new(rows, cols);
        out.paste(0, 0, self);
        out
    }

    /// Unchecked block write at `(i, j)`.
    fn paste(&mut self, i: usize, j: usize, src: &Matrix<T>) {
        for r in 0..src.rows {
            self.row_slice_mut(i + r)[j..j + src.cols].copy_from_slice(src.row_slice(r));
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Strassen block product.
    ///
    /// Operands are zero-padded to a common square size; blocks at or below
    /// [`STRASSEN_THRESHOLD`] fall back to [`mmul`](Self::mmul), and odd
    /// block sizes are padded to the next even size. The result equals
    /// `mmul` up to rounding.
    ///
    /// The block recursion forms differences of sub-blocks, which would
    /// underflow an unsigned element type, so unsigned matrices always take
    /// the naive product.
    pub fn mmul_strassen(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if self.cols != other.rows {
            return Err(MatrixError::mismatch(
                (self.cols, other.cols),
                (other.rows, other.cols),
            ));
        }
        let r = self.rows.max(self.cols).max(other.cols);
        if r <= STRASSEN_THRESHOLD {
            debug!("mmul_strassen: {}x{} block below threshold, using naive product", r, r);
            return self.mmul(other);
        }
        if !has_negatives::<T>() {
            debug!("mmul_strassen: unsigned element type, using naive product");
            return self.mmul(other);
        }
        let a = self.embed(r, r);
        let b = other.embed(r, r);
        let c = strassen(&a, &b);
        Ok(c.block(0, 0, self.rows, other.cols))
    }
}

/// Whether `T` can hold `-1`, i.e. block differences cannot underflow.
fn has_negatives<T: Scalar>() -> bool {
    T::from(-1_i8).is_some()
}

fn strassen<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let n = a.rows;
    if n <= STRASSEN_THRESHOLD {
        return a.mmul_rows(b);
    }
    if n % 2 == 1 {
        let c = strassen(&a.embed(n + 1, n + 1), &b.embed(n + 1, n + 1));
        return c.block(0, 0, n, n);
    }
    let h = n / 2;
    let a11 = a.block(0, 0, h, h);
    let a12 = a.block(0, h, h, h);
    let a21 = a.block(h, 0, h, h);
    let a22 = a.block(h, h, h, h);
    let b11 = b.block(0, 0, h, h);
    let b12 = b.block(0, h, h, h);
    let b21 = b.block(h, 0, h, h);
    let b22 = b.block(h, h, h, h);

    let m1 = strassen(&(&a11 + &a22), &(&b11 + &b22));
    let m2 = strassen(&(&a21 + &a22), &b11);
    let m3 = strassen(&a11, &(&b12 - &b22));
    let m4 = strassen(&a22, &(&b21 - &b11));
    let m5 = strassen(&(&a11 + &a12), &b22);
    let m6 = strassen(&(&a21 - &a11), &(&b11 + &b12));
    let m7 = strassen(&(&a12 - &a22), &(&b21 + &b22));

    let c11 = &(&(&m1 + &m4) - &m5) + &m7;
    let c12 = &m3 + &m5;
    let c21 = &m2 + &m4;
    let c22 = &(&(&m1 - &m2) + &m3) + &m6;

    let mut c = Matrix::new(n, n);
    c.paste(0, 0, &c11);
    c.paste(0, h, &c12);
    c.paste(h, 0, &c21);
    c.paste(h, h, &c22);
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mmul_identity() {
        let a = Matrix::from_fn(3, 4, |i, j| (i * 4 + j) as f64);
        let i3 = Matrix::<f64>::eye(3);
        assert_eq!(i3.mmul(&a).unwrap(), a);
    }

    #[test]
    fn mmul_mismatch() {
        let a = Matrix::<f64>::new(2, 3);
        let err = a.mmul(&Matrix::new(2, 2)).unwrap_err();
        assert_eq!(err, MatrixError::mismatch((3, 2), (2, 2)));
    }

    #[test]
    fn unsigned_types_skip_the_block_recursion() {
        assert!(!has_negatives::<u8>());
        assert!(!has_negatives::<u64>());
        assert!(has_negatives::<i32>());
        assert!(has_negatives::<f64>());

        // Above the threshold, but unsigned: must not form block differences.
        let a = Matrix::from_fn(STRASSEN_THRESHOLD + 1, 1, |i, _| (i % 7) as u32);
        let b = Matrix::from_fn(1, STRASSEN_THRESHOLD + 1, |_, j| (j % 5) as u32);
        assert_eq!(a.mmul_strassen(&b).unwrap(), a.mmul(&b).unwrap());

        let small = Matrix::from_2d(&[[1_u8, 2], [3, 4]]).unwrap();
        assert_eq!(
            small.mmul_strassen(&small).unwrap().as_slice(),
            &[7, 10, 15, 22]
        );
    }

    #[test]
    fn strassen_small_matches_naive() {
        let a = Matrix::from_fn(5, 3, |i, j| (i + 2 * j) as f64);
        let b = Matrix::from_fn(3, 4, |i, j| (i * j) as f64 - 1.0);
        assert_eq!(a.mmul_strassen(&b).unwrap(), a.mmul(&b).unwrap());
        assert!(a.mmul_strassen(&a).is_err());
    }

    #[test]
    fn strassen_recursive_matches_naive() {
        // 513 forces one odd padding step and one split
        let mut rng = StdRng::seed_from_u64(3);
        let a = Matrix::<i64>::rand_int_with(513, 40, Default::default(), &mut rng).unwrap();
        let b = Matrix::<i64>::rand_int_with(40, 7, Default::default(), &mut rng).unwrap();
        assert_eq!(a.mmul_strassen(&b).unwrap(), a.mmul(&b).unwrap());
    }

    #[test]
    fn kronecker() {
        let a = Matrix::from_2d(&[[1, 2], [3, 4]]).unwrap();
        let b = Matrix::<i32>::eye(2);
        let k = a.kronecker_product(&b);
        assert_eq!((k.rows(), k.columns()), (4, 4));
        assert_eq!(k[(2, 0)], 3);
        assert_eq!(k[(3, 1)], 3);
        assert_eq!(k[(2, 1)], 0);

        let s = a.kronecker_sum(&Matrix::from_2d(&[[10]]).unwrap()).unwrap();
        assert_eq!(s.to_2d_array(), vec![vec![11, 2], vec![3, 14]]);
        assert_eq!(
            a.kronecker_sum(&Matrix::new(1, 2)).unwrap_err(),
            MatrixError::NotSquare
        );
    }
}
