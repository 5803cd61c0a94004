use crate::error::{MatrixError, Result};
use crate::traits::{IntScalar, Scalar};

use super::Matrix;

/// Right-hand side of the dispatching elementwise methods (`add`, `sub`,
/// `mul`, `pow`, `and`, ...).
///
/// Built implicitly from a scalar of the element type or from a
/// `&Matrix<T>`, so one method covers both call shapes:
///
/// ```
/// use densela::Matrix;
/// let mut a = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// let b = Matrix::from_2d(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
/// a.add(10.0).unwrap().sub(&b).unwrap();
/// assert_eq!(a[(1, 1)], 13.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a, T> {
    Scalar(T),
    Matrix(&'a Matrix<T>),
}

impl<'a, T> From<&'a Matrix<T>> for Operand<'a, T> {
    fn from(m: &'a Matrix<T>) -> Self {
        Operand::Matrix(m)
    }
}

impl<'a, T> From<&'a mut Matrix<T>> for Operand<'a, T> {
    fn from(m: &'a mut Matrix<T>) -> Self {
        Operand::Matrix(m)
    }
}

macro_rules! impl_operand_from_scalar {
    ($($t:ty),*) => {
        $(
            impl<'a> From<$t> for Operand<'a, $t> {
                fn from(v: $t) -> Self {
                    Operand::Scalar(v)
                }
            }
        )*
    };
}

impl_operand_from_scalar!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T> Matrix<T> {
    /// `DimensionMismatch` unless `other` has the same shape.
    pub(crate) fn check_same_shape<U>(&self, other: &Matrix<U>) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MatrixError::mismatch(
                (self.rows, self.cols),
                (other.rows, other.cols),
            ));
        }
        Ok(())
    }
}

// ── Elementwise families: scalar / matrix / dispatch ────────────────

macro_rules! elementwise_family {
    (
        $bound:ident;
        $(
            $(#[$doc:meta])*
            $dispatch:ident, $scalar:ident, $matrix:ident => |$a:ident, $b:ident| $body:expr;
        )*
    ) => {
        impl<T: $bound> Matrix<T> {
            $(
                #[doc = concat!("Scalar form of [`", stringify!($dispatch), "`](Self::", stringify!($dispatch), ").")]
                pub fn $scalar(&mut self, value: T) -> &mut Self {
                    for x in self.data.iter_mut() {
                        let $a = *x;
                        let $b = value;
                        *x = $body;
                    }
                    self
                }

                #[doc = concat!("Matrix form of [`", stringify!($dispatch), "`](Self::", stringify!($dispatch), "). Shapes must match.")]
                pub fn $matrix(&mut self, other: &Matrix<T>) -> Result<&mut Self> {
                    self.check_same_shape(other)?;
                    for (x, &y) in self.data.iter_mut().zip(other.data.iter()) {
                        let $a = *x;
                        let $b = y;
                        *x = $body;
                    }
                    Ok(self)
                }

                $(#[$doc])*
                pub fn $dispatch<'a>(&mut self, value: impl Into<Operand<'a, T>>) -> Result<&mut Self>
                where
                    T: 'a,
                {
                    match value.into() {
                        Operand::Scalar(v) => Ok(self.$scalar(v)),
                        Operand::Matrix(m) => self.$matrix(m),
                    }
                }
            )*
        }
    };
}

elementwise_family! {
    Scalar;
    /// In-place elementwise addition of a scalar or a same-shaped matrix.
    add, add_scalar, add_matrix => |a, b| a + b;
    /// In-place elementwise subtraction. The matrix form is
    /// `sub_elementwise`; `sub_matrix` is the block copy.
    sub, sub_scalar, sub_elementwise => |a, b| a - b;
    /// In-place elementwise (Hadamard) multiplication. The matrix product is
    /// [`mmul`](Self::mmul).
    mul, mul_scalar, mul_matrix => |a, b| a * b;
    /// In-place elementwise division. Integer division by zero panics.
    div, div_scalar, div_matrix => |a, b| a / b;
    /// In-place elementwise remainder, sign of the dividend.
    rem, rem_scalar, rem_matrix => |a, b| a % b;
}

fn shift_amount<T: IntScalar>(n: T) -> u32 {
    let bits = T::zero().count_zeros();
    n.to_i64()
        .map_or(0, |v| v.rem_euclid(i64::from(bits)) as u32)
}

elementwise_family! {
    IntScalar;
    /// In-place bitwise AND.
    and, and_scalar, and_matrix => |a, b| a & b;
    /// In-place bitwise OR.
    or, or_scalar, or_matrix => |a, b| a | b;
    /// In-place bitwise XOR.
    xor, xor_scalar, xor_matrix => |a, b| a ^ b;
    /// In-place left shift. The shift count wraps modulo the bit width.
    left_shift, left_shift_scalar, left_shift_matrix => |a, b| a.unsigned_shl(shift_amount(b));
    /// In-place sign-propagating right shift.
    right_shift, right_shift_scalar, right_shift_matrix => |a, b| a.signed_shr(shift_amount(b));
    /// In-place zero-filling right shift.
    unsigned_right_shift, unsigned_right_shift_scalar, unsigned_right_shift_matrix => |a, b| a.unsigned_shr(shift_amount(b));
}

impl<T: IntScalar> Matrix<T> {
    /// In-place bitwise NOT.
    pub fn not(&mut self) -> &mut Self {
        for x in self.data.iter_mut() {
            *x = !*x;
        }
        self
    }
}

impl<T: Scalar> Matrix<T> {
    /// In-place negation, `x -> 0 - x`.
    pub fn neg(&mut self) -> &mut Self {
        for x in self.data.iter_mut() {
            *x = T::zero() - *x;
        }
        self
    }

    /// Multiply row `index` by `value` in place.
    pub fn mul_row(&mut self, index: usize, value: T) -> Result<&mut Self> {
        self.check_row_index(index)?;
        for x in self.row_slice_mut(index) {
            *x = *x * value;
        }
        Ok(self)
    }

    /// Multiply column `index` by `value` in place.
    pub fn mul_column(&mut self, index: usize, value: T) -> Result<&mut Self> {
        self.check_column_index(index)?;
        let cols = self.cols;
        for i in 0..self.rows {
            let x = &mut self.data[i * cols + index];
            *x = *x * value;
        }
        Ok(self)
    }
}

// ── Row / column vector broadcasts ──────────────────────────────────

macro_rules! vector_broadcast {
    ($($row_fn:ident, $col_fn:ident => |$a:ident, $b:ident| $body:expr;)*) => {
        impl<T: Scalar> Matrix<T> {
            $(
                #[doc = concat!("`", stringify!($row_fn), "`: combine every row with `vector` (length = columns).")]
                pub fn $row_fn(&mut self, vector: &[T]) -> Result<&mut Self> {
                    if vector.len() != self.cols {
                        return Err(MatrixError::mismatch((1, self.cols), (1, vector.len())));
                    }
                    let cols = self.cols;
                    for (k, x) in self.data.iter_mut().enumerate() {
                        let $a = *x;
                        let $b = vector[k % cols];
                        *x = $body;
                    }
                    Ok(self)
                }

                #[doc = concat!("`", stringify!($col_fn), "`: combine every column with `vector` (length = rows).")]
                pub fn $col_fn(&mut self, vector: &[T]) -> Result<&mut Self> {
                    if vector.len() != self.rows {
                        return Err(MatrixError::mismatch((self.rows, 1), (vector.len(), 1)));
                    }
                    let cols = self.cols;
                    for (k, x) in self.data.iter_mut().enumerate() {
                        let $a = *x;
                        let $b = vector[k / cols];
                        *x = $body;
                    }
                    Ok(self)
                }
            )*
        }
    };
}

vector_broadcast! {
    add_row_vector, add_column_vector => |a, b| a + b;
    sub_row_vector, sub_column_vector => |a, b| a - b;
    mul_row_vector, mul_column_vector => |a, b| a * b;
    div_row_vector, div_column_vector => |a, b| a / b;
}

// ── Element-wise addition ───────────────────────────────────────────

impl<T: Scalar> core::ops::Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "dimension mismatch: {}x{} + {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| a + b)
            .collect();
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Scalar> core::ops::Add for Matrix<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl<T: Scalar> core::ops::Add<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self + rhs
    }
}

impl<T: Scalar> core::ops::AddAssign<&Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "dimension mismatch: {}x{} += {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols,
        );
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + b;
        }
    }
}

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> core::ops::Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "dimension mismatch: {}x{} - {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| a - b)
            .collect();
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Scalar> core::ops::Sub for Matrix<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl<T: Scalar> core::ops::Sub<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self - rhs
    }
}

impl<T: Scalar> core::ops::SubAssign<&Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: &Matrix<T>) {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "dimension mismatch: {}x{} -= {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols,
        );
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - b;
        }
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> core::ops::Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        let data = self.data.iter().map(|&x| T::zero() - x).collect();
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Scalar> core::ops::Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        -&self
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> core::ops::Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.cols, rhs.rows,
            "dimension mismatch: {}x{} * {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols,
        );
        self.mmul_unchecked(rhs)
    }
}

impl<T: Scalar> core::ops::Mul for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<T: Scalar> core::ops::Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self * rhs
    }
}

// ── Scalar multiplication / division ────────────────────────────────

impl<T: Scalar> core::ops::Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        let data = self.data.iter().map(|&x| x * rhs).collect();
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Scalar> core::ops::Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        &self * rhs
    }
}

impl<T: Scalar> core::ops::MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar> core::ops::Div<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        let data = self.data.iter().map(|&x| x / rhs).collect();
        Matrix {
            data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Scalar> core::ops::Div<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        &self / rhs
    }
}

impl<T: Scalar> core::ops::DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x / rhs;
        }
    }
}

// ── scalar * matrix (concrete impls) ────────────────────────────────

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {
        $(
            impl core::ops::Mul<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: Matrix<$t>) -> Matrix<$t> {
                    &rhs * self
                }
            }

            impl core::ops::Mul<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: &Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl<T: Scalar> Matrix<T> {
    /// Naive row-major product; caller guarantees `self.cols == rhs.rows`.
    pub(crate) fn mmul_unchecked(&self, rhs: &Matrix<T>) -> Matrix<T> {
        let m = self.rows;
        let n = self.cols;
        let p = rhs.cols;
        let mut data = vec![T::zero(); m * p];
        for i in 0..m {
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                for j in 0..p {
                    data[i * p + j] = data[i * p + j] + a_ik * rhs.data[k * p + j];
                }
            }
        }
        Matrix { data, rows: m, cols: p }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Matrix;
    use super::Operand;
    use crate::error::MatrixError;

    fn m2(a: [[f64; 2]; 2]) -> Matrix<f64> {
        Matrix::from_2d(&a).unwrap()
    }

    #[test]
    fn dispatch_scalar_and_matrix() {
        let mut a = m2([[1.0, 2.0], [3.0, 4.0]]);
        let b = m2([[5.0, 6.0], [7.0, 8.0]]);
        a.add(1.0).unwrap();
        assert_eq!(a.as_slice(), &[2.0, 3.0, 4.0, 5.0]);
        a.mul(&b).unwrap();
        assert_eq!(a.as_slice(), &[10.0, 18.0, 28.0, 40.0]);
        a.div(2.0).unwrap().sub(&b).unwrap();
        assert_eq!(a.as_slice(), &[0.0, 3.0, 7.0, 12.0]);
    }

    #[test]
    fn operand_from() {
        let b = m2([[1.0, 1.0], [1.0, 1.0]]);
        assert_eq!(Operand::from(2.0_f64), Operand::Scalar(2.0));
        assert!(matches!(Operand::from(&b), Operand::Matrix(_)));
    }

    #[test]
    fn matrix_form_checks_shape() {
        let mut a = m2([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::<f64>::new(3, 2);
        let err = a.add_matrix(&b).unwrap_err();
        assert_eq!(err, MatrixError::mismatch((2, 2), (3, 2)));
        // receiver untouched
        assert_eq!(a[(0, 0)], 1.0);
    }

    #[test]
    fn sub_forms_and_block_copy_coexist() {
        let mut a = m2([[5.0, 7.0], [9.0, 11.0]]);
        let b = m2([[1.0, 2.0], [3.0, 4.0]]);
        a.sub_elementwise(&b).unwrap();
        assert_eq!(a.as_slice(), &[4.0, 5.0, 6.0, 7.0]);
        a.sub(&b).unwrap().sub(1.0).unwrap();
        assert_eq!(a.as_slice(), &[2.0, 2.0, 2.0, 2.0]);
        assert_eq!(
            a.sub_elementwise(&Matrix::new(1, 2)).unwrap_err(),
            MatrixError::mismatch((2, 2), (1, 2))
        );
        let block = b.sub_matrix(1, 1, 0, 1).unwrap();
        assert_eq!(block.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn rem_keeps_dividend_sign() {
        let mut a = Matrix::from_2d(&[[-7, 7], [9, -9]]).unwrap();
        a.rem_scalar(4);
        assert_eq!(a.as_slice(), &[-3, 3, 1, -1]);
    }

    #[test]
    fn bitwise_family() {
        let mut a = Matrix::from_2d(&[[0b1100_i32, 0b1010]]).unwrap();
        a.and(0b0110).unwrap();
        assert_eq!(a.as_slice(), &[0b0100, 0b0010]);
        a.or(0b0001).unwrap().xor(0b1111).unwrap();
        assert_eq!(a.as_slice(), &[0b1010, 0b1100]);

        let mut s = Matrix::from_2d(&[[1_i32, -16]]).unwrap();
        s.left_shift_scalar(3);
        assert_eq!(s.as_slice(), &[8, -128]);
        s.right_shift_scalar(2);
        assert_eq!(s.as_slice(), &[2, -32]);

        let mut u = Matrix::from_2d(&[[-1_i32]]).unwrap();
        u.unsigned_right_shift_scalar(28);
        assert_eq!(u[(0, 0)], 0xF);

        let mut n = Matrix::from_2d(&[[0_i32, -1]]).unwrap();
        n.not();
        assert_eq!(n.as_slice(), &[-1, 0]);
    }

    #[test]
    fn shift_count_wraps() {
        let mut a = Matrix::from_2d(&[[1_i32]]).unwrap();
        a.left_shift_scalar(33);
        assert_eq!(a[(0, 0)], 2);
    }

    #[test]
    fn row_and_column_broadcast() {
        let mut a = m2([[1.0, 2.0], [3.0, 4.0]]);
        a.add_row_vector(&[10.0, 20.0]).unwrap();
        assert_eq!(a.as_slice(), &[11.0, 22.0, 13.0, 24.0]);
        a.sub_column_vector(&[1.0, 3.0]).unwrap();
        assert_eq!(a.as_slice(), &[10.0, 21.0, 10.0, 21.0]);
        assert!(a.mul_row_vector(&[1.0]).is_err());
        assert!(a.div_column_vector(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn scale_single_row_and_column() {
        let mut a = m2([[1.0, 2.0], [3.0, 4.0]]);
        a.mul_row(1, 2.0).unwrap().mul_column(0, -1.0).unwrap();
        assert_eq!(a.as_slice(), &[-1.0, 2.0, -6.0, 8.0]);
        assert!(a.mul_row(2, 1.0).is_err());
    }

    #[test]
    fn std_operators() {
        let a = m2([[1.0, 2.0], [3.0, 4.0]]);
        let b = m2([[5.0, 6.0], [7.0, 8.0]]);

        let c = &a + &b;
        assert_eq!(c[(1, 1)], 12.0);
        let d = &b - &a;
        assert_eq!(d[(0, 0)], 4.0);
        let p = &a * &b;
        assert_eq!(p.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
        let s = 2.0 * &a;
        assert_eq!(s[(1, 0)], 6.0);
        let q = &a / 2.0;
        assert_eq!(q[(0, 1)], 1.0);
        let n = -a.clone();
        assert_eq!(n[(0, 0)], -1.0);

        let mut e = a.clone();
        e += &b;
        e -= &b;
        e *= 3.0;
        e /= 3.0;
        assert_eq!(e, a);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn product_mismatch_panics() {
        let a = Matrix::<f64>::new(2, 3);
        let b = Matrix::<f64>::new(2, 3);
        let _ = &a * &b;
    }

    #[test]
    fn neg_in_place() {
        let mut a = m2([[1.0, -2.0], [0.0, 4.0]]);
        a.neg();
        assert_eq!(a.as_slice(), &[-1.0, 2.0, 0.0, -4.0]);
    }
}
