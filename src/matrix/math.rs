use crate::error::Result;
use crate::traits::FloatScalar;

use super::{Matrix, Operand};

macro_rules! unary_math {
    ($($(#[$doc:meta])* $name:ident => |$x:ident| $body:expr;)*) => {
        impl<T: FloatScalar> Matrix<T> {
            $(
                $(#[$doc])*
                pub fn $name(&mut self) -> &mut Self {
                    for v in self.data.iter_mut() {
                        let $x = *v;
                        *v = $body;
                    }
                    self
                }
            )*
        }
    };
}

unary_math! {
    /// In-place absolute value.
    abs => |x| x.abs();
    acos => |x| x.acos();
    acosh => |x| x.acosh();
    asin => |x| x.asin();
    asinh => |x| x.asinh();
    atan => |x| x.atan();
    atanh => |x| x.atanh();
    /// In-place cube root.
    cbrt => |x| x.cbrt();
    ceil => |x| x.ceil();
    cos => |x| x.cos();
    cosh => |x| x.cosh();
    exp => |x| x.exp();
    /// In-place `e^x - 1`, accurate near zero.
    expm1 => |x| x.exp_m1();
    floor => |x| x.floor();
    /// In-place rounding to the nearest `f32`.
    fround => |x| x.to_f32().and_then(T::from).unwrap_or(x);
    /// In-place natural logarithm.
    log => |x| x.ln();
    /// In-place `ln(1 + x)`, accurate near zero.
    log1p => |x| x.ln_1p();
    log10 => |x| x.log10();
    log2 => |x| x.log2();
    /// In-place rounding to the nearest integer; halves round towards
    /// positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
    round => |x| round_half_up(x);
    /// In-place sign: `-1`, `0` or `1` (NaN stays NaN).
    sign => |x| sign(x);
    sin => |x| x.sin();
    sinh => |x| x.sinh();
    /// In-place square root.
    sqrt => |x| x.sqrt();
    tan => |x| x.tan();
    tanh => |x| x.tanh();
    /// In-place truncation towards zero.
    trunc => |x| x.trunc();
}

fn round_half_up<T: FloatScalar>(x: T) -> T {
    let r = x.round();
    let half = T::from(0.5).unwrap_or_else(T::zero);
    if x - r == half {
        r + T::one()
    } else {
        r
    }
}

fn sign<T: FloatScalar>(x: T) -> T {
    if x.is_nan() || x == T::zero() {
        x
    } else {
        x.signum()
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Raise every element to `exponent` in place.
    pub fn pow_scalar(&mut self, exponent: T) -> &mut Self {
        for v in self.data.iter_mut() {
            *v = v.powf(exponent);
        }
        self
    }

    /// Raise every element to the matching element of `exponents`.
    pub fn pow_matrix(&mut self, exponents: &Matrix<T>) -> Result<&mut Self> {
        self.check_same_shape(exponents)?;
        for (v, &e) in self.data.iter_mut().zip(exponents.data.iter()) {
            *v = v.powf(e);
        }
        Ok(self)
    }

    /// Elementwise power with a scalar or same-shaped matrix exponent.
    ///
    /// ```
    /// use densela::Matrix;
    /// let mut m = Matrix::from_2d(&[[2.0_f64, 3.0]]).unwrap();
    /// m.pow(2.0).unwrap();
    /// assert_eq!(m.as_slice(), &[4.0, 9.0]);
    /// let e = Matrix::from_2d(&[[0.5, 0.0]]).unwrap();
    /// m.pow(&e).unwrap();
    /// assert_eq!(m.as_slice(), &[2.0, 1.0]);
    /// ```
    pub fn pow<'a>(&mut self, exponent: impl Into<Operand<'a, T>>) -> Result<&mut Self>
    where
        T: 'a,
    {
        match exponent.into() {
            Operand::Scalar(e) => Ok(self.pow_scalar(e)),
            Operand::Matrix(m) => self.pow_matrix(m),
        }
    }
}

impl<T: Copy> Matrix<T> {
    /// Replace every element with `f(row, col, value)` in place.
    ///
    /// ```
    /// use densela::Matrix;
    /// let mut m = Matrix::<i32>::from_fn(2, 2, |_, _| 1);
    /// m.apply(|i, j, v| v + (i * 2 + j) as i32);
    /// assert_eq!(m.as_slice(), &[1, 2, 3, 4]);
    /// ```
    pub fn apply(&mut self, mut f: impl FnMut(usize, usize, T) -> T) -> &mut Self {
        let cols = self.cols;
        for (k, v) in self.data.iter_mut().enumerate() {
            *v = f(k / cols, k % cols, *v);
        }
        self
    }

    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use densela::Matrix;
    /// let m = Matrix::from_2d(&[[1.0_f64, 4.0], [9.0, 16.0]]).unwrap();
    /// let r = m.map(|x| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Matrix<U> {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn trig_and_exp() {
        let mut m = Matrix::from_2d(&[[0.0_f64, core::f64::consts::FRAC_PI_2]]).unwrap();
        m.sin();
        assert_near(m[(0, 0)], 0.0, 1e-15, "sin 0");
        assert_near(m[(0, 1)], 1.0, 1e-15, "sin pi/2");
        m.exp().log();
        assert_near(m[(0, 1)], 1.0, 1e-15, "log exp");
    }

    #[test]
    fn rounding_rules() {
        let mut m = Matrix::from_2d(&[[2.5_f64, -2.5, -2.6, 0.4]]).unwrap();
        m.round();
        assert_eq!(m.as_slice(), &[3.0, -2.0, -3.0, 0.0]);

        let mut t = Matrix::from_2d(&[[2.7_f64, -2.7]]).unwrap();
        t.trunc();
        assert_eq!(t.as_slice(), &[2.0, -2.0]);
    }

    #[test]
    fn sign_keeps_zero() {
        let mut m = Matrix::from_2d(&[[-3.0_f64, 0.0, 7.5]]).unwrap();
        m.sign();
        assert_eq!(m.as_slice(), &[-1.0, 0.0, 1.0]);
    }

    #[test]
    fn fround_to_single() {
        let mut m = Matrix::from_2d(&[[0.1_f64]]).unwrap();
        m.fround();
        assert_eq!(m[(0, 0)], 0.1_f32 as f64);
    }

    #[test]
    fn pow_shape_mismatch() {
        let mut m = Matrix::from_2d(&[[2.0_f64, 3.0]]).unwrap();
        let e = Matrix::<f64>::ones(2, 1);
        assert!(m.pow_matrix(&e).is_err());
    }

    #[test]
    fn chained_math() {
        let mut m = Matrix::from_2d(&[[-4.0_f64, 9.0]]).unwrap();
        m.abs().sqrt();
        assert_eq!(m.as_slice(), &[2.0, 3.0]);
    }
}
