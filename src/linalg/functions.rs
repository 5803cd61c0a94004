use log::debug;

use crate::error::{MatrixError, Result};
use crate::linalg::{LuDecomposition, QrDecomposition, SingularValueDecomposition, SvdOptions};
use crate::matrix::{By, CenterOptions, Matrix, ScaleOptions, VarianceOptions};
use crate::traits::{FloatScalar, MatrixRef};
use crate::view::MatrixView;

// ── Solvers ─────────────────────────────────────────────────────────

/// Solve `A·X = B`, picking the decomposition from the shape of `a`.
///
/// With `use_svd` the minimum-norm least-squares solution from
/// [`SingularValueDecomposition`] is returned. Otherwise a square `a` goes
/// through [`LuDecomposition`] and a rectangular one through
/// [`QrDecomposition`] (least squares for tall `a`).
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::solve;
///
/// let a = Matrix::from_2d(&[[2.0_f64, 1.0], [1.0, 3.0]]).unwrap();
/// let b = Matrix::column_vector(&[3.0, 5.0]);
/// let x = solve(&a, &b, false).unwrap();
/// assert!((x[(0, 0)] - 0.8).abs() < 1e-12);
/// assert!((x[(1, 0)] - 1.4).abs() < 1e-12);
/// ```
pub fn solve<T, A, B>(a: &A, b: &B, use_svd: bool) -> Result<Matrix<T>>
where
    T: FloatScalar,
    A: MatrixRef<T> + ?Sized,
    B: MatrixRef<T> + ?Sized,
{
    if use_svd {
        debug!("solve: {}x{} system via SVD", a.nrows(), a.ncols());
        SingularValueDecomposition::new(a, SvdOptions::default())?.solve(b)
    } else if a.nrows() == a.ncols() {
        debug!("solve: {}x{} system via LU", a.nrows(), a.ncols());
        LuDecomposition::new(a).solve(b)
    } else {
        debug!("solve: {}x{} system via QR", a.nrows(), a.ncols());
        QrDecomposition::new(a).solve(b)
    }
}

/// Inverse of `a`: `solve(a, I)`, or the SVD pseudo-inverse with `use_svd`.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::inverse;
///
/// let a = Matrix::from_2d(&[[4.0_f64, 7.0], [2.0, 6.0]]).unwrap();
/// let inv = inverse(&a, false).unwrap();
/// assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
/// assert!((inv[(1, 0)] + 0.2).abs() < 1e-12);
/// ```
pub fn inverse<T: FloatScalar, M: MatrixRef<T> + ?Sized>(a: &M, use_svd: bool) -> Result<Matrix<T>> {
    if use_svd {
        Ok(SingularValueDecomposition::new(a, SvdOptions::default())?.inverse())
    } else {
        solve(a, &Matrix::eye(a.nrows()), false)
    }
}

/// Determinant of a square matrix.
///
/// Closed forms for `0x0` (`1`), `2x2` and `3x3` (cofactor expansion along
/// the first row); LU for everything else. Fails with `NotSquare`.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::determinant;
///
/// let a = Matrix::from_2d(&[[2.0_f64, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]]).unwrap();
/// assert!((determinant(&a).unwrap() - 6.0).abs() < 1e-12);
/// assert_eq!(determinant(&Matrix::<f64>::new(0, 0)).unwrap(), 1.0);
/// ```
pub fn determinant<T: FloatScalar, M: MatrixRef<T> + ?Sized>(a: &M) -> Result<T> {
    if a.nrows() != a.ncols() {
        return Err(MatrixError::NotSquare);
    }
    match a.ncols() {
        0 => Ok(T::one()),
        2 => Ok(*a.get(0, 0) * *a.get(1, 1) - *a.get(0, 1) * *a.get(1, 0)),
        3 => {
            let m = Matrix::copy_from(a);
            let minor0 = MatrixView::selection(&m, &[1, 2], &[1, 2])?;
            let minor1 = MatrixView::selection(&m, &[1, 2], &[0, 2])?;
            let minor2 = MatrixView::selection(&m, &[1, 2], &[0, 1])?;
            Ok(m[(0, 0)] * determinant(&minor0)? - m[(0, 1)] * determinant(&minor1)?
                + m[(0, 2)] * determinant(&minor2)?)
        }
        _ => LuDecomposition::new(a).determinant(),
    }
}

/// Moore–Penrose pseudo-inverse, dropping singular values with
/// `|s| <= threshold`.
///
/// An empty input gives back its (empty) transpose.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::pseudo_inverse_default;
///
/// let a = Matrix::from_2d(&[[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
/// let p = pseudo_inverse_default(&a).unwrap();
/// assert_eq!((p.rows(), p.columns()), (2, 3));
/// let pa = p.mmul(&a).unwrap();
/// assert!((pa[(0, 0)] - 1.0).abs() < 1e-12 && pa[(0, 1)].abs() < 1e-12);
/// ```
pub fn pseudo_inverse<T: FloatScalar, M: MatrixRef<T> + ?Sized>(a: &M, threshold: T) -> Result<Matrix<T>> {
    let m = Matrix::copy_from(a);
    if m.is_empty() {
        return Ok(m.transpose());
    }

    let options = SvdOptions {
        auto_transpose: true,
        ..SvdOptions::default()
    };
    let svd = SingularValueDecomposition::new(&m, options)?;
    let u = svd.left_singular_vectors();
    let v = svd.right_singular_vectors();
    let inv: Vec<T> = svd
        .diagonal()
        .iter()
        .map(|&s| if s.abs() > threshold { T::one() / s } else { T::zero() })
        .collect();

    v.mmul(&Matrix::diag(&inv).mmul(&u.transpose())?)
}

/// [`pseudo_inverse`] with machine epsilon as the threshold.
pub fn pseudo_inverse_default<T: FloatScalar, M: MatrixRef<T> + ?Sized>(a: &M) -> Result<Matrix<T>> {
    pseudo_inverse(a, T::epsilon())
}

// ── Linear dependencies ─────────────────────────────────────────────

/// Options for [`linear_dependencies`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDependenciesOptions<T> {
    /// Coefficients smaller than this in magnitude are reported as `0`.
    /// Default `10e-10`.
    pub threshold_value: T,
    /// A row whose best reconstruction leaves a larger max-abs residual is
    /// independent. Default `10e-10`.
    pub threshold_error: T,
}

impl<T: FloatScalar> Default for LinearDependenciesOptions<T> {
    fn default() -> Self {
        let t = T::from(10e-10).unwrap_or_else(T::epsilon);
        Self {
            threshold_value: t,
            threshold_error: t,
        }
    }
}

/// Express every row of `a` as a linear combination of the other rows.
///
/// Row `i` of the `n x n` result holds the coefficients, with a `0` at
/// position `i`; a row that cannot be reconstructed within
/// `threshold_error` is independent and gets all zeros.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::{linear_dependencies, LinearDependenciesOptions};
///
/// let a = Matrix::from_2d(&[[1.0_f64, 0.0], [0.0, 1.0], [2.0, 3.0]]).unwrap();
/// let deps = linear_dependencies(&a, LinearDependenciesOptions::default()).unwrap();
/// // row 2 = 2·row 0 + 3·row 1
/// assert!((deps[(2, 0)] - 2.0).abs() < 1e-9);
/// assert!((deps[(2, 1)] - 3.0).abs() < 1e-9);
/// assert_eq!(deps[(2, 2)], 0.0);
/// ```
pub fn linear_dependencies<T: FloatScalar, M: MatrixRef<T> + ?Sized>(
    a: &M,
    options: LinearDependenciesOptions<T>,
) -> Result<Matrix<T>> {
    let m = Matrix::copy_from(a);
    let n = m.rows();
    let mut results = Matrix::new(n, n);
    if n < 2 || m.columns() == 0 {
        return Ok(results);
    }

    let svd_options = SvdOptions {
        auto_transpose: true,
        ..SvdOptions::default()
    };

    for i in 0..n {
        let b = Matrix::column_vector(m.row_slice(i));
        let others: Vec<usize> = (0..n).filter(|&k| k != i).collect();
        let abis = MatrixView::row_selection(&m, &others)?.to_matrix().transpose();
        let x = SingularValueDecomposition::new(&abis, svd_options)?.solve(&b)?;

        let residual = abis.mmul(&x)?;
        let error = b
            .iter()
            .zip(residual.iter())
            .map(|(&bi, &ri)| (bi - ri).abs())
            .fold(T::zero(), T::max);

        if error > options.threshold_error {
            continue;
        }
        for (k, &j) in others.iter().enumerate() {
            let c = x[(k, 0)];
            results[(i, j)] = if c.abs() < options.threshold_value { T::zero() } else { c };
        }
    }
    Ok(results)
}

// ── Covariance / correlation ────────────────────────────────────────

/// Options for [`covariance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CovarianceOptions {
    /// Subtract the column means first. Default `true`.
    pub center: bool,
}

impl Default for CovarianceOptions {
    fn default() -> Self {
        Self { center: true }
    }
}

/// Options for [`correlation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationOptions {
    /// Subtract the column means first. Default `true`.
    pub center: bool,
    /// Divide every column by its root mean square first. Default `true`.
    pub scale: bool,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            center: true,
            scale: true,
        }
    }
}

/// Sample covariance between the columns of `x` and the columns of `y`,
/// `xᵗ·y / (rows - 1)`.
///
/// Fails with `DimensionMismatch` when the row counts differ.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::{covariance_self, CovarianceOptions};
///
/// let x = Matrix::from_2d(&[[1.0_f64, 2.0], [2.0, 4.0], [3.0, 6.0]]).unwrap();
/// let c = covariance_self(&x, CovarianceOptions::default()).unwrap();
/// assert_eq!(c.to_2d_array(), vec![vec![1.0, 2.0], vec![2.0, 4.0]]);
/// ```
pub fn covariance<T, X, Y>(x: &X, y: &Y, options: CovarianceOptions) -> Result<Matrix<T>>
where
    T: FloatScalar,
    X: MatrixRef<T> + ?Sized,
    Y: MatrixRef<T> + ?Sized,
{
    if x.nrows() != y.nrows() {
        return Err(MatrixError::mismatch((x.nrows(), y.ncols()), (y.nrows(), y.ncols())));
    }
    let mut xm = Matrix::copy_from(x);
    let mut ym = Matrix::copy_from(y);
    if options.center {
        xm.center_by(By::Column, CenterOptions::default())?;
        ym.center_by(By::Column, CenterOptions::default())?;
    }
    let mut cov = xm.transpose().mmul(&ym)?;
    let denom = rows_minus_one::<T>(xm.rows());
    cov.apply(|_, _, c| c / denom);
    Ok(cov)
}

/// Covariance of the columns of `x` with each other.
pub fn covariance_self<T: FloatScalar, X: MatrixRef<T> + ?Sized>(
    x: &X,
    options: CovarianceOptions,
) -> Result<Matrix<T>> {
    covariance(x, x, options)
}

/// Pearson correlation between the columns of `x` and the columns of `y`.
///
/// Fails with `DimensionMismatch` when the row counts differ.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::{correlation_self, CorrelationOptions};
///
/// let x = Matrix::from_2d(&[[1.0_f64, 3.0], [2.0, 2.0], [3.0, 1.0]]).unwrap();
/// let r = correlation_self(&x, CorrelationOptions::default()).unwrap();
/// assert!((r[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((r[(0, 1)] + 1.0).abs() < 1e-12);
/// ```
pub fn correlation<T, X, Y>(x: &X, y: &Y, options: CorrelationOptions) -> Result<Matrix<T>>
where
    T: FloatScalar,
    X: MatrixRef<T> + ?Sized,
    Y: MatrixRef<T> + ?Sized,
{
    if x.nrows() != y.nrows() {
        return Err(MatrixError::mismatch((x.nrows(), y.ncols()), (y.nrows(), y.ncols())));
    }
    let mut xm = Matrix::copy_from(x);
    let mut ym = Matrix::copy_from(y);
    if options.center {
        xm.center_by(By::Column, CenterOptions::default())?;
        ym.center_by(By::Column, CenterOptions::default())?;
    }
    if options.scale {
        xm.scale_by(By::Column, ScaleOptions::default())?;
        ym.scale_by(By::Column, ScaleOptions::default())?;
    }

    let sdx = xm.standard_deviation_by(By::Column, VarianceOptions::default())?;
    let sdy = ym.standard_deviation_by(By::Column, VarianceOptions::default())?;
    let mut corr = xm.transpose().mmul(&ym)?;
    let denom = rows_minus_one::<T>(xm.rows());
    corr.apply(|i, j, c| c / (sdx[i] * sdy[j]) / denom);
    Ok(corr)
}

/// Correlation of the columns of `x` with each other.
pub fn correlation_self<T: FloatScalar, X: MatrixRef<T> + ?Sized>(
    x: &X,
    options: CorrelationOptions,
) -> Result<Matrix<T>> {
    correlation(x, x, options)
}

fn rows_minus_one<T: FloatScalar>(rows: usize) -> T {
    T::from(rows).unwrap_or_else(T::one) - T::one()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::wrap_2d;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn solve_dispatch_square_and_tall() {
        let a = Matrix::from_2d(&[[3.0, 2.0, -1.0], [2.0, -2.0, 4.0], [-1.0, 0.5, -1.0]]).unwrap();
        let b = Matrix::column_vector(&[1.0, -2.0, 0.0]);
        let x = solve(&a, &b, false).unwrap();
        let direct = LuDecomposition::new(&a).solve(&b).unwrap();
        assert_eq!(x, direct);
        assert_near(x[(0, 0)], 1.0, 1e-12, "x0");
        assert_near(x[(1, 0)], -2.0, 1e-12, "x1");
        assert_near(x[(2, 0)], -2.0, 1e-12, "x2");

        let tall = Matrix::from_2d(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        let y = Matrix::column_vector(&[1.0, 2.0, 3.0]);
        let qr = QrDecomposition::new(&tall).solve(&y).unwrap();
        assert_eq!(solve(&tall, &y, false).unwrap(), qr);
        let svd = solve(&tall, &y, true).unwrap();
        assert_near(svd[(0, 0)], qr[(0, 0)], 1e-10, "svd vs qr x0");
        assert_near(svd[(1, 0)], qr[(1, 0)], 1e-10, "svd vs qr x1");
    }

    #[test]
    fn inverse_both_ways() {
        let a = Matrix::from_2d(&[[2.0, 1.0], [7.0, 4.0]]).unwrap();
        let lu = inverse(&a, false).unwrap();
        let svd = inverse(&a, true).unwrap();
        let expected = [[4.0, -1.0], [-7.0, 2.0]];
        for i in 0..2 {
            for j in 0..2 {
                assert_near(lu[(i, j)], expected[i][j], 1e-12, "LU inverse");
                assert_near(svd[(i, j)], expected[i][j], 1e-10, "SVD inverse");
            }
        }
        assert_eq!(
            inverse(&Matrix::from_2d(&[[1.0, 2.0], [2.0, 4.0]]).unwrap(), false).unwrap_err(),
            MatrixError::Singular
        );
    }

    #[test]
    fn determinant_closed_forms_agree_with_lu() {
        let a2 = Matrix::from_2d(&[[3.0, 8.0], [4.0, 6.0]]).unwrap();
        assert_eq!(determinant(&a2).unwrap(), -14.0);
        assert_near(LuDecomposition::new(&a2).determinant().unwrap(), -14.0, 1e-12, "2x2");

        let a3 = Matrix::from_2d(&[[6.0, 1.0, 1.0], [4.0, -2.0, 5.0], [2.0, 8.0, 7.0]]).unwrap();
        assert_eq!(determinant(&a3).unwrap(), -306.0);
        assert_near(LuDecomposition::new(&a3).determinant().unwrap(), -306.0, 1e-10, "3x3");

        let a4 = Matrix::from_fn(4, 4, |i, j| if i == j { 2.0 } else { 0.0 });
        assert_near(determinant(&a4).unwrap(), 16.0, 1e-12, "4x4");
        assert_eq!(determinant(&Matrix::fill(1, 1, -5.0)).unwrap(), -5.0);
        assert_eq!(determinant(&Matrix::<f64>::new(2, 3)).unwrap_err(), MatrixError::NotSquare);
    }

    #[test]
    fn determinant_of_slice_wrapper() {
        let rows = [[1.0, 2.0], [3.0, 4.0]];
        let w = wrap_2d(&rows).unwrap();
        assert_eq!(determinant(&w).unwrap(), -2.0);
    }

    #[test]
    fn pseudo_inverse_wide_and_empty() {
        let a = Matrix::from_2d(&[[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]).unwrap();
        let p = pseudo_inverse_default(&a).unwrap();
        assert_eq!((p.rows(), p.columns()), (3, 2));
        let ap = a.mmul(&p).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let e = if i == j { 1.0 } else { 0.0 };
                assert_near(ap[(i, j)], e, 1e-12, "A·A⁺ = I");
            }
        }
        let empty = Matrix::<f64>::new(0, 3);
        let pe = pseudo_inverse_default(&empty).unwrap();
        assert_eq!((pe.rows(), pe.columns()), (3, 0));
    }

    #[test]
    fn pseudo_inverse_drops_small_values() {
        let a = Matrix::diag(&[4.0, 1e-3]);
        let p = pseudo_inverse(&a, 1e-2).unwrap();
        assert_near(p[(0, 0)], 0.25, 1e-14, "kept");
        assert_near(p[(1, 1)], 0.0, 1e-14, "dropped");
    }

    #[test]
    fn independent_rows_give_zeros() {
        let a = Matrix::<f64>::eye(3);
        let deps = linear_dependencies(&a, LinearDependenciesOptions::default()).unwrap();
        assert!(deps.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn dependent_rows_found() {
        let a = Matrix::from_2d(&[[2.0, 0.0, 0.0, 1.0], [0.0, 1.0, 6.0, 0.0], [0.0, 3.0, 0.0, 1.0], [0.0, 0.0, 1.0, 0.0], [0.0, 1.0, 2.0, 0.0]]).unwrap();
        let deps = linear_dependencies(&a, LinearDependenciesOptions::default()).unwrap();
        // row 1 = 4·row 3 + row 4
        assert_near(deps[(1, 3)], 4.0, 1e-8, "row1 on row3");
        assert_near(deps[(1, 4)], 1.0, 1e-8, "row1 on row4");
        assert_eq!(deps[(1, 1)], 0.0);
        // rows 1, 3 and 4 are mutually dependent
        assert_near(deps[(3, 1)], 0.25, 1e-8, "row3 on row1");
        assert_near(deps[(3, 4)], -0.25, 1e-8, "row3 on row4");
        assert_near(deps[(4, 1)], 1.0, 1e-8, "row4 on row1");
        assert_near(deps[(4, 3)], -4.0, 1e-8, "row4 on row3");
        // rows 0 and 2 are independent
        assert!(deps.row_slice(0).iter().all(|&x| x == 0.0));
        assert!(deps.row_slice(2).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn rank_one_rows_get_minimum_norm_coefficients() {
        let a = Matrix::from_2d(&[[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]]).unwrap();
        let deps = linear_dependencies(&a, LinearDependenciesOptions::default()).unwrap();
        assert_eq!((deps.rows(), deps.columns()), (3, 3));
        // row 0 = c1·row 1 + c2·row 2 with 2·c1 + 3·c2 = 1, shortest c
        assert_eq!(deps[(0, 0)], 0.0);
        assert_near(deps[(0, 1)], 2.0 / 13.0, 1e-10, "row0 on row1");
        assert_near(deps[(0, 2)], 3.0 / 13.0, 1e-10, "row0 on row2");
        // row 2 = c0·row 0 + c1·row 1 with c0 + 2·c1 = 3
        assert_near(deps[(2, 0)], 0.6, 1e-10, "row2 on row0");
        assert_near(deps[(2, 1)], 1.2, 1e-10, "row2 on row1");
        for i in 0..3 {
            assert_eq!(deps[(i, i)], 0.0);
        }
    }

    #[test]
    fn covariance_matches_hand_computation() {
        let x = Matrix::from_2d(&[[1.0, 2.0], [3.0, 1.0], [5.0, 0.0]]).unwrap();
        let y = Matrix::column_vector(&[2.0, 4.0, 9.0]);
        let c = covariance(&x, &y, CovarianceOptions::default()).unwrap();
        assert_eq!((c.rows(), c.columns()), (2, 1));
        assert_near(c[(0, 0)], 7.0, 1e-12, "cov(x0, y)");
        assert_near(c[(1, 0)], -3.5, 1e-12, "cov(x1, y)");

        let raw = covariance(&x, &y, CovarianceOptions { center: false }).unwrap();
        assert_near(raw[(0, 0)], (2.0 + 12.0 + 45.0) / 2.0, 1e-12, "uncentered");

        let short = Matrix::column_vector(&[1.0, 2.0]);
        assert!(matches!(
            covariance(&x, &short, CovarianceOptions::default()).unwrap_err(),
            MatrixError::DimensionMismatch { .. }
        ));
    }

    #[test]
    fn correlation_diagonal_is_one() {
        let x = Matrix::from_2d(&[[1.0, 5.0, 2.0], [2.0, 3.0, 2.5], [4.0, 4.0, 1.0], [3.0, 0.0, 7.0]]).unwrap();
        let r = correlation_self(&x, CorrelationOptions::default()).unwrap();
        for i in 0..3 {
            assert_near(r[(i, i)], 1.0, 1e-12, "unit diagonal");
            for j in 0..3 {
                assert_near(r[(i, j)], r[(j, i)], 1e-12, "symmetric");
                assert!(r[(i, j)].abs() <= 1.0 + 1e-12);
            }
        }
    }
}
