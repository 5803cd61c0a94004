use log::warn;

use crate::error::{MatrixError, Result};
use crate::linalg::hypotenuse;
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixRef};

/// Options for [`SingularValueDecomposition::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvdOptions {
    /// Accumulate `U`. Default `true`.
    pub compute_left_singular_vectors: bool,
    /// Accumulate `V`. Default `true`.
    pub compute_right_singular_vectors: bool,
    /// Factor `Aᵗ` instead when `A` has more columns than rows, then swap
    /// the factors back. Default `false`.
    pub auto_transpose: bool,
}

impl Default for SvdOptions {
    fn default() -> Self {
        Self {
            compute_left_singular_vectors: true,
            compute_right_singular_vectors: true,
            auto_transpose: false,
        }
    }
}

/// Singular value decomposition, `A = U·S·Vᵗ`.
///
/// Golub–Kahan Householder bidiagonalization followed by implicit-shift
/// QR sweeps on the bidiagonal (Golub–Reinsch). Singular values come out
/// non-negative and sorted in descending order, with the columns of `U`
/// and `V` permuted to match.
///
/// `solve`, `inverse` and `rank` treat singular values at or below
/// [`threshold`](Self::threshold) as zero, so they give the minimum-norm
/// least-squares answer on rank-deficient input.
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::{SingularValueDecomposition, SvdOptions};
///
/// let a = Matrix::from_2d(&[[3.0_f64, 0.0], [0.0, -4.0]]).unwrap();
/// let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
/// assert!((svd.diagonal()[0] - 4.0).abs() < 1e-12);
/// assert!((svd.diagonal()[1] - 3.0).abs() < 1e-12);
/// assert_eq!(svd.rank(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SingularValueDecomposition<T> {
    m: usize,
    n: usize,
    s: Vec<T>,
    u: Matrix<T>,
    v: Matrix<T>,
}

impl<T: FloatScalar> SingularValueDecomposition<T> {
    /// Factor `value`.
    ///
    /// Fails with `Empty` on an empty input and with `ConvergenceFailure`
    /// if the QR sweeps stall on one singular value for more than
    /// `75 * max(rows, cols)` iterations.
    pub fn new<M: MatrixRef<T> + ?Sized>(value: &M, options: SvdOptions) -> Result<Self> {
        if value.nrows() == 0 || value.ncols() == 0 {
            return Err(MatrixError::Empty);
        }

        let mut m = value.nrows();
        let mut n = value.ncols();
        let mut want_u = options.compute_left_singular_vectors;
        let mut want_v = options.compute_right_singular_vectors;
        let mut swapped = false;

        let mut a = if m < n {
            if options.auto_transpose {
                let t = Matrix::from_fn(n, m, |i, j| *value.get(j, i));
                core::mem::swap(&mut m, &mut n);
                core::mem::swap(&mut want_u, &mut want_v);
                swapped = true;
                t
            } else {
                warn!(
                    "Computing SVD on a matrix with more columns than rows. Consider enabling autoTranspose"
                );
                Matrix::copy_from(value)
            }
        } else {
            Matrix::copy_from(value)
        };

        let nu = m.min(n);
        let ni = (m + 1).min(n);
        let mut s = vec![T::zero(); ni];
        let mut u = Matrix::new(m, nu);
        let mut v = Matrix::new(n, n);
        let mut e = vec![T::zero(); n];
        let mut work = vec![T::zero(); m];

        // ── Bidiagonalization ───────────────────────────────────────

        let nct = (m - 1).min(n);
        let nrt = n.saturating_sub(2).min(m);
        let mrc = nct.max(nrt);

        for k in 0..mrc {
            if k < nct {
                // Column reflection: s[k] is the (negated) norm of a[k.., k].
                s[k] = T::zero();
                for i in k..m {
                    s[k] = hypotenuse(s[k], a[(i, k)]);
                }
                if s[k] != T::zero() {
                    if a[(k, k)] < T::zero() {
                        s[k] = -s[k];
                    }
                    for i in k..m {
                        a[(i, k)] = a[(i, k)] / s[k];
                    }
                    a[(k, k)] = a[(k, k)] + T::one();
                }
                s[k] = -s[k];
            }

            for j in k + 1..n {
                if k < nct && s[k] != T::zero() {
                    let mut t = T::zero();
                    for i in k..m {
                        t = t + a[(i, k)] * a[(i, j)];
                    }
                    t = -t / a[(k, k)];
                    for i in k..m {
                        a[(i, j)] = a[(i, j)] + t * a[(i, k)];
                    }
                }
                e[j] = a[(k, j)];
            }

            if want_u && k < nct {
                for i in k..m {
                    u[(i, k)] = a[(i, k)];
                }
            }

            if k < nrt {
                // Row reflection on e[k+1..].
                e[k] = T::zero();
                for i in k + 1..n {
                    e[k] = hypotenuse(e[k], e[i]);
                }
                if e[k] != T::zero() {
                    if e[k + 1] < T::zero() {
                        e[k] = -e[k];
                    }
                    for i in k + 1..n {
                        e[i] = e[i] / e[k];
                    }
                    e[k + 1] = e[k + 1] + T::one();
                }
                e[k] = -e[k];

                if k + 1 < m && e[k] != T::zero() {
                    for w in work.iter_mut().skip(k + 1) {
                        *w = T::zero();
                    }
                    for i in k + 1..m {
                        for j in k + 1..n {
                            work[i] = work[i] + e[j] * a[(i, j)];
                        }
                    }
                    for j in k + 1..n {
                        let t = -e[j] / e[k + 1];
                        for i in k + 1..m {
                            a[(i, j)] = a[(i, j)] + t * work[i];
                        }
                    }
                }

                if want_v {
                    for i in k + 1..n {
                        v[(i, k)] = e[i];
                    }
                }
            }
        }

        // Final bidiagonal of order p.
        let mut p = n.min(m + 1);
        if nct < n {
            s[nct] = a[(nct, nct)];
        }
        if m < p {
            s[p - 1] = T::zero();
        }
        if nrt + 1 < p {
            e[nrt] = a[(nrt, p - 1)];
        }
        e[p - 1] = T::zero();

        // ── Generate U ──────────────────────────────────────────────

        if want_u {
            for j in nct..nu {
                for i in 0..m {
                    u[(i, j)] = T::zero();
                }
                u[(j, j)] = T::one();
            }
            for k in (0..nct).rev() {
                if s[k] != T::zero() {
                    for j in k + 1..nu {
                        let mut t = T::zero();
                        for i in k..m {
                            t = t + u[(i, k)] * u[(i, j)];
                        }
                        t = -t / u[(k, k)];
                        for i in k..m {
                            u[(i, j)] = u[(i, j)] + t * u[(i, k)];
                        }
                    }
                    for i in k..m {
                        u[(i, k)] = -u[(i, k)];
                    }
                    u[(k, k)] = T::one() + u[(k, k)];
                    for i in 0..k.saturating_sub(1) {
                        u[(i, k)] = T::zero();
                    }
                } else {
                    for i in 0..m {
                        u[(i, k)] = T::zero();
                    }
                    u[(k, k)] = T::one();
                }
            }
        }

        // ── Generate V ──────────────────────────────────────────────

        if want_v {
            for k in (0..n).rev() {
                if k < nrt && e[k] != T::zero() {
                    for j in k + 1..n {
                        let mut t = T::zero();
                        for i in k + 1..n {
                            t = t + v[(i, k)] * v[(i, j)];
                        }
                        t = -t / v[(k + 1, k)];
                        for i in k + 1..n {
                            v[(i, j)] = v[(i, j)] + t * v[(i, k)];
                        }
                    }
                }
                for i in 0..n {
                    v[(i, k)] = T::zero();
                }
                v[(k, k)] = T::one();
            }
        }

        // ── QR sweeps on the bidiagonal ─────────────────────────────

        let pp = p - 1;
        let eps = T::epsilon();
        let tiny = T::min_positive_value();
        let max_iter = 75 * m.max(n);
        let u_cols = u.columns();
        let mut iter = 0;

        while p > 0 {
            // Find the largest k < p - 1 with a negligible e[k].
            let mut k = p as isize - 2;
            while k >= 0 {
                let ku = k as usize;
                let alpha = tiny + eps * (s[ku] + s[ku + 1].abs()).abs();
                if e[ku].abs() <= alpha || e[ku].is_nan() {
                    e[ku] = T::zero();
                    break;
                }
                k -= 1;
            }

            // kase 1: s[p-1] negligible, deflate.
            // kase 2: s[k] negligible, split.
            // kase 3: QR step.
            // kase 4: e[p-2] negligible, converged.
            let kase;
            if k == p as isize - 2 {
                kase = 4;
            } else {
                let mut ks = p as isize - 1;
                while ks > k {
                    let ksu = ks as usize;
                    let t = (if ksu != p { e[ksu].abs() } else { T::zero() })
                        + (if ks != k + 1 { e[ksu - 1].abs() } else { T::zero() });
                    if s[ksu].abs() <= eps * t {
                        s[ksu] = T::zero();
                        break;
                    }
                    ks -= 1;
                }
                if ks == k {
                    kase = 3;
                } else if ks == p as isize - 1 {
                    kase = 1;
                } else {
                    kase = 2;
                    k = ks;
                }
            }
            let k = (k + 1) as usize;

            match kase {
                1 => {
                    let mut f = e[p - 2];
                    e[p - 2] = T::zero();
                    for j in (k..=p - 2).rev() {
                        let t = hypotenuse(s[j], f);
                        let cs = s[j] / t;
                        let sn = f / t;
                        s[j] = t;
                        if j != k {
                            f = -sn * e[j - 1];
                            e[j - 1] = cs * e[j - 1];
                        }
                        if want_v {
                            rotate_columns(&mut v, j, p - 1, cs, sn);
                        }
                    }
                }
                2 => {
                    let mut f = e[k - 1];
                    e[k - 1] = T::zero();
                    for j in k..p {
                        let t = hypotenuse(s[j], f);
                        let cs = s[j] / t;
                        let sn = f / t;
                        s[j] = t;
                        f = -sn * e[j];
                        e[j] = cs * e[j];
                        // A wide, untransposed input has one more
                        // singular value slot than U has columns.
                        if want_u && j < u_cols {
                            rotate_columns(&mut u, j, k - 1, cs, sn);
                        }
                    }
                }
                3 => {
                    let scale = s[p - 1]
                        .abs()
                        .max(s[p - 2].abs())
                        .max(e[p - 2].abs())
                        .max(s[k].abs())
                        .max(e[k].abs());
                    let sp = s[p - 1] / scale;
                    let spm1 = s[p - 2] / scale;
                    let epm1 = e[p - 2] / scale;
                    let sk = s[k] / scale;
                    let ek = e[k] / scale;
                    let two = T::one() + T::one();
                    let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / two;
                    let c = sp * epm1 * (sp * epm1);
                    let mut shift = T::zero();
                    if b != T::zero() || c != T::zero() {
                        shift = (b * b + c).sqrt();
                        if b < T::zero() {
                            shift = -shift;
                        }
                        shift = c / (b + shift);
                    }
                    let mut f = (sk + sp) * (sk - sp) + shift;
                    let mut g = sk * ek;

                    // Chase the bulge.
                    for j in k..p - 1 {
                        let mut t = hypotenuse(f, g);
                        if t == T::zero() {
                            t = tiny;
                        }
                        let mut cs = f / t;
                        let mut sn = g / t;
                        if j != k {
                            e[j - 1] = t;
                        }
                        f = cs * s[j] + sn * e[j];
                        e[j] = cs * e[j] - sn * s[j];
                        g = sn * s[j + 1];
                        s[j + 1] = cs * s[j + 1];
                        if want_v {
                            rotate_columns(&mut v, j, j + 1, cs, sn);
                        }

                        t = hypotenuse(f, g);
                        if t == T::zero() {
                            t = tiny;
                        }
                        cs = f / t;
                        sn = g / t;
                        s[j] = t;
                        f = cs * e[j] + sn * s[j + 1];
                        s[j + 1] = -sn * e[j] + cs * s[j + 1];
                        g = sn * e[j + 1];
                        e[j + 1] = cs * e[j + 1];
                        if want_u && j < m - 1 {
                            rotate_columns(&mut u, j, j + 1, cs, sn);
                        }
                    }
                    e[p - 2] = f;
                    iter += 1;
                    if iter > max_iter {
                        warn!("SVD did not converge after {} iterations", iter);
                        return Err(MatrixError::ConvergenceFailure);
                    }
                }
                _ => {
                    // Make the singular value non-negative.
                    if s[k] <= T::zero() {
                        s[k] = if s[k] < T::zero() { -s[k] } else { T::zero() };
                        if want_v {
                            for i in 0..=pp {
                                v[(i, k)] = -v[(i, k)];
                            }
                        }
                    }
                    // Bubble it into place.
                    let mut k = k;
                    while k < pp {
                        if s[k] >= s[k + 1] {
                            break;
                        }
                        s.swap(k, k + 1);
                        if want_v && k < n - 1 {
                            swap_columns(&mut v, k, k + 1);
                        }
                        if want_u && k < m - 1 {
                            swap_columns(&mut u, k, k + 1);
                        }
                        k += 1;
                    }
                    iter = 0;
                    p -= 1;
                }
            }
        }

        if swapped {
            core::mem::swap(&mut u, &mut v);
        }

        Ok(Self { m, n, s, u, v })
    }

    /// Minimum-norm least-squares solution of `A·X = B`.
    ///
    /// Fails with `DimensionMismatch` when `b` does not have as many rows
    /// as `A`.
    pub fn solve<M: MatrixRef<T> + ?Sized>(&self, b: &M) -> Result<Matrix<T>> {
        let y = Matrix::copy_from(b);
        self.inverse().mmul(&y)
    }

    /// `solve` against the diagonal matrix built from `values`.
    pub fn solve_for_diagonal(&self, values: &[T]) -> Result<Matrix<T>> {
        self.solve(&Matrix::diag(values))
    }

    /// Moore–Penrose pseudo-inverse `V·S⁺·Uᵗ`.
    pub fn inverse(&self) -> Matrix<T> {
        let e = self.threshold();
        let r = self.s.len().min(self.v.columns()).min(self.u.columns());
        let inv: Vec<T> = self.s[..r]
            .iter()
            .map(|&sk| if sk.abs() > e { T::one() / sk } else { T::zero() })
            .collect();
        Matrix::from_fn(self.v.rows(), self.u.rows(), |i, j| {
            let mut sum = T::zero();
            for (k, &ik) in inv.iter().enumerate() {
                sum = sum + self.v[(i, k)] * ik * self.u[(j, k)];
            }
            sum
        })
    }

    /// Two-norm condition number, `s[0] / s[min(rows, cols) - 1]`.
    pub fn condition(&self) -> T {
        self.s[0] / self.s[self.m.min(self.n) - 1]
    }

    /// Two-norm, the largest singular value.
    pub fn norm2(&self) -> T {
        self.s[0]
    }

    /// Number of singular values above `max(rows, cols) · s[0] · ε`.
    pub fn rank(&self) -> usize {
        let tol = T::from(self.m.max(self.n)).unwrap_or_else(T::one) * self.s[0] * T::epsilon();
        self.s.iter().filter(|&&x| x > tol).count()
    }

    /// Singular values, descending.
    pub fn diagonal(&self) -> &[T] {
        &self.s
    }

    /// Cutoff below which `solve` and `inverse` treat a singular value as
    /// zero, `ε/2 · max(rows, cols) · s[0]`.
    pub fn threshold(&self) -> T {
        let two = T::one() + T::one();
        T::epsilon() / two * T::from(self.m.max(self.n)).unwrap_or_else(T::one) * self.s[0]
    }

    /// The singular values on the diagonal of a square matrix.
    pub fn diagonal_matrix(&self) -> Matrix<T> {
        Matrix::diag(&self.s)
    }

    /// `U`; all zeros when left vectors were not requested.
    pub fn left_singular_vectors(&self) -> &Matrix<T> {
        &self.u
    }

    /// `V`; all zeros when right vectors were not requested.
    pub fn right_singular_vectors(&self) -> &Matrix<T> {
        &self.v
    }
}

/// Plane rotation of columns `a` and `b`:
/// `(x_a, x_b) <- (cs·x_a + sn·x_b, -sn·x_a + cs·x_b)`.
fn rotate_columns<T: FloatScalar>(x: &mut Matrix<T>, a: usize, b: usize, cs: T, sn: T) {
    for i in 0..x.rows() {
        let t = cs * x[(i, a)] + sn * x[(i, b)];
        x[(i, b)] = -sn * x[(i, a)] + cs * x[(i, b)];
        x[(i, a)] = t;
    }
}

fn swap_columns<T: FloatScalar>(x: &mut Matrix<T>, a: usize, b: usize) {
    for i in 0..x.rows() {
        let t = x[(i, a)];
        x[(i, a)] = x[(i, b)];
        x[(i, b)] = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn reconstruct(svd: &SingularValueDecomposition<f64>) -> Matrix<f64> {
        let u = svd.left_singular_vectors();
        let v = svd.right_singular_vectors();
        let s = svd.diagonal();
        let k = s.len().min(u.columns()).min(v.columns());
        Matrix::from_fn(u.rows(), v.rows(), |i, j| {
            (0..k).map(|c| u[(i, c)] * s[c] * v[(j, c)]).sum()
        })
    }

    #[test]
    fn identity() {
        let svd = SingularValueDecomposition::new(&Matrix::<f64>::eye(3), SvdOptions::default()).unwrap();
        assert_eq!(svd.diagonal(), &[1.0, 1.0, 1.0]);
        assert_eq!(svd.rank(), 3);
        assert_near(svd.condition(), 1.0, 1e-15, "condition");
    }

    #[test]
    fn reconstruction_tall() {
        let a = Matrix::from_2d(&[
            [1.0, 2.0, 3.0],
            [4.0, 5.0, 6.0],
            [7.0, 8.0, 10.0],
            [-1.0, 0.5, 2.0],
            [3.0, -2.0, 1.0],
        ])
        .unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        let r = reconstruct(&svd);
        for i in 0..5 {
            for j in 0..3 {
                assert_near(r[(i, j)], a[(i, j)], 1e-10, &format!("USVᵗ[{i}][{j}]"));
            }
        }
        let s = svd.diagonal();
        assert!(s.windows(2).all(|w| w[0] >= w[1]), "descending: {:?}", s);
        assert!(s.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn negative_entries_become_positive() {
        let a = Matrix::from_2d(&[[-2.0, 0.0], [0.0, -5.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        assert_near(svd.diagonal()[0], 5.0, 1e-14, "s0");
        assert_near(svd.diagonal()[1], 2.0, 1e-14, "s1");
        let r = reconstruct(&svd);
        assert_near(r[(1, 1)], -5.0, 1e-14, "sign carried by V");
    }

    #[test]
    fn rank_deficient() {
        let a = Matrix::from_2d(&[[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        assert_eq!(svd.rank(), 1);
        assert_near(svd.norm2(), 70.0_f64.sqrt(), 1e-12, "norm2");
    }

    fn reconstruct_mmul(svd: &SingularValueDecomposition<f64>) -> Matrix<f64> {
        let u = svd.left_singular_vectors();
        let v = svd.right_singular_vectors();
        u.mmul(&Matrix::diag(svd.diagonal()))
            .unwrap()
            .mmul(&v.transpose())
            .unwrap()
    }

    #[test]
    fn trailing_zero_column() {
        let a = Matrix::from_2d(&[[3.0, 0.0], [4.0, 0.0], [0.0, 0.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        assert_near(svd.diagonal()[0], 5.0, 1e-12, "s0");
        assert_eq!(svd.diagonal()[1], 0.0);
        assert_eq!(svd.rank(), 1);
        let back = reconstruct_mmul(&svd);
        for i in 0..3 {
            for j in 0..2 {
                assert_near(back[(i, j)], a[(i, j)], 1e-12, &format!("USVᵗ[{i}][{j}]"));
            }
        }
    }

    #[test]
    fn interior_zero_column_splits() {
        let a = Matrix::from_2d(&[
            [1.0, 0.0, 2.0],
            [3.0, 0.0, 4.0],
            [5.0, 0.0, 6.0],
            [7.0, 0.0, 8.0],
        ])
        .unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        let s: &[f64] = svd.diagonal();
        assert!(s.windows(2).all(|w| w[0] >= w[1]), "descending: {:?}", s);
        assert!(s[2].abs() < 1e-12, "zero singular value: {}", s[2]);
        assert_eq!(svd.rank(), 2);
        let back = reconstruct_mmul(&svd);
        for i in 0..4 {
            for j in 0..3 {
                assert_near(back[(i, j)], a[(i, j)], 1e-10, &format!("USVᵗ[{i}][{j}]"));
            }
        }
    }

    #[test]
    fn wide_with_auto_transpose() {
        let a = Matrix::from_2d(&[[1.0, 0.0, 2.0], [0.0, 3.0, 1.0]]).unwrap();
        let opts = SvdOptions {
            auto_transpose: true,
            ..SvdOptions::default()
        };
        let svd = SingularValueDecomposition::new(&a, opts).unwrap();
        assert_eq!(svd.left_singular_vectors().rows(), 2);
        assert_eq!(svd.right_singular_vectors().rows(), 3);
        let r = reconstruct_mmul(&svd);
        for i in 0..2 {
            for j in 0..3 {
                assert_near(r[(i, j)], a[(i, j)], 1e-12, "wide USVᵗ");
            }
        }
    }

    #[test]
    fn wide_without_auto_transpose_still_factors() {
        let a = Matrix::from_2d(&[[1.0, 0.0, 2.0], [0.0, 3.0, 1.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        let s = svd.diagonal();
        let t = SingularValueDecomposition::new(
            &a,
            SvdOptions {
                auto_transpose: true,
                ..SvdOptions::default()
            },
        )
        .unwrap();
        assert_near(s[0], t.diagonal()[0], 1e-12, "largest singular value");
        assert_near(s[1], t.diagonal()[1], 1e-12, "second singular value");
    }

    #[test]
    fn solve_least_squares() {
        let a = Matrix::from_2d(&[[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]).unwrap();
        let b = Matrix::column_vector(&[1.0, 2.0, 2.0]);
        let x = SingularValueDecomposition::new(&a, SvdOptions::default())
            .unwrap()
            .solve(&b)
            .unwrap();
        assert_near(x[(0, 0)], 2.0 / 3.0, 1e-12, "intercept");
        assert_near(x[(1, 0)], 0.5, 1e-12, "slope");
    }

    #[test]
    fn inverse_of_square() {
        let a = Matrix::from_2d(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
        let inv = SingularValueDecomposition::new(&a, SvdOptions::default())
            .unwrap()
            .inverse();
        assert_near(inv[(0, 0)], 0.6, 1e-12, "inv00");
        assert_near(inv[(0, 1)], -0.7, 1e-12, "inv01");
        assert_near(inv[(1, 0)], -0.2, 1e-12, "inv10");
        assert_near(inv[(1, 1)], 0.4, 1e-12, "inv11");
    }

    #[test]
    fn values_only() {
        let a = Matrix::from_2d(&[[2.0, 0.0], [0.0, 1.0], [0.0, 0.0]]).unwrap();
        let opts = SvdOptions {
            compute_left_singular_vectors: false,
            compute_right_singular_vectors: false,
            auto_transpose: false,
        };
        let svd = SingularValueDecomposition::new(&a, opts).unwrap();
        assert_eq!(svd.diagonal(), &[2.0, 1.0]);
        assert!(svd.left_singular_vectors().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn empty_input() {
        let err = SingularValueDecomposition::new(&Matrix::<f64>::new(0, 2), SvdOptions::default())
            .unwrap_err();
        assert_eq!(err, MatrixError::Empty);
    }

    #[test]
    fn solve_for_diagonal_matches_inverse_scaled() {
        let a = Matrix::from_2d(&[[2.0, 0.0], [0.0, 4.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a, SvdOptions::default()).unwrap();
        let x = svd.solve_for_diagonal(&[2.0, 4.0]).unwrap();
        assert_near(x[(0, 0)], 1.0, 1e-14, "x00");
        assert_near(x[(1, 1)], 1.0, 1e-14, "x11");
        assert_near(x[(0, 1)], 0.0, 1e-14, "x01");
    }
}
