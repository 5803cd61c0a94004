use log::warn;

use crate::error::{MatrixError, Result};
use crate::linalg::hypotenuse;
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixRef};

/// Options for [`EigenvalueDecomposition::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvdOptions {
    /// Force the symmetric (`Some(true)`) or general (`Some(false)`) path.
    /// `None` checks the input with `is_symmetric`.
    pub assume_symmetric: Option<bool>,
}

/// Eigenvalues and eigenvectors of a real square matrix, `A·V = V·D`.
///
/// Symmetric input is reduced to tridiagonal form by Householder
/// transformations and diagonalized with implicit QL sweeps. The
/// eigenvalues are real, sorted ascending, and `V` is orthogonal.
///
/// Other input is reduced to upper Hessenberg form and then to real Schur
/// form by Francis double-shift QR. Complex conjugate pairs show up as
/// `(re, +im)` / `(re, -im)` in [`real_eigenvalues`] and
/// [`imaginary_eigenvalues`], and as a 2x2 block in
/// [`diagonal_matrix`](Self::diagonal_matrix). `V` holds the real and
/// imaginary parts of the complex eigenvector in the two matching columns.
///
/// [`real_eigenvalues`]: Self::real_eigenvalues
/// [`imaginary_eigenvalues`]: Self::imaginary_eigenvalues
///
/// ```
/// use densela::Matrix;
/// use densela::linalg::{EigenvalueDecomposition, EvdOptions};
///
/// let a = Matrix::from_2d(&[[2.0_f64, 1.0], [1.0, 2.0]]).unwrap();
/// let evd = EigenvalueDecomposition::new(&a, EvdOptions::default()).unwrap();
/// let d = evd.real_eigenvalues();
/// assert!((d[0] - 1.0).abs() < 1e-12);
/// assert!((d[1] - 3.0).abs() < 1e-12);
///
/// let rot = Matrix::from_2d(&[[0.0_f64, -1.0], [1.0, 0.0]]).unwrap();
/// let evd = EigenvalueDecomposition::new(&rot, EvdOptions::default()).unwrap();
/// assert!((evd.imaginary_eigenvalues()[0].abs() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct EigenvalueDecomposition<T> {
    n: usize,
    d: Vec<T>,
    e: Vec<T>,
    v: Matrix<T>,
}

impl<T: FloatScalar> EigenvalueDecomposition<T> {
    /// Decompose `matrix`.
    ///
    /// Fails with `NotSquare`, `Empty`, or `ConvergenceFailure` when a
    /// sweep stalls for more than `75 * n` iterations on one eigenvalue.
    pub fn new<M: MatrixRef<T> + ?Sized>(matrix: &M, options: EvdOptions) -> Result<Self> {
        let a = Matrix::copy_from(matrix);
        if !a.is_square() {
            return Err(MatrixError::NotSquare);
        }
        if a.is_empty() {
            return Err(MatrixError::Empty);
        }

        let n = a.columns();
        let mut d = vec![T::zero(); n];
        let mut e = vec![T::zero(); n];

        let symmetric = options
            .assume_symmetric
            .unwrap_or_else(|| a.is_symmetric());

        let v = if symmetric {
            let mut v = a;
            tred2(n, &mut e, &mut d, &mut v);
            tql2(n, &mut e, &mut d, &mut v)?;
            v
        } else {
            let mut h = a;
            let mut v = Matrix::new(n, n);
            let mut ort = vec![T::zero(); n];
            orthes(n, &mut h, &mut v, &mut ort);
            hqr2(n, &mut e, &mut d, &mut v, &mut h)?;
            v
        };

        Ok(Self { n, d, e, v })
    }

    /// Real parts of the eigenvalues.
    pub fn real_eigenvalues(&self) -> &[T] {
        &self.d
    }

    /// Imaginary parts of the eigenvalues; all zero on the symmetric path.
    pub fn imaginary_eigenvalues(&self) -> &[T] {
        &self.e
    }

    pub fn eigenvector_matrix(&self) -> &Matrix<T> {
        &self.v
    }

    /// Block diagonal `D`: real eigenvalues on the diagonal, and for a
    /// complex pair the imaginary parts beside it so that `A·V = V·D`.
    pub fn diagonal_matrix(&self) -> Matrix<T> {
        let n = self.n;
        let mut x = Matrix::new(n, n);
        for i in 0..n {
            x[(i, i)] = self.d[i];
            if self.e[i] > T::zero() && i + 1 < n {
                x[(i, i + 1)] = self.e[i];
            } else if self.e[i] < T::zero() && i > 0 {
                x[(i, i - 1)] = self.e[i];
            }
        }
        x
    }
}

// ── Symmetric path ──────────────────────────────────────────────────

/// Householder reduction to tridiagonal form. `v` holds the input on
/// entry and the accumulated transformation on return.
fn tred2<T: FloatScalar>(n: usize, e: &mut [T], d: &mut [T], v: &mut Matrix<T>) {
    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        let mut scale = T::zero();
        let mut h = T::zero();
        for &dk in &d[..i] {
            scale = scale + dk.abs();
        }

        if scale == T::zero() {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = T::zero();
                v[(j, i)] = T::zero();
            }
        } else {
            for dk in d[..i].iter_mut() {
                *dk = *dk / scale;
                h = h + *dk * *dk;
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > T::zero() {
                g = -g;
            }
            e[i] = scale * g;
            h = h - f * g;
            d[i - 1] = f - g;
            for ej in e[..i].iter_mut() {
                *ej = T::zero();
            }

            for j in 0..i {
                f = d[j];
                v[(j, i)] = f;
                g = e[j] + v[(j, j)] * f;
                for k in j + 1..i {
                    g = g + v[(k, j)] * d[k];
                    e[k] = e[k] + v[(k, j)] * f;
                }
                e[j] = g;
            }

            f = T::zero();
            for j in 0..i {
                e[j] = e[j] / h;
                f = f + e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] = e[j] - hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[(k, j)] = v[(k, j)] - (f * e[k] + g * d[k]);
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = T::zero();
            }
        }
        d[i] = h;
    }

    // Accumulate transformations.
    for i in 0..n - 1 {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = T::one();
        let h = d[i + 1];
        if h != T::zero() {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = T::zero();
                for k in 0..=i {
                    g = g + v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    v[(k, j)] = v[(k, j)] - g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = T::zero();
        }
    }

    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = T::zero();
    }
    v[(n - 1, n - 1)] = T::one();
    e[0] = T::zero();
}

/// Implicit QL on the tridiagonal from [`tred2`], then an ascending sort.
fn tql2<T: FloatScalar>(n: usize, e: &mut [T], d: &mut [T], v: &mut Matrix<T>) -> Result<()> {
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = T::zero();

    let two = T::one() + T::one();
    let eps = T::epsilon();
    let max_iter = 75 * n;
    let mut f = T::zero();
    let mut tst1 = T::zero();

    for l in 0..n {
        // Find a small subdiagonal element.
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n - 1 {
            if e[m].abs() <= eps * tst1 {
                break;
            }
            m += 1;
        }

        if m > l {
            let mut iter = 0;
            loop {
                iter += 1;
                if iter > max_iter {
                    warn!("symmetric eigenvalue sweep did not converge after {} iterations", max_iter);
                    return Err(MatrixError::ConvergenceFailure);
                }

                // Implicit shift.
                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (two * e[l]);
                let mut r = hypotenuse(p, T::one());
                if p < T::zero() {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for di in d[l + 2..].iter_mut() {
                    *di = *di - h;
                }
                f = f + h;

                p = d[m];
                let mut c = T::one();
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = T::zero();
                let mut s2 = T::zero();
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = hypotenuse(p, e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    for k in 0..n {
                        h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
        }
        d[l] = d[l] + f;
        e[l] = T::zero();
    }

    // Selection sort, ascending, with the vectors.
    for i in 0..n - 1 {
        let mut k = i;
        let mut p = d[i];
        for (j, &dj) in d.iter().enumerate().skip(i + 1) {
            if dj < p {
                k = j;
                p = dj;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for j in 0..n {
                let t = v[(j, i)];
                v[(j, i)] = v[(j, k)];
                v[(j, k)] = t;
            }
        }
    }
    Ok(())
}

// ── General path ────────────────────────────────────────────────────

/// Orthogonal reduction to upper Hessenberg form. `h` is reduced in
/// place; `v` receives the accumulated transformation.
fn orthes<T: FloatScalar>(n: usize, h: &mut Matrix<T>, v: &mut Matrix<T>, ort: &mut [T]) {
    let high = n - 1;

    for m in 1..high {
        let mut scale = T::zero();
        for i in m..=high {
            scale = scale + h[(i, m - 1)].abs();
        }
        if scale == T::zero() {
            continue;
        }

        // Householder vector.
        let mut hh = T::zero();
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh = hh + ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > T::zero() {
            g = -g;
        }
        hh = hh - ort[m] * g;
        ort[m] = ort[m] - g;

        // H = (I - u·uᵗ/h)·H·(I - u·uᵗ/h)
        for j in m..n {
            let mut f = T::zero();
            for i in (m..=high).rev() {
                f = f + ort[i] * h[(i, j)];
            }
            f = f / hh;
            for i in m..=high {
                h[(i, j)] = h[(i, j)] - f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = T::zero();
            for j in (m..=high).rev() {
                f = f + ort[j] * h[(i, j)];
            }
            f = f / hh;
            for j in m..=high {
                h[(i, j)] = h[(i, j)] - f * ort[j];
            }
        }
        ort[m] = scale * ort[m];
        h[(m, m - 1)] = scale * g;
    }

    for i in 0..n {
        for j in 0..n {
            v[(i, j)] = if i == j { T::one() } else { T::zero() };
        }
    }

    for m in (1..high).rev() {
        if h[(m, m - 1)] == T::zero() {
            continue;
        }
        for i in m + 1..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let mut g = T::zero();
            for i in m..=high {
                g = g + ort[i] * v[(i, j)];
            }
            // Double division avoids possible underflow.
            g = (g / ort[m]) / h[(m, m - 1)];
            for i in m..=high {
                v[(i, j)] = v[(i, j)] + g * ort[i];
            }
        }
    }
}

/// Complex division `(xr + i·xi) / (yr + i·yi)`.
fn cdiv<T: FloatScalar>(xr: T, xi: T, yr: T, yi: T) -> (T, T) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Reduce the Hessenberg matrix `h` to real Schur form and back-substitute
/// for the eigenvectors, which end up in `v`.
fn hqr2<T: FloatScalar>(nn: usize, e: &mut [T], d: &mut [T], v: &mut Matrix<T>, h: &mut Matrix<T>) -> Result<()> {
    macro_rules! at {
        ($m:expr, $i:expr, $j:expr) => {
            $m[(($i) as usize, ($j) as usize)]
        };
    }

    let nn_i = nn as isize;
    let mut n = nn_i - 1;
    let low: isize = 0;
    let high = nn_i - 1;
    let eps = T::epsilon();
    let two = T::one() + T::one();
    let max_iter = 75 * nn;
    let mut exshift = T::zero();
    let (mut p, mut q, mut r, mut s, mut z) = (T::zero(), T::zero(), T::zero(), T::zero(), T::zero());

    let mut norm = T::zero();
    for i in 0..nn_i {
        for j in (i - 1).max(0)..nn_i {
            norm = norm + at!(h, i, j).abs();
        }
    }

    let mut iter = 0;
    while n >= low {
        // Look for a single small subdiagonal element.
        let mut l = n;
        while l > low {
            s = at!(h, l - 1, l - 1).abs() + at!(h, l, l).abs();
            if s == T::zero() {
                s = norm;
            }
            if at!(h, l, l - 1).abs() < eps * s {
                break;
            }
            l -= 1;
        }

        if l == n {
            // One root found.
            at!(h, n, n) = at!(h, n, n) + exshift;
            d[n as usize] = at!(h, n, n);
            e[n as usize] = T::zero();
            n -= 1;
            iter = 0;
        } else if l == n - 1 {
            // Two roots found.
            let w = at!(h, n, n - 1) * at!(h, n - 1, n);
            p = (at!(h, n - 1, n - 1) - at!(h, n, n)) / two;
            q = p * p + w;
            z = q.abs().sqrt();
            at!(h, n, n) = at!(h, n, n) + exshift;
            at!(h, n - 1, n - 1) = at!(h, n - 1, n - 1) + exshift;
            let mut x = at!(h, n, n);

            if q >= T::zero() {
                // Real pair.
                z = if p >= T::zero() { p + z } else { p - z };
                d[(n - 1) as usize] = x + z;
                d[n as usize] = d[(n - 1) as usize];
                if z != T::zero() {
                    d[n as usize] = x - w / z;
                }
                e[(n - 1) as usize] = T::zero();
                e[n as usize] = T::zero();
                x = at!(h, n, n - 1);
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p = p / r;
                q = q / r;

                for j in n - 1..nn_i {
                    z = at!(h, n - 1, j);
                    at!(h, n - 1, j) = q * z + p * at!(h, n, j);
                    at!(h, n, j) = q * at!(h, n, j) - p * z;
                }
                for i in 0..=n {
                    z = at!(h, i, n - 1);
                    at!(h, i, n - 1) = q * z + p * at!(h, i, n);
                    at!(h, i, n) = q * at!(h, i, n) - p * z;
                }
                for i in low..=high {
                    z = at!(v, i, n - 1);
                    at!(v, i, n - 1) = q * z + p * at!(v, i, n);
                    at!(v, i, n) = q * at!(v, i, n) - p * z;
                }
            } else {
                // Complex pair.
                d[(n - 1) as usize] = x + p;
                d[n as usize] = x + p;
                e[(n - 1) as usize] = z;
                e[n as usize] = -z;
            }
            n -= 2;
            iter = 0;
        } else {
            let mut x = at!(h, n, n);
            let (mut y, mut w) = if l < n {
                (at!(h, n - 1, n - 1), at!(h, n, n - 1) * at!(h, n - 1, n))
            } else {
                (T::zero(), T::zero())
            };

            // Wilkinson's original ad hoc shift.
            if iter == 10 {
                exshift = exshift + x;
                for i in low..=n {
                    at!(h, i, i) = at!(h, i, i) - x;
                }
                s = at!(h, n, n - 1).abs() + at!(h, n - 1, n - 2).abs();
                x = T::from(0.75).unwrap_or_else(T::one) * s;
                y = x;
                w = T::from(-0.4375).unwrap_or_else(T::one) * s * s;
            }

            // MATLAB's new ad hoc shift.
            if iter == 30 {
                s = (y - x) / two;
                s = s * s + w;
                if s > T::zero() {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / two + s);
                    for i in low..=n {
                        at!(h, i, i) = at!(h, i, i) - s;
                    }
                    exshift = exshift + s;
                    x = T::from(0.964).unwrap_or_else(T::one);
                    y = x;
                    w = x;
                }
            }

            iter += 1;
            if iter > max_iter {
                warn!("eigenvalue sweep did not converge after {} iterations", max_iter);
                return Err(MatrixError::ConvergenceFailure);
            }

            // Look for two consecutive small subdiagonal elements.
            let mut m = n - 2;
            while m >= l {
                z = at!(h, m, m);
                r = x - z;
                s = y - z;
                p = (r * s - w) / at!(h, m + 1, m) + at!(h, m, m + 1);
                q = at!(h, m + 1, m + 1) - z - r - s;
                r = at!(h, m + 2, m + 1);
                s = p.abs() + q.abs() + r.abs();
                p = p / s;
                q = q / s;
                r = r / s;
                if m == l {
                    break;
                }
                if at!(h, m, m - 1).abs() * (q.abs() + r.abs())
                    < eps * (p.abs() * (at!(h, m - 1, m - 1).abs() + z.abs() + at!(h, m + 1, m + 1).abs()))
                {
                    break;
                }
                m -= 1;
            }

            for i in m + 2..=n {
                at!(h, i, i - 2) = T::zero();
                if i > m + 2 {
                    at!(h, i, i - 3) = T::zero();
                }
            }

            // Double QR step on rows l..=n and columns m..=n.
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = at!(h, k, k - 1);
                    q = at!(h, k + 1, k - 1);
                    r = if notlast { at!(h, k + 2, k - 1) } else { T::zero() };
                    x = p.abs() + q.abs() + r.abs();
                    if x == T::zero() {
                        continue;
                    }
                    p = p / x;
                    q = q / x;
                    r = r / x;
                }

                s = (p * p + q * q + r * r).sqrt();
                if p < T::zero() {
                    s = -s;
                }
                if s == T::zero() {
                    continue;
                }

                if k != m {
                    at!(h, k, k - 1) = -s * x;
                } else if l != m {
                    at!(h, k, k - 1) = -at!(h, k, k - 1);
                }
                p = p + s;
                x = p / s;
                y = q / s;
                z = r / s;
                q = q / p;
                r = r / p;

                // Row modification.
                for j in k..nn_i {
                    p = at!(h, k, j) + q * at!(h, k + 1, j);
                    if notlast {
                        p = p + r * at!(h, k + 2, j);
                        at!(h, k + 2, j) = at!(h, k + 2, j) - p * z;
                    }
                    at!(h, k, j) = at!(h, k, j) - p * x;
                    at!(h, k + 1, j) = at!(h, k + 1, j) - p * y;
                }

                // Column modification.
                for i in 0..=n.min(k + 3) {
                    p = x * at!(h, i, k) + y * at!(h, i, k + 1);
                    if notlast {
                        p = p + z * at!(h, i, k + 2);
                        at!(h, i, k + 2) = at!(h, i, k + 2) - p * r;
                    }
                    at!(h, i, k) = at!(h, i, k) - p;
                    at!(h, i, k + 1) = at!(h, i, k + 1) - p * q;
                }

                // Accumulate transformations.
                for i in low..=high {
                    p = x * at!(v, i, k) + y * at!(v, i, k + 1);
                    if notlast {
                        p = p + z * at!(v, i, k + 2);
                        at!(v, i, k + 2) = at!(v, i, k + 2) - p * r;
                    }
                    at!(v, i, k) = at!(v, i, k) - p;
                    at!(v, i, k + 1) = at!(v, i, k + 1) - p * q;
                }
            }
        }
    }

    // Back-substitute to find vectors of the upper triangular form.
    if norm == T::zero() {
        return Ok(());
    }

    for n in (0..nn_i).rev() {
        p = d[n as usize];
        q = e[n as usize];

        if q == T::zero() {
            // Real vector.
            let mut l = n;
            at!(h, n, n) = T::one();
            for i in (0..n).rev() {
                let w = at!(h, i, i) - p;
                r = T::zero();
                for j in l..=n {
                    r = r + at!(h, i, j) * at!(h, j, n);
                }
                if e[i as usize] < T::zero() {
                    z = w;
                    s = r;
                } else {
                    l = i;
                    if e[i as usize] == T::zero() {
                        at!(h, i, n) = if w != T::zero() { -r / w } else { -r / (eps * norm) };
                    } else {
                        // Solve the real 2x2 system.
                        let x = at!(h, i, i + 1);
                        let y = at!(h, i + 1, i);
                        let di = d[i as usize] - p;
                        q = di * di + e[i as usize] * e[i as usize];
                        let t = (x * s - z * r) / q;
                        at!(h, i, n) = t;
                        at!(h, i + 1, n) = if x.abs() > z.abs() {
                            (-r - w * t) / x
                        } else {
                            (-s - y * t) / z
                        };
                    }

                    // Overflow control.
                    let t = at!(h, i, n).abs();
                    if eps * t * t > T::one() {
                        for j in i..=n {
                            at!(h, j, n) = at!(h, j, n) / t;
                        }
                    }
                }
            }
        } else if q < T::zero() {
            // Complex vector, last component imaginary.
            let mut l = n - 1;
            if at!(h, n, n - 1).abs() > at!(h, n - 1, n).abs() {
                at!(h, n - 1, n - 1) = q / at!(h, n, n - 1);
                at!(h, n - 1, n) = -(at!(h, n, n) - p) / at!(h, n, n - 1);
            } else {
                let (cr, ci) = cdiv(T::zero(), -at!(h, n - 1, n), at!(h, n - 1, n - 1) - p, q);
                at!(h, n - 1, n - 1) = cr;
                at!(h, n - 1, n) = ci;
            }
            at!(h, n, n - 1) = T::zero();
            at!(h, n, n) = T::one();

            for i in (0..n - 1).rev() {
                let mut ra = T::zero();
                let mut sa = T::zero();
                for j in l..=n {
                    ra = ra + at!(h, i, j) * at!(h, j, n - 1);
                    sa = sa + at!(h, i, j) * at!(h, j, n);
                }
                let w = at!(h, i, i) - p;

                if e[i as usize] < T::zero() {
                    z = w;
                    r = ra;
                    s = sa;
                } else {
                    l = i;
                    if e[i as usize] == T::zero() {
                        let (cr, ci) = cdiv(-ra, -sa, w, q);
                        at!(h, i, n - 1) = cr;
                        at!(h, i, n) = ci;
                    } else {
                        // Solve the complex 2x2 system.
                        let x = at!(h, i, i + 1);
                        let y = at!(h, i + 1, i);
                        let di = d[i as usize] - p;
                        let mut vr = di * di + e[i as usize] * e[i as usize] - q * q;
                        let vi = di * two * q;
                        if vr == T::zero() && vi == T::zero() {
                            vr = eps * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                        }
                        let (cr, ci) = cdiv(
                            x * r - z * ra + q * sa,
                            x * s - z * sa - q * ra,
                            vr,
                            vi,
                        );
                        at!(h, i, n - 1) = cr;
                        at!(h, i, n) = ci;
                        if x.abs() > z.abs() + q.abs() {
                            at!(h, i + 1, n - 1) = (-ra - w * at!(h, i, n - 1) + q * at!(h, i, n)) / x;
                            at!(h, i + 1, n) = (-sa - w * at!(h, i, n) - q * at!(h, i, n - 1)) / x;
                        } else {
                            let (cr, ci) = cdiv(
                                -r - y * at!(h, i, n - 1),
                                -s - y * at!(h, i, n),
                                z,
                                q,
                            );
                            at!(h, i + 1, n - 1) = cr;
                            at!(h, i + 1, n) = ci;
                        }
                    }

                    // Overflow control.
                    let t = at!(h, i, n - 1).abs().max(at!(h, i, n).abs());
                    if eps * t * t > T::one() {
                        for j in i..=n {
                            at!(h, j, n - 1) = at!(h, j, n - 1) / t;
                            at!(h, j, n) = at!(h, j, n) / t;
                        }
                    }
                }
            }
        }
    }

    // Back transformation to get eigenvectors of the original matrix.
    for j in (low..nn_i).rev() {
        for i in low..=high {
            z = T::zero();
            for k in low..=j.min(high) {
                z = z + at!(v, i, k) * at!(h, k, j);
            }
            at!(v, i, j) = z;
        }
    }
    Ok(())
}
