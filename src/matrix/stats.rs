use crate::error::{MatrixError, Result};
use crate::traits::{FloatScalar, Scalar};

use super::Matrix;

/// Axis selector for the `_by` reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum By {
    /// One result per row.
    Row,
    /// One result per column.
    Column,
}

/// Matrix norm selector for [`Matrix::norm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormKind {
    /// Square root of the sum of squares.
    #[default]
    Frobenius,
    /// Largest element.
    Max,
}

/// Options for the variance and standard deviation reductions.
///
/// `M` is `T` for the whole-matrix form and `Vec<T>` for the `_by` forms.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceOptions<M> {
    /// Divide by `n - 1` instead of `n`. Default `true`.
    pub unbiased: bool,
    /// Precomputed mean; computed when `None`.
    pub mean: Option<M>,
}

impl<M> Default for VarianceOptions<M> {
    fn default() -> Self {
        Self {
            unbiased: true,
            mean: None,
        }
    }
}

/// Options for [`Matrix::center`] / [`Matrix::center_by`].
#[derive(Debug, Clone, PartialEq)]
pub struct CenterOptions<M> {
    /// Value(s) to subtract; the mean when `None`.
    pub center: Option<M>,
}

impl<M> Default for CenterOptions<M> {
    fn default() -> Self {
        Self { center: None }
    }
}

/// Options for [`Matrix::scale`] / [`Matrix::scale_by`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions<M> {
    /// Divisor(s); the root mean square with `n - 1` when `None`.
    pub scale: Option<M>,
}

impl<M> Default for ScaleOptions<M> {
    fn default() -> Self {
        Self { scale: None }
    }
}

// ── Sum / product ───────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Sum of all elements.
    ///
    /// ```
    /// use densela::{By, Matrix};
    /// let m = Matrix::from_2d(&[[1, 2], [3, 4]]).unwrap();
    /// assert_eq!(m.sum(), 10);
    /// assert_eq!(m.sum_by(By::Row), vec![3, 7]);
    /// assert_eq!(m.sum_by(By::Column), vec![4, 6]);
    /// ```
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Row or column sums.
    pub fn sum_by(&self, by: By) -> Vec<T> {
        self.fold_by(by, T::zero(), |acc, x| acc + x)
    }

    /// Product of all elements.
    pub fn product(&self) -> T {
        self.data.iter().fold(T::one(), |acc, &x| acc * x)
    }

    /// Row or column products.
    pub fn product_by(&self, by: By) -> Vec<T> {
        self.fold_by(by, T::one(), |acc, x| acc * x)
    }

    fn fold_by(&self, by: By, init: T, f: impl Fn(T, T) -> T) -> Vec<T> {
        match by {
            By::Row => {
                let mut out = vec![init; self.rows];
                for (k, &x) in self.data.iter().enumerate() {
                    let i = k / self.cols;
                    out[i] = f(out[i], x);
                }
                out
            }
            By::Column => {
                let mut out = vec![init; self.cols];
                for (k, &x) in self.data.iter().enumerate() {
                    let j = k % self.cols;
                    out[j] = f(out[j], x);
                }
                out
            }
        }
    }

    /// Running sum in row-major order, in place.
    ///
    /// ```
    /// use densela::Matrix;
    /// let mut m = Matrix::from_2d(&[[1, 2], [3, 4]]).unwrap();
    /// m.cumulative_sum();
    /// assert_eq!(m.as_slice(), &[1, 3, 6, 10]);
    /// ```
    pub fn cumulative_sum(&mut self) -> &mut Self {
        let mut acc = T::zero();
        for x in self.data.iter_mut() {
            acc = acc + *x;
            *x = acc;
        }
        self
    }

    /// Dot product of the flattened elements; sizes must match.
    pub fn dot(&self, other: &Matrix<T>) -> Result<T> {
        if self.size() != other.size() {
            return Err(MatrixError::mismatch((1, self.size()), (1, other.size())));
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Sum of the main diagonal.
    pub fn trace(&self) -> T {
        (0..self.rows.min(self.cols)).fold(T::zero(), |acc, i| acc + self.get(i, i))
    }
}

// ── Extremes ────────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    fn check_not_empty(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(MatrixError::Empty);
        }
        Ok(())
    }

    fn extreme_index(&self, better: impl Fn(T, T) -> bool) -> Result<(usize, usize)> {
        self.check_not_empty()?;
        let mut best = 0;
        for k in 1..self.data.len() {
            if better(self.data[k], self.data[best]) {
                best = k;
            }
        }
        Ok((best / self.cols, best % self.cols))
    }

    /// Largest element.
    pub fn max(&self) -> Result<T> {
        let (i, j) = self.max_index()?;
        Ok(self.get(i, j))
    }

    /// `(row, col)` of the first largest element.
    pub fn max_index(&self) -> Result<(usize, usize)> {
        self.extreme_index(|a, b| a > b)
    }

    /// Smallest element.
    pub fn min(&self) -> Result<T> {
        let (i, j) = self.min_index()?;
        Ok(self.get(i, j))
    }

    /// `(row, col)` of the first smallest element.
    pub fn min_index(&self) -> Result<(usize, usize)> {
        self.extreme_index(|a, b| a < b)
    }

    /// Largest element of every row or column.
    pub fn max_by(&self, by: By) -> Result<Vec<T>> {
        self.check_not_empty()?;
        Ok(match by {
            By::Row => (0..self.rows).map(|i| self.row_extreme(i, |a, b| a > b).1).collect(),
            By::Column => (0..self.cols).map(|j| self.column_extreme(j, |a, b| a > b).1).collect(),
        })
    }

    /// Smallest element of every row or column.
    pub fn min_by(&self, by: By) -> Result<Vec<T>> {
        self.check_not_empty()?;
        Ok(match by {
            By::Row => (0..self.rows).map(|i| self.row_extreme(i, |a, b| a < b).1).collect(),
            By::Column => (0..self.cols).map(|j| self.column_extreme(j, |a, b| a < b).1).collect(),
        })
    }

    fn row_extreme(&self, i: usize, better: impl Fn(T, T) -> bool) -> (usize, T) {
        let row = self.row_slice(i);
        let mut best = 0;
        for j in 1..row.len() {
            if better(row[j], row[best]) {
                best = j;
            }
        }
        (best, row[best])
    }

    fn column_extreme(&self, j: usize, better: impl Fn(T, T) -> bool) -> (usize, T) {
        let mut best = 0;
        for i in 1..self.rows {
            if better(self.get(i, j), self.get(best, j)) {
                best = i;
            }
        }
        (best, self.get(best, j))
    }

    /// Largest element of row `i`.
    pub fn max_row(&self, i: usize) -> Result<T> {
        Ok(self.max_row_index(i)?.1)
    }

    /// Column index and value of the largest element of row `i`.
    pub fn max_row_index(&self, i: usize) -> Result<(usize, T)> {
        self.check_row_index(i)?;
        self.check_not_empty()?;
        Ok(self.row_extreme(i, |a, b| a > b))
    }

    /// Smallest element of row `i`.
    pub fn min_row(&self, i: usize) -> Result<T> {
        Ok(self.min_row_index(i)?.1)
    }

    /// Column index and value of the smallest element of row `i`.
    pub fn min_row_index(&self, i: usize) -> Result<(usize, T)> {
        self.check_row_index(i)?;
        self.check_not_empty()?;
        Ok(self.row_extreme(i, |a, b| a < b))
    }

    /// Largest element of column `j`.
    pub fn max_column(&self, j: usize) -> Result<T> {
        Ok(self.max_column_index(j)?.1)
    }

    /// Row index and value of the largest element of column `j`.
    pub fn max_column_index(&self, j: usize) -> Result<(usize, T)> {
        self.check_column_index(j)?;
        self.check_not_empty()?;
        Ok(self.column_extreme(j, |a, b| a > b))
    }

    /// Smallest element of column `j`.
    pub fn min_column(&self, j: usize) -> Result<T> {
        Ok(self.min_column_index(j)?.1)
    }

    /// Row index and value of the smallest element of column `j`.
    pub fn min_column_index(&self, j: usize) -> Result<(usize, T)> {
        self.check_column_index(j)?;
        self.check_not_empty()?;
        Ok(self.column_extreme(j, |a, b| a < b))
    }
}

// ── Moments ─────────────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    fn count(n: usize) -> T {
        T::from(n).unwrap_or_else(T::zero)
    }

    fn check_len(&self, by: By, values: &[T]) -> Result<()> {
        let n = match by {
            By::Row => self.rows,
            By::Column => self.cols,
        };
        if values.len() != n {
            return Err(MatrixError::mismatch((1, n), (1, values.len())));
        }
        Ok(())
    }

    /// Group element `k` of the row-major storage along `by`.
    #[inline]
    fn group(&self, by: By, k: usize) -> usize {
        match by {
            By::Row => k / self.cols,
            By::Column => k % self.cols,
        }
    }

    fn group_len(&self, by: By) -> usize {
        match by {
            By::Row => self.cols,
            By::Column => self.rows,
        }
    }

    /// Mean of all elements.
    pub fn mean(&self) -> T {
        self.sum() / Self::count(self.size())
    }

    /// Row or column means.
    pub fn mean_by(&self, by: By) -> Vec<T> {
        let n = Self::count(self.group_len(by));
        self.sum_by(by).into_iter().map(|s| s / n).collect()
    }

    /// Variance of all elements.
    ///
    /// ```
    /// use densela::Matrix;
    /// use densela::matrix::VarianceOptions;
    /// let m = Matrix::from_2d(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
    /// let v = m.variance(VarianceOptions::default());
    /// assert!((v - 5.0 / 3.0).abs() < 1e-12);
    /// let biased = m.variance(VarianceOptions { unbiased: false, mean: None });
    /// assert!((biased - 1.25).abs() < 1e-12);
    /// ```
    pub fn variance(&self, options: VarianceOptions<T>) -> T {
        let mean = options.mean.unwrap_or_else(|| self.mean());
        let n = self.size();
        let (mut sum1, mut sum2) = (T::zero(), T::zero());
        for &x in &self.data {
            let d = x - mean;
            sum1 = sum1 + d;
            sum2 = sum2 + d * d;
        }
        Self::finish_variance(sum1, sum2, n, options.unbiased)
    }

    fn finish_variance(sum1: T, sum2: T, n: usize, unbiased: bool) -> T {
        let nf = Self::count(n);
        let denom = if unbiased { Self::count(n.saturating_sub(1)) } else { nf };
        (sum2 - sum1 * sum1 / nf) / denom
    }

    /// Row or column variances. A supplied mean must have one entry per
    /// row / column.
    pub fn variance_by(&self, by: By, options: VarianceOptions<Vec<T>>) -> Result<Vec<T>> {
        let mean = match options.mean {
            Some(m) => {
                self.check_len(by, &m)?;
                m
            }
            None => self.mean_by(by),
        };
        let mut sum1 = vec![T::zero(); mean.len()];
        let mut sum2 = vec![T::zero(); mean.len()];
        for (k, &x) in self.data.iter().enumerate() {
            let g = self.group(by, k);
            let d = x - mean[g];
            sum1[g] = sum1[g] + d;
            sum2[g] = sum2[g] + d * d;
        }
        let n = self.group_len(by);
        Ok(sum1
            .into_iter()
            .zip(sum2)
            .map(|(s1, s2)| Self::finish_variance(s1, s2, n, options.unbiased))
            .collect())
    }

    /// Standard deviation of all elements.
    pub fn standard_deviation(&self, options: VarianceOptions<T>) -> T {
        self.variance(options).sqrt()
    }

    /// Row or column standard deviations.
    pub fn standard_deviation_by(&self, by: By, options: VarianceOptions<Vec<T>>) -> Result<Vec<T>> {
        Ok(self
            .variance_by(by, options)?
            .into_iter()
            .map(|v| v.sqrt())
            .collect())
    }

    /// Subtract a center (the mean by default) from every element in place.
    pub fn center(&mut self, options: CenterOptions<T>) -> &mut Self {
        let c = options.center.unwrap_or_else(|| self.mean());
        for x in self.data.iter_mut() {
            *x = *x - c;
        }
        self
    }

    /// Subtract per-row or per-column centers in place.
    ///
    /// ```
    /// use densela::{By, Matrix};
    /// use densela::matrix::CenterOptions;
    /// let mut m = Matrix::from_2d(&[[1.0, 10.0], [3.0, 20.0]]).unwrap();
    /// m.center_by(By::Column, CenterOptions::default()).unwrap();
    /// assert_eq!(m.to_2d_array(), vec![vec![-1.0, -5.0], vec![1.0, 5.0]]);
    /// ```
    pub fn center_by(&mut self, by: By, options: CenterOptions<Vec<T>>) -> Result<&mut Self> {
        let center = match options.center {
            Some(c) => {
                self.check_len(by, &c)?;
                c
            }
            None => self.mean_by(by),
        };
        for k in 0..self.data.len() {
            let g = self.group(by, k);
            self.data[k] = self.data[k] - center[g];
        }
        Ok(self)
    }

    /// Root mean square with `n - 1`, the default scale.
    fn default_scale(sum_sq: T, n: usize) -> T {
        (sum_sq / Self::count(n.saturating_sub(1))).sqrt()
    }

    /// Divide every element by a scale in place. The default scale is
    /// `sqrt(sum(x^2) / (n - 1))`.
    pub fn scale(&mut self, options: ScaleOptions<T>) -> &mut Self {
        let s = options.scale.unwrap_or_else(|| {
            let sum_sq = self.data.iter().fold(T::zero(), |acc, &x| acc + x * x);
            Self::default_scale(sum_sq, self.size())
        });
        for x in self.data.iter_mut() {
            *x = *x / s;
        }
        self
    }

    /// Divide by per-row or per-column scales in place.
    pub fn scale_by(&mut self, by: By, options: ScaleOptions<Vec<T>>) -> Result<&mut Self> {
        let scale = match options.scale {
            Some(s) => {
                self.check_len(by, &s)?;
                s
            }
            None => {
                let n = self.group_len(by);
                let mut sum_sq = vec![T::zero(); if by == By::Row { self.rows } else { self.cols }];
                for (k, &x) in self.data.iter().enumerate() {
                    let g = self.group(by, k);
                    sum_sq[g] = sum_sq[g] + x * x;
                }
                sum_sq.into_iter().map(|s| Self::default_scale(s, n)).collect()
            }
        };
        for k in 0..self.data.len() {
            let g = self.group(by, k);
            self.data[k] = self.data[k] / scale[g];
        }
        Ok(self)
    }

    /// Frobenius or max norm.
    ///
    /// ```
    /// use densela::{Matrix, NormKind};
    /// let m = Matrix::from_2d(&[[3.0_f64, 0.0], [0.0, 4.0]]).unwrap();
    /// assert_eq!(m.norm(NormKind::Frobenius).unwrap(), 5.0);
    /// assert_eq!(m.norm(NormKind::Max).unwrap(), 4.0);
    /// ```
    pub fn norm(&self, kind: NormKind) -> Result<T> {
        match kind {
            NormKind::Frobenius => Ok(self.dot(self)?.sqrt()),
            NormKind::Max => self.max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn sample() -> Matrix<f64> {
        Matrix::from_2d(&[[1.0, 2.0, 3.0], [4.0, 6.0, 8.0]]).unwrap()
    }

    #[test]
    fn sums_and_products() {
        let m = sample();
        assert_eq!(m.sum(), 24.0);
        assert_eq!(m.sum_by(By::Row), vec![6.0, 18.0]);
        assert_eq!(m.sum_by(By::Column), vec![5.0, 8.0, 11.0]);
        assert_eq!(m.product(), 1152.0);
        assert_eq!(m.product_by(By::Row), vec![6.0, 192.0]);
        assert_eq!(m.trace(), 7.0);
    }

    #[test]
    fn means() {
        let m = sample();
        assert_eq!(m.mean(), 4.0);
        assert_eq!(m.mean_by(By::Row), vec![2.0, 6.0]);
        assert_eq!(m.mean_by(By::Column), vec![2.5, 4.0, 5.5]);
    }

    #[test]
    fn variance_by_axis() {
        let m = sample();
        let v = m.variance_by(By::Row, VarianceOptions::default()).unwrap();
        assert_near(v[0], 1.0, 1e-12, "row 0 variance");
        assert_near(v[1], 4.0, 1e-12, "row 1 variance");
        let biased = m
            .variance_by(By::Column, VarianceOptions { unbiased: false, mean: None })
            .unwrap();
        assert_near(biased[0], 2.25, 1e-12, "col 0 biased variance");
        let sd = m.standard_deviation_by(By::Row, VarianceOptions::default()).unwrap();
        assert_near(sd[1], 2.0, 1e-12, "row 1 sd");
    }

    #[test]
    fn variance_with_supplied_mean() {
        let m = sample();
        let opts = VarianceOptions { unbiased: true, mean: Some(vec![0.0]) };
        assert!(m.variance_by(By::Row, opts).is_err());
        let v = m.variance(VarianceOptions { unbiased: true, mean: Some(4.0) });
        assert_near(v, m.variance(VarianceOptions::default()), 1e-12, "same mean");
    }

    #[test]
    fn center_and_scale() {
        let mut m = sample();
        m.center(CenterOptions::default());
        assert_near(m.sum(), 0.0, 1e-12, "centered sum");

        let mut s = Matrix::from_2d(&[[3.0_f64], [4.0]]).unwrap();
        s.scale(ScaleOptions::default());
        // sqrt((9 + 16) / 1) = 5
        assert_near(s[(0, 0)], 0.6, 1e-12, "scaled");

        let mut c = sample();
        c.scale_by(By::Column, ScaleOptions { scale: Some(vec![1.0, 2.0, 4.0]) }).unwrap();
        assert_eq!(c.get_row(1).unwrap(), vec![4.0, 3.0, 2.0]);
        assert!(c.scale_by(By::Row, ScaleOptions { scale: Some(vec![1.0]) }).is_err());
    }

    #[test]
    fn extremes() {
        let m = Matrix::from_2d(&[[1.0, 9.0, 3.0], [9.0, -2.0, 0.0]]).unwrap();
        assert_eq!(m.max().unwrap(), 9.0);
        assert_eq!(m.max_index().unwrap(), (0, 1));
        assert_eq!(m.min_index().unwrap(), (1, 1));
        assert_eq!(m.max_by(By::Row).unwrap(), vec![9.0, 9.0]);
        assert_eq!(m.min_by(By::Column).unwrap(), vec![1.0, -2.0, 0.0]);
        assert_eq!(m.max_row_index(1).unwrap(), (0, 9.0));
        assert_eq!(m.min_column(2).unwrap(), 0.0);
        assert!(m.max_column(3).is_err());
        assert_eq!(Matrix::<f64>::new(0, 0).max().unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn dot_and_norm() {
        let a = Matrix::row_vector(&[1.0, 2.0, 2.0]);
        let b = Matrix::column_vector(&[1.0, 1.0, 1.0]);
        assert_eq!(a.dot(&b).unwrap(), 5.0);
        assert_eq!(a.norm(NormKind::Frobenius).unwrap(), 3.0);
        assert!(a.dot(&Matrix::row_vector(&[1.0])).is_err());
    }
}
