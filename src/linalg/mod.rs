//! Dense decompositions and the solvers built on them.
//!
//! Every decomposition copies its input into an owned working matrix, so
//! it accepts a [`Matrix`](crate::Matrix), any
//! [`MatrixView`](crate::MatrixView) or a slice wrapper. Constructors only
//! check shape preconditions; numerical degeneracy is reported by the
//! `solve` methods and the `is_*` predicates.
//!
//! | Type | Factorization | Fails at construction on |
//! |---|---|---|
//! | [`LuDecomposition`] | `P·A = L·U` (Crout, partial pivoting) | never |
//! | [`QrDecomposition`] | `A = Q·R` (Householder) | never |
//! | [`SingularValueDecomposition`] | `A = U·S·Vᵗ` (Golub–Reinsch) | iteration guard |
//! | [`EigenvalueDecomposition`] | `A·V = V·D` | empty, not square, iteration guard |
//! | [`CholeskyDecomposition`] | `A = L·Lᵗ` | not symmetric |
//!
//! The free functions [`solve`], [`inverse`] and [`determinant`] pick a
//! decomposition for you.

pub(crate) mod cholesky;
pub(crate) mod evd;
mod functions;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod svd;

pub use cholesky::CholeskyDecomposition;
pub use evd::{EigenvalueDecomposition, EvdOptions};
pub use functions::{
    correlation, correlation_self, covariance, covariance_self, determinant, inverse,
    linear_dependencies, pseudo_inverse, pseudo_inverse_default, solve, CorrelationOptions,
    CovarianceOptions, LinearDependenciesOptions,
};
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;
pub use svd::{SingularValueDecomposition, SvdOptions};

use crate::traits::FloatScalar;

/// `sqrt(a² + b²)` without destructive underflow or overflow.
///
/// ```
/// use densela::linalg::hypotenuse;
/// assert_eq!(hypotenuse(3.0_f64, 4.0), 5.0);
/// assert_eq!(hypotenuse(0.0_f64, 0.0), 0.0);
/// assert!(hypotenuse(1e200_f64, 1e200).is_finite());
/// ```
pub fn hypotenuse<T: FloatScalar>(a: T, b: T) -> T {
    if a.abs() > b.abs() {
        let r = b / a;
        a.abs() * (T::one() + r * r).sqrt()
    } else if b != T::zero() {
        let r = a / b;
        b.abs() * (T::one() + r * r).sqrt()
    } else {
        T::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypotenuse_is_symmetric() {
        assert_eq!(hypotenuse(-5.0_f64, 12.0), 13.0);
        assert_eq!(hypotenuse(12.0_f64, -5.0), 13.0);
        assert_eq!(hypotenuse(0.0_f32, -2.0), 2.0);
    }
}
