use thiserror::Error;

/// Errors returned by matrix construction, manipulation and decompositions.
///
/// Decomposition constructors only fail on shape preconditions (empty,
/// non-square, non-symmetric). Numerical degeneracy surfaces later, when
/// `solve` is called on a singular, rank-deficient or non positive-definite
/// factorization.
///
/// ```
/// use densela::{Matrix, MatrixError};
/// use densela::linalg::LuDecomposition;
///
/// let singular = Matrix::from_2d(&[[1.0_f64, 2.0], [2.0, 4.0]]).unwrap();
/// let lu = LuDecomposition::new(&singular);
/// assert!(lu.is_singular());
/// assert_eq!(lu.solve(&Matrix::<f64>::eye(2)).unwrap_err(), MatrixError::Singular);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MatrixError {
    /// A constructor argument is malformed (e.g. an empty 2D array).
    #[error("{reason}")]
    InvalidArgument { reason: &'static str },

    /// Input data does not have the shape of the requested kind of value.
    #[error("{reason}")]
    TypeArgument { reason: &'static str },

    /// Operand shapes are incompatible.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    DimensionMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Got `(rows, cols)`.
        got: (usize, usize),
    },

    /// A row, column or sub-matrix index is outside the matrix.
    #[error("{reason}")]
    OutOfRange { reason: &'static str },

    /// `LuDecomposition::solve` on a factorization with a zero pivot.
    #[error("LU matrix is singular")]
    Singular,

    /// `QrDecomposition::solve` on a factorization with a zero `R` diagonal.
    #[error("Matrix is rank deficient")]
    RankDeficient,

    /// `CholeskyDecomposition::solve` on a non positive-definite input.
    #[error("Matrix is not positive definite")]
    NotPositiveDefinite,

    /// The operation requires a square matrix.
    #[error("Matrix is not a square matrix")]
    NotSquare,

    /// The operation requires a symmetric matrix.
    #[error("Matrix is not symmetric")]
    NotSymmetric,

    /// The operation requires at least one element.
    #[error("Matrix must be non-empty")]
    Empty,

    /// An options struct holds inconsistent values.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },

    /// An iterative sweep exceeded its iteration guard.
    #[error("iterative algorithm did not converge")]
    ConvergenceFailure,
}

impl MatrixError {
    pub(crate) fn mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        MatrixError::DimensionMismatch { expected, got }
    }

    pub(crate) fn out_of_range(reason: &'static str) -> Self {
        MatrixError::OutOfRange { reason }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MatrixError>;
