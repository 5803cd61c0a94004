//! # densela
//!
//! Dense row-major matrices and the classical decompositions built on them:
//! LU, QR, singular value, eigenvalue and Cholesky. Factorizations run
//! eagerly in the constructor and expose their factors as read-only
//! accessors; `solve` is where numerical degeneracy is reported.
//!
//! ## Quick start
//!
//! ```
//! use densela::Matrix;
//! use densela::linalg::{self, LuDecomposition};
//!
//! // Solve a linear system Ax = b
//! let a = Matrix::from_2d(&[
//!     [2.0_f64, 1.0, -1.0],
//!     [-3.0, -1.0, 2.0],
//!     [-2.0, 1.0, 2.0],
//! ]).unwrap();
//! let b = Matrix::column_vector(&[8.0, -11.0, -3.0]);
//! let x = linalg::solve(&a, &b, false).unwrap(); // x = [2, 3, -1]
//! assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
//!
//! let lu = LuDecomposition::new(&a);
//! assert!((lu.determinant().unwrap() - -1.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`] — `Matrix<T>` with runtime dimensions and `Vec<T>` row-major
//!   storage. Constructors, in-place elementwise arithmetic with scalar or
//!   matrix operands, unary math, reductions by row / column / whole matrix,
//!   structural edits, `mmul` and Strassen products, predicates, echelon
//!   forms and aligned `Display`.
//!
//! - [`view`] — Zero-copy windows onto a matrix (row, column, sub-matrix,
//!   transpose, selections, flips) and wrappers over flat or nested slices.
//!   Writes through a mutable view land in the base matrix.
//!
//! - [`linalg`] — [`LuDecomposition`](linalg::LuDecomposition) (Crout, partial
//!   pivoting), [`QrDecomposition`](linalg::QrDecomposition) (Householder),
//!   [`SingularValueDecomposition`](linalg::SingularValueDecomposition)
//!   (Golub-Reinsch), [`EigenvalueDecomposition`](linalg::EigenvalueDecomposition)
//!   (tridiagonal QL or Hessenberg + real Schur) and
//!   [`CholeskyDecomposition`](linalg::CholeskyDecomposition). Free functions
//!   `solve`, `inverse`, `determinant`, `pseudo_inverse`,
//!   `linear_dependencies`, `covariance` and `correlation`.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — all matrix elements (primitive ints and floats)
//!   - [`FloatScalar`] — real floats, used by math, statistics and decompositions
//!   - [`IntScalar`] — primitive ints, used by the bitwise family
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! - [`error`] — [`MatrixError`] and the crate [`Result`] alias.
//!
//! ## Cargo features
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `serde`    | no      | `Serialize` / `Deserialize` for `Matrix` as a nested array |
//! | `parallel` | no      | Row-parallel `mmul` via `rayon` |
//! | `all`      | no      | `serde` + `parallel` |

pub mod error;
pub mod linalg;
pub mod matrix;
pub mod traits;
pub mod view;

pub use error::{MatrixError, Result};
pub use matrix::aliases::{Matrixf32, Matrixf64, Matrixi32, Matrixi64, Matrixu32, Matrixu64};
pub use matrix::{By, IntoMatrix, Matrix, NormKind, Operand};
pub use traits::{FloatScalar, IntScalar, MatrixMut, MatrixRef, Scalar};
pub use view::{wrap_1d, wrap_2d, MatrixSlice, MatrixView, NestedSlice};
