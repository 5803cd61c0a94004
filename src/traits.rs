use core::fmt::Debug;
use num_traits::{Float, Num, NumCast, PrimInt};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all primitive integer types. `Send + Sync` lets
/// the `parallel` feature split products across threads.
pub trait Scalar: Copy + PartialEq + PartialOrd + Debug + Num + NumCast + Send + Sync {}

impl<T: Copy + PartialEq + PartialOrd + Debug + Num + NumCast + Send + Sync> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by operations that need `sqrt`, `sin`, `abs`, etc.
/// (decompositions, statistics, elementwise math).
pub trait FloatScalar: Scalar + Float {}

impl<T: Scalar + Float> FloatScalar for T {}

/// Trait for integer matrix elements.
///
/// Required by the bitwise family (`and`, `or`, `xor`, shifts).
pub trait IntScalar: Scalar + PrimInt {}

impl<T: Scalar + PrimInt> IntScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Implemented by [`Matrix`](crate::Matrix), every
/// [`MatrixView`](crate::view::MatrixView) and the slice wrappers, so the
/// decompositions and free functions accept any of them.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access. Writing through a view
/// writes into the matrix it borrows.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}
