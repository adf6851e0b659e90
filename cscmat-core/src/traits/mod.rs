//! Abstract interfaces for CSC storage
//!
//! Traits are pure interfaces - no concrete implementations.

pub mod element;
pub mod matrix;
pub mod random;

pub use element::MatrixElement;
#[cfg(feature = "alloc")]
pub use matrix::MatrixOperations;
pub use matrix::{SparseMatrix, SparseSource};
pub use random::{UnitSource, ValueSource};
