//! Core matrix abstraction traits
//!
//! This module defines the read-side interfaces shared by every sparse
//! matrix representation: element lookup and lazy nonzero enumeration.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use super::element::MatrixElement;

/// Core sparse matrix trait for format-agnostic access
///
/// This trait provides the minimal interface that all sparse matrix
/// implementations must provide, regardless of storage layout.
pub trait SparseMatrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get an element at the specified position
    ///
    /// Returns `None` if the element is zero (not stored) or if the
    /// position is out of bounds.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of non-zero elements stored
    fn nnz(&self) -> usize;
}

/// Extension trait for dense row/column extraction (requires alloc feature)
#[cfg(feature = "alloc")]
pub trait MatrixOperations: SparseMatrix {
    /// Get a row as a dense vector of length `cols`
    fn get_row(&self, row_index: usize) -> Vec<Self::Element>;

    /// Get a column as a dense vector of length `rows`
    fn get_col(&self, col_index: usize) -> Vec<Self::Element>;
}

/// A read-only producer of nonzero triplets
///
/// Anything that can enumerate its nonzeros in column-major order can be
/// used as the source of a CSC build. Implementations must yield each
/// location at most once; zero values may be yielded and are dropped by
/// the consumer.
pub trait SparseSource {
    /// The element type produced by this source
    type Element: MatrixElement;

    /// Iterator over `(row, col, value)` triplets in column-major order
    type Iter<'a>: Iterator<Item = (usize, usize, Self::Element)>
    where
        Self: 'a;

    /// Number of rows of the source
    fn rows(&self) -> usize;

    /// Number of columns of the source
    fn cols(&self) -> usize;

    /// Upper bound on the number of triplets `iter_nonzeros` yields
    fn nonzero_count(&self) -> usize;

    /// Lazily enumerate the stored triplets
    fn iter_nonzeros(&self) -> Self::Iter<'_>;
}
