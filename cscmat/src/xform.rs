//! Building matrices from other sparse sources, optionally mapping values
//!
//! There are two paths. A concrete `SpMat` source copies its arrays and
//! maps the values in place. Any other [`SparseSource`] is consumed through
//! its triplet iterator in two passes: one to validate and count per
//! column, one to fill. Both end in the same zero-pruning step.

use cscmat_core::{
    checked_col_ptrs_len, checked_elem_count, CscError, MatrixElement, Result, SparseSource,
    COL_PTR_SENTINEL,
};
use tracing::debug;

use crate::buffer::{try_filled, try_vec};
use crate::config::StorageConfig;
use crate::matrix::SpMat;
use crate::sync::SyncState;

impl<T: MatrixElement> SpMat<T> {
    /// Copy any sparse source into CSC storage
    pub fn from_source<S>(source: &S) -> Result<Self>
    where
        S: SparseSource<Element = T>,
    {
        Self::transform_source(source, |v| v)
    }

    /// Build from any sparse source, mapping each value through `f`
    ///
    /// The source must yield in-bounds triplets in strict column-major
    /// order; a repeated location is a `DuplicateLocation` error and a
    /// step backwards is `UnsortedInput`.
    pub fn transform_source<S, U, F>(source: &S, f: F) -> Result<Self>
    where
        S: SparseSource<Element = U>,
        U: MatrixElement,
        F: Fn(U) -> T,
    {
        let (n_rows, n_cols) = (source.rows(), source.cols());
        checked_elem_count(n_rows, n_cols)?;

        let mut col_ptrs = try_filled(checked_col_ptrs_len(n_cols)?, 0usize)?;
        let mut count = 0;
        let mut prev: Option<usize> = None;
        for (position, (row, col, _)) in source.iter_nonzeros().enumerate() {
            if row >= n_rows || col >= n_cols {
                return Err(CscError::out_of_bounds(row, col, n_rows, n_cols));
            }
            let key = row + col * n_rows;
            match prev {
                Some(p) if key == p => return Err(CscError::DuplicateLocation { row, col }),
                Some(p) if key < p => return Err(CscError::UnsortedInput { position }),
                _ => {}
            }
            prev = Some(key);
            col_ptrs[col + 1] += 1;
            count += 1;
        }

        let mut values = try_vec(count + 1)?;
        let mut row_indices = try_vec(count + 1)?;
        for (row, _, value) in source.iter_nonzeros().take(count) {
            values.push(f(value));
            row_indices.push(row);
        }
        if values.len() != count {
            // The source yielded fewer triplets the second time.
            return Err(CscError::CorruptedData);
        }
        values.push(T::zero());
        row_indices.push(0);
        for c in 1..=n_cols {
            col_ptrs[c] += col_ptrs[c - 1];
        }
        col_ptrs[n_cols + 1] = COL_PTR_SENTINEL;

        let mut mat = Self::from_parts_unchecked(
            n_rows,
            n_cols,
            values,
            row_indices,
            col_ptrs,
            StorageConfig::default(),
        );
        mat.compact_zeros();
        debug!(nnz = mat.n_nonzero, "built matrix from generic source");
        Ok(mat)
    }

    /// New matrix with `f` applied to every stored value
    ///
    /// Copies the arrays directly when they are current; otherwise falls
    /// back to iterating the pending cache contents.
    pub fn transform<U, F>(&self, f: F) -> Result<SpMat<U>>
    where
        U: MatrixElement,
        F: Fn(T) -> U,
    {
        if self.state == SyncState::DirtyCache {
            return SpMat::transform_source(self, f);
        }
        let nnz = self.n_nonzero;
        let mut values = try_vec(nnz + 1)?;
        values.extend(self.stored_values().iter().map(|&v| f(v)));
        values.push(U::zero());
        let mut row_indices = try_vec(nnz + 1)?;
        row_indices.extend_from_slice(self.row_indices.as_slice());
        let mut col_ptrs = try_vec(self.col_ptrs.len())?;
        col_ptrs.extend_from_slice(&self.col_ptrs);

        let mut mat = SpMat::from_parts_unchecked(
            self.n_rows,
            self.n_cols,
            values,
            row_indices,
            col_ptrs,
            self.config.clone(),
        );
        mat.compact_zeros();
        Ok(mat)
    }
}

/// Borrowed coordinate-list view usable as a [`SparseSource`]
///
/// Construction sorts an index permutation into column-major order; the
/// underlying slices are not copied.
#[derive(Debug, Clone)]
pub struct TripletSource<'a, T> {
    n_rows: usize,
    n_cols: usize,
    locations: &'a [[usize; 2]],
    values: &'a [T],
    order: Vec<usize>,
}

impl<'a, T: MatrixElement> TripletSource<'a, T> {
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        locations: &'a [[usize; 2]],
        values: &'a [T],
    ) -> Result<Self> {
        if locations.len() != values.len() {
            return Err(CscError::DimensionMismatch {
                expected: locations.len(),
                found: values.len(),
            });
        }
        let mut order = try_vec(locations.len())?;
        order.extend(0..locations.len());
        order.sort_by_key(|&i| (locations[i][1], locations[i][0]));
        Ok(Self {
            n_rows,
            n_cols,
            locations,
            values,
            order,
        })
    }
}

/// Iterator for [`TripletSource`]
pub struct TripletIter<'s, T> {
    source: &'s [[usize; 2]],
    values: &'s [T],
    order: std::slice::Iter<'s, usize>,
}

impl<T: MatrixElement> Iterator for TripletIter<'_, T> {
    type Item = (usize, usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        let &i = self.order.next()?;
        let [row, col] = self.source[i];
        Some((row, col, self.values[i]))
    }
}

impl<'a, T: MatrixElement> SparseSource for TripletSource<'a, T> {
    type Element = T;
    type Iter<'s> = TripletIter<'s, T> where Self: 's;

    fn rows(&self) -> usize {
        self.n_rows
    }

    fn cols(&self) -> usize {
        self.n_cols
    }

    fn nonzero_count(&self) -> usize {
        self.order.len()
    }

    fn iter_nonzeros(&self) -> TripletIter<'_, T> {
        TripletIter {
            source: self.locations,
            values: self.values,
            order: self.order.iter(),
        }
    }
}
