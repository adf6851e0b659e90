//! The CSC store
//!
//! `SpMat<T>` keeps three arrays:
//!
//! - `values[..n_nonzero]`: nonzero values in column-major order, followed
//!   by one zero sentinel slot
//! - `row_indices[..n_nonzero]`: the row of each value, strictly increasing
//!   within a column, followed by a `0` sentinel slot
//! - `col_ptrs[..=n_cols]`: `col_ptrs[c]..col_ptrs[c + 1]` is the slice of
//!   column `c`, followed by a `usize::MAX` sentinel
//!
//! A cache overlay (see [`crate::cache`]) may hold writes that are not yet
//! reflected in the arrays; reads on `&self` consult it when it is
//! authoritative, and every `&mut self` operation that works on the arrays
//! materializes it first.

use cscmat_core::{
    checked_col_ptrs_len, checked_elem_count, CscError, MatrixElement, MatrixOperations, Result,
    SparseMatrix, SparseSource, COL_PTR_SENTINEL,
};
use tracing::debug;

use crate::buffer::{try_filled, try_vec, ChunkedBuf};
use crate::cache::CacheMap;
use crate::config::StorageConfig;
use crate::iter::{ColIter, Iter};
use crate::sync::SyncState;

/// Sparse matrix in compressed sparse column form
#[derive(Debug, Clone)]
pub struct SpMat<T: MatrixElement> {
    pub(crate) n_rows: usize,
    pub(crate) n_cols: usize,
    pub(crate) n_elem: usize,
    pub(crate) n_nonzero: usize,
    pub(crate) values: ChunkedBuf<T>,
    pub(crate) row_indices: ChunkedBuf<usize>,
    pub(crate) col_ptrs: Vec<usize>,
    pub(crate) cache: CacheMap<T>,
    pub(crate) state: SyncState,
    pub(crate) config: StorageConfig,
}

impl<T: MatrixElement> SpMat<T> {
    /// Create an empty `n_rows x n_cols` matrix
    pub fn new(n_rows: usize, n_cols: usize) -> Result<Self> {
        Self::with_config(n_rows, n_cols, StorageConfig::default())
    }

    /// Create an empty matrix carrying a specific configuration
    pub fn with_config(n_rows: usize, n_cols: usize, config: StorageConfig) -> Result<Self> {
        let mut mat = Self::empty(config);
        mat.init_storage(n_rows, n_cols)?;
        Ok(mat)
    }

    /// 0x0 matrix
    pub(crate) fn empty(config: StorageConfig) -> Self {
        let chunk = config.chunk_size;
        Self {
            n_rows: 0,
            n_cols: 0,
            n_elem: 0,
            n_nonzero: 0,
            values: ChunkedBuf::from_vec(vec![T::zero()], chunk),
            row_indices: ChunkedBuf::from_vec(vec![0], chunk),
            col_ptrs: vec![0, COL_PTR_SENTINEL],
            cache: CacheMap::new(),
            state: SyncState::CleanCsc,
            config,
        }
    }

    /// Identity-like matrix: ones on the main diagonal of an `n_rows x n_cols` shape
    pub fn eye(n_rows: usize, n_cols: usize) -> Result<Self> {
        checked_elem_count(n_rows, n_cols)?;
        let n_ptrs = checked_col_ptrs_len(n_cols)?;
        let n = n_rows.min(n_cols);

        let mut values = try_filled(n + 1, T::one())?;
        values[n] = T::zero();
        let mut row_indices = try_vec(n + 1)?;
        row_indices.extend(0..n);
        row_indices.push(0);

        let mut col_ptrs = try_vec(n_ptrs)?;
        col_ptrs.extend((0..=n_cols).map(|c| c.min(n)));
        col_ptrs.push(COL_PTR_SENTINEL);

        Ok(Self::from_parts_unchecked(
            n_rows,
            n_cols,
            values,
            row_indices,
            col_ptrs,
            StorageConfig::default(),
        ))
    }

    /// Build from validated CSC arrays
    ///
    /// `row_indices` and `values` hold exactly the nonzeros; `col_ptrs` has
    /// `n_cols + 1` entries. Every storage invariant is checked, so this is
    /// the entry point for external decoders.
    pub fn from_csc_parts(
        n_rows: usize,
        n_cols: usize,
        mut row_indices: Vec<usize>,
        mut col_ptrs: Vec<usize>,
        mut values: Vec<T>,
    ) -> Result<Self> {
        checked_elem_count(n_rows, n_cols)?;
        if row_indices.len() != values.len() {
            return Err(CscError::DimensionMismatch {
                expected: values.len(),
                found: row_indices.len(),
            });
        }
        let expected_ptrs = n_cols.checked_add(1).ok_or(CscError::SizeOverflow)?;
        if col_ptrs.len() != expected_ptrs {
            return Err(CscError::DimensionMismatch {
                expected: expected_ptrs,
                found: col_ptrs.len(),
            });
        }
        validate_arrays(n_rows, n_cols, &values, &row_indices, &col_ptrs)?;

        values
            .try_reserve_exact(1)
            .map_err(|_| CscError::AllocationFailure)?;
        row_indices
            .try_reserve_exact(1)
            .map_err(|_| CscError::AllocationFailure)?;
        col_ptrs
            .try_reserve_exact(1)
            .map_err(|_| CscError::AllocationFailure)?;
        values.push(T::zero());
        row_indices.push(0);
        col_ptrs.push(COL_PTR_SENTINEL);

        Ok(Self::from_parts_unchecked(
            n_rows,
            n_cols,
            values,
            row_indices,
            col_ptrs,
            StorageConfig::default(),
        ))
    }

    /// Assemble from arrays that already carry their sentinels
    pub(crate) fn from_parts_unchecked(
        n_rows: usize,
        n_cols: usize,
        values: Vec<T>,
        row_indices: Vec<usize>,
        col_ptrs: Vec<usize>,
        config: StorageConfig,
    ) -> Self {
        debug_assert_eq!(values.len(), row_indices.len());
        debug_assert_eq!(col_ptrs.len(), n_cols + 2);
        let chunk = config.chunk_size;
        Self {
            n_rows,
            n_cols,
            n_elem: n_rows * n_cols,
            n_nonzero: values.len() - 1,
            values: ChunkedBuf::from_vec(values, chunk),
            row_indices: ChunkedBuf::from_vec(row_indices, chunk),
            col_ptrs,
            cache: CacheMap::new(),
            state: SyncState::CleanCsc,
            config,
        }
    }

    /// Build from `(row, col, value)` triplets already in strict column-major
    /// order and in bounds. Zero values are skipped.
    pub(crate) fn from_sorted_triplets<I>(
        n_rows: usize,
        n_cols: usize,
        capacity: usize,
        triplets: I,
        config: StorageConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        checked_elem_count(n_rows, n_cols)?;
        let mut values = try_vec(capacity + 1)?;
        let mut row_indices = try_vec(capacity + 1)?;
        let mut col_ptrs = try_filled(checked_col_ptrs_len(n_cols)?, 0usize)?;

        let mut prev: Option<usize> = None;
        for (row, col, value) in triplets {
            debug_assert!(row < n_rows && col < n_cols);
            let key = row + col * n_rows;
            debug_assert!(prev.map_or(true, |p| p < key));
            prev = Some(key);

            if value.is_zero() {
                continue;
            }
            values.push(value);
            row_indices.push(row);
            col_ptrs[col + 1] += 1;
        }
        values.push(T::zero());
        row_indices.push(0);
        for c in 1..=n_cols {
            col_ptrs[c] += col_ptrs[c - 1];
        }
        col_ptrs[n_cols + 1] = COL_PTR_SENTINEL;

        Ok(Self::from_parts_unchecked(
            n_rows,
            n_cols,
            values,
            row_indices,
            col_ptrs,
            config,
        ))
    }

    /// Reset to an empty `n_rows x n_cols` matrix
    pub(crate) fn init_storage(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        let n_elem = checked_elem_count(n_rows, n_cols)?;
        let chunk = self.config.chunk_size;
        let values = ChunkedBuf::filled(1, T::zero(), chunk)?;
        let row_indices = ChunkedBuf::filled(1, 0, chunk)?;
        let mut col_ptrs = try_filled(checked_col_ptrs_len(n_cols)?, 0)?;
        col_ptrs[n_cols + 1] = COL_PTR_SENTINEL;

        self.invalidate_cache();
        self.n_rows = n_rows;
        self.n_cols = n_cols;
        self.n_elem = n_elem;
        self.n_nonzero = 0;
        self.values = values;
        self.row_indices = row_indices;
        self.col_ptrs = col_ptrs;
        Ok(())
    }

    /// Take over the storage of a freshly built matrix
    pub(crate) fn adopt(&mut self, other: Self) {
        self.invalidate_cache();
        self.take_arrays(other);
    }

    /// Move the CSC arrays and shape of `other` in, leaving the cache alone
    pub(crate) fn take_arrays(&mut self, mut other: Self) {
        debug_assert!(other.state != SyncState::DirtyCache);
        self.n_rows = other.n_rows;
        self.n_cols = other.n_cols;
        self.n_elem = other.n_elem;
        self.n_nonzero = other.n_nonzero;
        self.values = other.values.take();
        self.row_indices = other.row_indices.take();
        self.col_ptrs = std::mem::take(&mut other.col_ptrs);
    }

    /// Move `donor`'s contents into `self`, leaving `donor` as a 0x0 matrix
    pub fn steal(&mut self, donor: &mut Self) -> Result<()> {
        donor.sync_csc()?;
        let config = donor.config.clone();
        let emptied = std::mem::replace(donor, Self::empty(config));
        self.adopt(emptied);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.n_rows
    }

    pub fn cols(&self) -> usize {
        self.n_cols
    }

    /// Total element count `rows * cols`
    pub fn size(&self) -> usize {
        self.n_elem
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored nonzeros
    pub fn nonzero_count(&self) -> usize {
        if self.state == SyncState::DirtyCache {
            self.cache.len()
        } else {
            self.n_nonzero
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Replace the configuration; affects future allocations only
    pub fn set_config(&mut self, config: StorageConfig) {
        self.config = config;
    }

    /// Element at `(row, col)`, zero when not stored
    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        self.check_location(row, col)?;
        Ok(self.get(row, col))
    }

    /// Element at linear index `row + col * rows`
    pub fn at_linear(&self, index: usize) -> Result<T> {
        if index >= self.n_elem {
            return Err(CscError::IndexOutOfBounds {
                index,
                len: self.n_elem,
            });
        }
        Ok(self.get(index % self.n_rows, index / self.n_rows))
    }

    /// Element lookup without a bounds error; location must be in range
    pub(crate) fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.n_rows && col < self.n_cols);
        if self.state == SyncState::DirtyCache {
            return self.cache.get(row + col * self.n_rows);
        }
        match self.find(row, col) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    /// Position of `(row, col)` in the arrays, or where it would be inserted
    pub(crate) fn find(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let start = self.col_ptrs[col];
        let end = self.col_ptrs[col + 1];
        self.row_indices.as_slice()[start..end]
            .binary_search(&row)
            .map(|i| start + i)
            .map_err(|i| start + i)
    }

    pub(crate) fn check_location(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(CscError::out_of_bounds(row, col, self.n_rows, self.n_cols));
        }
        Ok(())
    }

    /// Stored values, excluding the sentinel
    pub(crate) fn stored_values(&self) -> &[T] {
        &self.values.as_slice()[..self.n_nonzero]
    }

    pub(crate) fn stored_rows(&self) -> &[usize] {
        &self.row_indices.as_slice()[..self.n_nonzero]
    }

    /// Row and column of the `index`-th stored nonzero in column-major order
    ///
    /// With clean arrays this is a binary search over the column pointers.
    /// While the cache is dirty each call ranks the cache keys afresh, which
    /// is linear in the nonzero count, so walk positions after [`SpMat::sync`].
    pub fn get_position(&self, index: usize) -> Result<(usize, usize)> {
        let len = self.nonzero_count();
        if index >= len {
            return Err(CscError::IndexOutOfBounds { index, len });
        }
        if self.state == SyncState::DirtyCache {
            let key = self
                .cache
                .nth_key(index)
                .ok_or(CscError::IndexOutOfBounds { index, len })?;
            return Ok((key % self.n_rows, key / self.n_rows));
        }
        let col = self.col_ptrs[..=self.n_cols].partition_point(|&p| p <= index) - 1;
        Ok((self.row_indices[index], col))
    }

    /// Change shape, discarding all nonzeros; equal shape is a no-op
    pub fn set_size(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        if (n_rows, n_cols) == self.shape() {
            return Ok(());
        }
        self.init_storage(n_rows, n_cols)
    }

    /// Discard all nonzeros and adopt a new shape
    pub fn zeros_with_shape(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        self.init_storage(n_rows, n_cols)
    }

    /// Discard all nonzeros, keep the shape
    pub fn zeros(&mut self) -> Result<()> {
        self.init_storage(self.n_rows, self.n_cols)
    }

    /// Become a 0x0 matrix
    pub fn reset(&mut self) -> Result<()> {
        self.init_storage(0, 0)
    }

    /// Nonzeros in column-major order
    pub fn iter(&self) -> Iter<'_, T> {
        if self.state == SyncState::DirtyCache {
            return Iter::cache(self.cache.sorted_entries(), self.n_rows);
        }
        Iter::csc(
            self.stored_values(),
            self.stored_rows(),
            &self.col_ptrs[..=self.n_cols],
        )
    }

    /// Nonzeros of one column as `(row, value)`
    pub fn col_iter(&self, col: usize) -> Result<ColIter<'_, T>> {
        if col >= self.n_cols {
            return Err(CscError::IndexOutOfBounds {
                index: col,
                len: self.n_cols,
            });
        }
        if self.state == SyncState::DirtyCache {
            let start = col * self.n_rows;
            let entries = self.cache.sorted_range(start, start + self.n_rows);
            return Ok(ColIter::cache(entries, self.n_rows));
        }
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        Ok(ColIter::csc(
            &self.values.as_slice()[range.clone()],
            &self.row_indices.as_slice()[range],
        ))
    }

    /// Re-derive every storage invariant from the arrays
    pub fn check_invariants(&self) -> Result<()> {
        let nnz = self.n_nonzero;
        if self.values.len() != nnz + 1
            || self.row_indices.len() != nnz + 1
            || self.col_ptrs.len() != self.n_cols + 2
        {
            return Err(CscError::CorruptedData);
        }
        if !self.values[nnz].is_zero()
            || self.row_indices[nnz] != 0
            || self.col_ptrs[self.n_cols + 1] != COL_PTR_SENTINEL
            || self.n_elem != self.n_rows * self.n_cols
        {
            return Err(CscError::CorruptedData);
        }
        validate_arrays(
            self.n_rows,
            self.n_cols,
            self.stored_values(),
            self.stored_rows(),
            &self.col_ptrs[..=self.n_cols],
        )
    }

    pub fn is_empty(&self) -> bool {
        self.n_elem == 0
    }

    pub fn is_vec(&self) -> bool {
        self.n_rows == 1 || self.n_cols == 1
    }

    pub fn is_rowvec(&self) -> bool {
        self.n_rows == 1
    }

    pub fn is_colvec(&self) -> bool {
        self.n_cols == 1
    }

    pub fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    pub fn in_range(&self, row: usize, col: usize) -> bool {
        row < self.n_rows && col < self.n_cols
    }

    pub fn in_range_linear(&self, index: usize) -> bool {
        index < self.n_elem
    }

    /// True when no stored value is infinite or NaN
    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, _, v)| v.is_finite())
    }

    pub fn has_nan(&self) -> bool {
        self.iter().any(|(_, _, v)| v.is_nan())
    }

    pub fn has_inf(&self) -> bool {
        self.iter().any(|(_, _, v)| v.is_infinite())
    }

    pub(crate) fn log_rebuild(&self, op: &'static str) {
        debug!(
            op,
            rows = self.n_rows,
            cols = self.n_cols,
            nnz = self.n_nonzero,
            "rebuilt CSC arrays"
        );
    }
}

/// Check the CSC invariants over arrays without sentinels
pub(crate) fn validate_arrays<T: MatrixElement>(
    n_rows: usize,
    n_cols: usize,
    values: &[T],
    row_indices: &[usize],
    col_ptrs: &[usize],
) -> Result<()> {
    let nnz = values.len();
    if row_indices.len() != nnz || col_ptrs.len() != n_cols + 1 {
        return Err(CscError::CorruptedData);
    }
    if col_ptrs[0] != 0 || col_ptrs[n_cols] != nnz {
        return Err(CscError::CorruptedData);
    }
    for col in 0..n_cols {
        let (start, end) = (col_ptrs[col], col_ptrs[col + 1]);
        if start > end || end > nnz {
            return Err(CscError::CorruptedData);
        }
        let rows = &row_indices[start..end];
        if rows.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CscError::CorruptedData);
        }
        if let Some(&last) = rows.last() {
            if last >= n_rows {
                return Err(CscError::out_of_bounds(last, col, n_rows, n_cols));
            }
        }
    }
    if values.iter().any(|v| v.is_zero()) {
        return Err(CscError::CorruptedData);
    }
    Ok(())
}

impl<T: MatrixElement> Default for SpMat<T> {
    fn default() -> Self {
        Self::empty(StorageConfig::default())
    }
}

/// Equal shapes and equal nonzeros; representation state is ignored
impl<T: MatrixElement> PartialEq for SpMat<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.nonzero_count() == other.nonzero_count()
            && self.iter().eq(other.iter())
    }
}

impl<T: MatrixElement> SparseMatrix for SpMat<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        self.at(row, col).ok().filter(|v| !v.is_zero())
    }

    fn dimensions(&self) -> (usize, usize) {
        self.shape()
    }

    fn nnz(&self) -> usize {
        self.nonzero_count()
    }
}

impl<T: MatrixElement> MatrixOperations for SpMat<T> {
    fn get_row(&self, row_index: usize) -> Vec<T> {
        if row_index >= self.n_rows {
            return Vec::new();
        }
        (0..self.n_cols).map(|c| self.get(row_index, c)).collect()
    }

    fn get_col(&self, col_index: usize) -> Vec<T> {
        let mut dense = vec![T::zero(); self.n_rows];
        if let Ok(col) = self.col_iter(col_index) {
            for (row, value) in col {
                dense[row] = value;
            }
        } else {
            dense.clear();
        }
        dense
    }
}

impl<T: MatrixElement> SparseSource for SpMat<T> {
    type Element = T;
    type Iter<'a> = Iter<'a, T> where Self: 'a;

    fn rows(&self) -> usize {
        self.n_rows
    }

    fn cols(&self) -> usize {
        self.n_cols
    }

    fn nonzero_count(&self) -> usize {
        SpMat::nonzero_count(self)
    }

    fn iter_nonzeros(&self) -> Iter<'_, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpMat<f64> {
        // [1 0 0]
        // [0 0 3]
        // [2 0 4]
        SpMat::from_csc_parts(3, 3, vec![0, 2, 1, 2], vec![0, 2, 2, 4], vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
    }

    #[test]
    fn test_new_layout() {
        let mat = SpMat::<f64>::new(4, 3).unwrap();
        assert_eq!(mat.shape(), (4, 3));
        assert_eq!(mat.size(), 12);
        assert_eq!(mat.nonzero_count(), 0);
        assert_eq!(mat.col_ptrs, vec![0, 0, 0, 0, COL_PTR_SENTINEL]);
        assert_eq!(mat.values.as_slice(), &[0.0]);
        assert_eq!(mat.row_indices.as_slice(), &[0]);
        mat.check_invariants().unwrap();
    }

    #[test]
    fn test_new_overflow() {
        assert_eq!(
            SpMat::<f32>::new(usize::MAX, 2).unwrap_err(),
            CscError::SizeOverflow
        );
    }

    #[test]
    fn test_default_is_empty() {
        let mat = SpMat::<i32>::default();
        assert!(mat.is_empty());
        assert_eq!(mat.shape(), (0, 0));
        mat.check_invariants().unwrap();
    }

    #[test]
    fn test_at() {
        let mat = sample();
        assert_eq!(mat.at(0, 0), Ok(1.0));
        assert_eq!(mat.at(2, 0), Ok(2.0));
        assert_eq!(mat.at(1, 0), Ok(0.0));
        assert_eq!(mat.at(1, 1), Ok(0.0));
        assert_eq!(mat.at(2, 2), Ok(4.0));
        assert_eq!(mat.at_linear(7), Ok(3.0));
        assert_eq!(
            mat.at(3, 0),
            Err(CscError::OutOfBounds {
                row: 3,
                col: 0,
                n_rows: 3,
                n_cols: 3
            })
        );
        assert!(mat.at_linear(9).is_err());
    }

    #[test]
    fn test_get_position() {
        let mat = sample();
        assert_eq!(mat.get_position(0), Ok((0, 0)));
        assert_eq!(mat.get_position(1), Ok((2, 0)));
        // column 1 is empty
        assert_eq!(mat.get_position(2), Ok((1, 2)));
        assert_eq!(mat.get_position(3), Ok((2, 2)));
        assert!(mat.get_position(4).is_err());
    }

    #[test]
    fn test_get_position_with_dirty_cache() {
        let mut mat = sample();
        mat.elem_mut(0, 1).unwrap().set(5.0);
        mat.elem_mut(2, 0).unwrap().set(0.0);
        mat.elem_mut(0, 2).unwrap().set(6.0);
        assert_eq!(mat.sync_state(), SyncState::DirtyCache);

        let dirty: Vec<_> = (0..mat.nonzero_count())
            .map(|i| mat.get_position(i).unwrap())
            .collect();
        assert_eq!(dirty, vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]);
        assert!(mat.get_position(5).is_err());

        mat.sync().unwrap();
        let synced: Vec<_> = (0..mat.nonzero_count())
            .map(|i| mat.get_position(i).unwrap())
            .collect();
        assert_eq!(synced, dirty);
    }

    #[test]
    fn test_iter_column_major() {
        let mat = sample();
        let triplets: Vec<_> = mat.iter().collect();
        assert_eq!(
            triplets,
            vec![(0, 0, 1.0), (2, 0, 2.0), (1, 2, 3.0), (2, 2, 4.0)]
        );
        assert_eq!(mat.col_iter(1).unwrap().count(), 0);
        assert_eq!(
            mat.col_iter(2).unwrap().collect::<Vec<_>>(),
            vec![(1, 3.0), (2, 4.0)]
        );
        assert!(mat.col_iter(3).is_err());
    }

    #[test]
    fn test_from_csc_parts_rejects_bad_arrays() {
        // unsorted rows within a column
        assert_eq!(
            SpMat::from_csc_parts(3, 1, vec![2, 0], vec![0, 2], vec![1.0, 2.0]).unwrap_err(),
            CscError::CorruptedData
        );
        // explicit zero
        assert_eq!(
            SpMat::from_csc_parts(3, 1, vec![0], vec![0, 1], vec![0.0]).unwrap_err(),
            CscError::CorruptedData
        );
        // pointer count disagrees with nnz
        assert_eq!(
            SpMat::from_csc_parts(3, 1, vec![0], vec![0, 2], vec![1.0]).unwrap_err(),
            CscError::CorruptedData
        );
        // row out of range
        assert!(matches!(
            SpMat::from_csc_parts(2, 1, vec![5], vec![0, 1], vec![1.0]).unwrap_err(),
            CscError::OutOfBounds { row: 5, .. }
        ));
        // wrong number of pointers
        assert!(matches!(
            SpMat::<f64>::from_csc_parts(2, 2, vec![], vec![0, 0], vec![]).unwrap_err(),
            CscError::DimensionMismatch { .. }
        ));
    }

    #[test]
    fn test_eye() {
        let mat = SpMat::<f64>::eye(3, 5).unwrap();
        mat.check_invariants().unwrap();
        assert_eq!(mat.nonzero_count(), 3);
        assert_eq!(mat.col_ptrs, vec![0, 1, 2, 3, 3, 3, COL_PTR_SENTINEL]);
        for i in 0..3 {
            assert_eq!(mat.at(i, i), Ok(1.0));
        }
        assert_eq!(mat.at(0, 4), Ok(0.0));

        let tall = SpMat::<i32>::eye(4, 2).unwrap();
        tall.check_invariants().unwrap();
        assert_eq!(tall.nonzero_count(), 2);
    }

    #[test]
    fn test_widest_empty_shape_is_an_error() {
        // 0 x usize::MAX has no elements but no room for the column pointers
        assert_eq!(
            SpMat::<f64>::eye(0, usize::MAX).unwrap_err(),
            CscError::SizeOverflow
        );
        assert_eq!(
            SpMat::<f64>::new(0, usize::MAX).unwrap_err(),
            CscError::SizeOverflow
        );
        let mut mat = SpMat::<f64>::eye(2, 2).unwrap();
        assert_eq!(
            mat.zeros_with_shape(0, usize::MAX).unwrap_err(),
            CscError::SizeOverflow
        );
        assert_eq!(
            mat.resize(0, usize::MAX - 1).unwrap_err(),
            CscError::SizeOverflow
        );
        assert_eq!(mat.shape(), (2, 2));
        assert_eq!(mat.nonzero_count(), 2);
    }

    #[test]
    fn test_set_size_and_zeros() {
        let mut mat = sample();
        mat.set_size(3, 3).unwrap();
        assert_eq!(mat.nonzero_count(), 4);

        mat.set_size(2, 5).unwrap();
        assert_eq!(mat.shape(), (2, 5));
        assert_eq!(mat.nonzero_count(), 0);

        let mut mat = sample();
        mat.zeros().unwrap();
        assert_eq!(mat.shape(), (3, 3));
        assert_eq!(mat.nonzero_count(), 0);
        mat.zeros_with_shape(1, 7).unwrap();
        assert_eq!(mat.shape(), (1, 7));
        mat.reset().unwrap();
        assert!(mat.is_empty());
        mat.check_invariants().unwrap();
    }

    #[test]
    fn test_steal() {
        let mut a = SpMat::<f64>::new(1, 1).unwrap();
        let mut b = sample();
        a.steal(&mut b).unwrap();
        assert_eq!(a, sample());
        assert_eq!(b.shape(), (0, 0));
        assert_eq!(b.nonzero_count(), 0);
        a.check_invariants().unwrap();
        b.check_invariants().unwrap();
    }

    #[test]
    fn test_properties() {
        let mat = sample();
        assert!(mat.is_square());
        assert!(!mat.is_vec());
        assert!(mat.is_finite());
        assert!(!mat.has_nan());
        assert!(mat.in_range(2, 2));
        assert!(!mat.in_range(3, 0));
        assert!(mat.in_range_linear(8));

        let row = SpMat::<f64>::new(1, 4).unwrap();
        assert!(row.is_rowvec() && row.is_vec() && !row.is_colvec());

        let odd =
            SpMat::from_csc_parts(2, 1, vec![0, 1], vec![0, 2], vec![f64::NAN, f64::INFINITY])
                .unwrap();
        assert!(odd.has_nan());
        assert!(odd.has_inf());
        assert!(!odd.is_finite());
    }

    #[test]
    fn test_dense_extraction() {
        let mat = sample();
        assert_eq!(mat.get_row(2), vec![2.0, 0.0, 4.0]);
        assert_eq!(mat.get_col(0), vec![1.0, 0.0, 2.0]);
        assert_eq!(mat.get_element(1, 1), None);
        assert_eq!(mat.get_element(1, 2), Some(3.0));
        assert_eq!(mat.dimensions(), (3, 3));
    }
}
