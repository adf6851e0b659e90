//! Consistency protocol between the CSC arrays and the cache overlay
//!
//! ```text
//!              elem_mut write
//!   CleanCache --------------> DirtyCache
//!       ^                          |
//!       | sync_cache               | sync_csc
//!       |                          v
//!   CleanCsc <--------------- CleanCache
//!          any CSC mutation
//! ```
//!
//! `CleanCsc` is the initial state. The cache is only populated on demand,
//! when a write handle is requested.

use cscmat_core::{CscError, MatrixElement, Result};
use tracing::{debug, trace};

use crate::cache::ElemMut;
use crate::iter::Iter;
use crate::matrix::SpMat;

/// Which representation is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// CSC arrays are authoritative; the cache is empty
    CleanCsc,
    /// The cache holds writes not yet in the CSC arrays
    DirtyCache,
    /// Both representations agree
    CleanCache,
}

impl<T: MatrixElement> SpMat<T> {
    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    /// Materialize pending cache writes into the CSC arrays
    ///
    /// No-op unless the cache is dirty. The cache is kept and both
    /// representations agree afterwards.
    pub fn sync_csc(&mut self) -> Result<()> {
        if self.state != SyncState::DirtyCache {
            return Ok(());
        }
        let n_rows = self.n_rows;
        let entries = self.cache.sorted_entries();
        let rebuilt = Self::from_sorted_triplets(
            n_rows,
            self.n_cols,
            entries.len(),
            entries
                .into_iter()
                .map(|(key, value)| (key % n_rows, key / n_rows, value)),
            self.config.clone(),
        )?;
        self.take_arrays(rebuilt);
        self.state = SyncState::CleanCache;
        debug!(nnz = self.n_nonzero, "synced CSC arrays from cache");
        Ok(())
    }

    /// Alias of [`SpMat::sync_csc`]
    pub fn sync(&mut self) -> Result<()> {
        self.sync_csc()
    }

    /// Populate the cache from the CSC arrays if it is not already current
    pub fn sync_cache(&mut self) -> Result<()> {
        if self.state != SyncState::CleanCsc {
            return Ok(());
        }
        let n_rows = self.n_rows;
        let nnz = self.n_nonzero;
        let entries = Iter::csc(
            &self.values.as_slice()[..nnz],
            &self.row_indices.as_slice()[..nnz],
            &self.col_ptrs[..=self.n_cols],
        );
        self.cache
            .fill_from(entries.map(|(row, col, value)| (row + col * n_rows, value)));
        self.state = SyncState::CleanCache;
        trace!(entries = self.cache.len(), "populated cache from CSC arrays");
        Ok(())
    }

    /// Drop the cache; the CSC arrays become the only representation
    pub(crate) fn invalidate_cache(&mut self) {
        if self.state != SyncState::CleanCsc {
            self.cache.clear();
            self.state = SyncState::CleanCsc;
        }
    }

    /// Mark the cache as holding writes the CSC arrays do not have
    pub(crate) fn invalidate_csc(&mut self) {
        self.state = SyncState::DirtyCache;
    }

    /// Write handle to `(row, col)` routed through the cache overlay
    pub fn elem_mut(&mut self, row: usize, col: usize) -> Result<ElemMut<'_, T>> {
        self.check_location(row, col)?;
        self.sync_cache()?;
        let key = row + col * self.n_rows;
        Ok(ElemMut::new(self, key))
    }

    /// Write handle to linear index `row + col * rows`
    pub fn elem_mut_linear(&mut self, index: usize) -> Result<ElemMut<'_, T>> {
        if index >= self.n_elem {
            return Err(CscError::IndexOutOfBounds {
                index,
                len: self.n_elem,
            });
        }
        self.sync_cache()?;
        Ok(ElemMut::new(self, index))
    }
}
