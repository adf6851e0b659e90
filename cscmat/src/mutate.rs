//! Single-element and whole-matrix value mutation on the CSC arrays

use cscmat_core::{MatrixElement, Result};
use tracing::{trace, warn};

use crate::matrix::SpMat;

impl<T: MatrixElement> SpMat<T> {
    /// Set `(row, col)` to `value`, inserting or overwriting
    ///
    /// A zero value erases the location instead, so no zero is ever
    /// stored. Insertion shifts the tail of the value and row-index arrays
    /// by one slot, reallocating only when the current chunk is full.
    pub fn add_or_overwrite(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_location(row, col)?;
        if value.is_zero() {
            return self.erase(row, col);
        }
        self.sync_csc()?;

        match self.find(row, col) {
            Ok(pos) => {
                self.values[pos] = value;
            }
            Err(pos) => {
                let new_len = self.n_nonzero + 2;
                self.values.reserve_len(new_len)?;
                self.row_indices.reserve_len(new_len)?;
                self.values.insert(pos, value)?;
                self.row_indices.insert(pos, row)?;
                for ptr in &mut self.col_ptrs[col + 1..=self.n_cols] {
                    *ptr += 1;
                }
                self.n_nonzero += 1;
                trace!(row, col, pos, nnz = self.n_nonzero, "inserted element");
            }
        }
        self.invalidate_cache();
        Ok(())
    }

    /// Remove `(row, col)` from storage; absent locations are a no-op
    pub fn erase(&mut self, row: usize, col: usize) -> Result<()> {
        self.check_location(row, col)?;
        self.sync_csc()?;

        if let Ok(pos) = self.find(row, col) {
            self.values.remove(pos);
            self.row_indices.remove(pos);
            for ptr in &mut self.col_ptrs[col + 1..=self.n_cols] {
                *ptr -= 1;
            }
            self.n_nonzero -= 1;
            trace!(row, col, pos, nnz = self.n_nonzero, "erased element");
        }
        self.invalidate_cache();
        Ok(())
    }

    /// Drop every stored value that compares equal to zero
    pub fn remove_zeros(&mut self) -> Result<()> {
        self.sync_csc()?;
        self.invalidate_cache();
        self.compact_zeros();
        Ok(())
    }

    /// In-place compaction of stored zeros, column pointers rebuilt as it goes
    pub(crate) fn compact_zeros(&mut self) {
        if !self.stored_values().iter().any(|v| v.is_zero()) {
            return;
        }
        let mut write = 0;
        let mut start = 0;
        {
            let values = self.values.as_mut_slice();
            let rows = self.row_indices.as_mut_slice();
            for col in 0..self.n_cols {
                let end = self.col_ptrs[col + 1];
                for read in start..end {
                    if !values[read].is_zero() {
                        values[write] = values[read];
                        rows[write] = rows[read];
                        write += 1;
                    }
                }
                self.col_ptrs[col + 1] = write;
                start = end;
            }
        }
        let removed = self.n_nonzero - write;
        self.n_nonzero = write;
        self.values.truncate(write + 1);
        self.row_indices.truncate(write + 1);
        self.values[write] = T::zero();
        self.row_indices[write] = 0;
        self.log_rebuild("remove_zeros");
        trace!(removed, "pruned stored zeros");
    }

    /// Multiply every element by `factor`
    pub fn scale(&mut self, factor: T) -> Result<()> {
        if factor.is_zero() {
            return self.zeros();
        }
        self.map_stored(|v| v * factor)
    }

    /// Divide every element by `divisor`
    ///
    /// Follows the element type's division: floats produce infinities or
    /// NaN for a zero divisor, integers panic.
    pub fn div_scalar(&mut self, divisor: T) -> Result<()> {
        self.map_stored(|v| v / divisor)
    }

    /// Replace every stored `old` with `new`
    ///
    /// Replacing zero would touch every unstored location and is refused.
    /// For floats a NaN `old` matches stored NaNs.
    pub fn replace(&mut self, old: T, new: T) -> Result<()> {
        if old.is_zero() {
            warn!("replace() of zero is not supported on sparse storage; matrix left unchanged");
            return Ok(());
        }
        if old.is_nan() {
            return self.map_stored(|v| if v.is_nan() { new } else { v });
        }
        self.map_stored(|v| if v == old { new } else { v })
    }

    /// Apply `f` to every stored value, then prune zeros it produced
    pub fn transform_in_place<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(T) -> T,
    {
        self.map_stored(f)
    }

    fn map_stored<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(T) -> T,
    {
        self.sync_csc()?;
        self.invalidate_cache();
        let nnz = self.n_nonzero;
        for v in &mut self.values.as_mut_slice()[..nnz] {
            *v = f(*v);
        }
        self.compact_zeros();
        Ok(())
    }
}
