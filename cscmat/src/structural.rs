//! Structural editing: removing, inserting and swapping rows and columns,
//! resizing and reshaping

use cscmat_core::{checked_col_ptrs_len, checked_elem_count, CscError, MatrixElement, Result};
use tracing::debug;

use crate::matrix::SpMat;

impl<T: MatrixElement> SpMat<T> {
    /// Remove one row
    pub fn shed_row(&mut self, row: usize) -> Result<()> {
        self.shed_rows(row, row)
    }

    /// Remove rows `first..=last`; rows below move up
    pub fn shed_rows(&mut self, first: usize, last: usize) -> Result<()> {
        if first > last {
            return Err(CscError::InvalidRange {
                start: first,
                end: last,
            });
        }
        if last >= self.n_rows {
            return Err(CscError::out_of_bounds(last, 0, self.n_rows, self.n_cols));
        }
        self.sync_csc()?;

        let width = last - first + 1;
        let rebuilt = Self::from_sorted_triplets(
            self.n_rows - width,
            self.n_cols,
            self.n_nonzero,
            self.iter()
                .filter(|&(row, _, _)| row < first || row > last)
                .map(|(row, col, value)| {
                    let row = if row > last { row - width } else { row };
                    (row, col, value)
                }),
            self.config.clone(),
        )?;
        self.adopt(rebuilt);
        self.log_rebuild("shed_rows");
        Ok(())
    }

    /// Remove one column
    pub fn shed_col(&mut self, col: usize) -> Result<()> {
        self.shed_cols(col, col)
    }

    /// Remove columns `first..=last`; columns to the right move left
    pub fn shed_cols(&mut self, first: usize, last: usize) -> Result<()> {
        if first > last {
            return Err(CscError::InvalidRange {
                start: first,
                end: last,
            });
        }
        if last >= self.n_cols {
            return Err(CscError::out_of_bounds(0, last, self.n_rows, self.n_cols));
        }
        self.sync_csc()?;
        self.invalidate_cache();

        let start = self.col_ptrs[first];
        let end = self.col_ptrs[last + 1];
        let removed = end - start;
        if removed > 0 {
            self.values.remove_range(start, end);
            self.row_indices.remove_range(start, end);
        }

        // col_ptrs[first] == col_ptrs[last + 1] - removed, so drop the
        // pointers of the removed columns and shift the rest down.
        self.col_ptrs.drain(first..=last);
        let new_cols = self.n_cols - (last - first + 1);
        for ptr in &mut self.col_ptrs[first..=new_cols] {
            *ptr -= removed;
        }
        self.n_cols = new_cols;
        self.n_elem = self.n_rows * new_cols;
        self.n_nonzero -= removed;
        debug!(first, last, removed, "shed columns");
        Ok(())
    }

    /// Insert `count` zero rows before row `at`
    pub fn insert_rows(&mut self, at: usize, count: usize) -> Result<()> {
        if at > self.n_rows {
            return Err(CscError::out_of_bounds(at, 0, self.n_rows, self.n_cols));
        }
        let n_rows = self.n_rows.checked_add(count).ok_or(CscError::SizeOverflow)?;
        let n_elem = checked_elem_count(n_rows, self.n_cols)?;
        self.sync_csc()?;
        self.invalidate_cache();

        let nnz = self.n_nonzero;
        for row in &mut self.row_indices.as_mut_slice()[..nnz] {
            if *row >= at {
                *row += count;
            }
        }
        self.n_rows = n_rows;
        self.n_elem = n_elem;
        Ok(())
    }

    /// Insert `count` zero columns before column `at`
    pub fn insert_cols(&mut self, at: usize, count: usize) -> Result<()> {
        if at > self.n_cols {
            return Err(CscError::out_of_bounds(0, at, self.n_rows, self.n_cols));
        }
        let n_cols = self.n_cols.checked_add(count).ok_or(CscError::SizeOverflow)?;
        let n_elem = checked_elem_count(self.n_rows, n_cols)?;
        checked_col_ptrs_len(n_cols)?;
        self.sync_csc()?;
        self.invalidate_cache();

        self.col_ptrs
            .try_reserve(count)
            .map_err(|_| CscError::AllocationFailure)?;
        let ptr = self.col_ptrs[at];
        self.col_ptrs
            .splice(at..at, std::iter::repeat(ptr).take(count));
        self.n_cols = n_cols;
        self.n_elem = n_elem;
        Ok(())
    }

    /// Exchange two rows
    ///
    /// Works column by column inside the existing arrays: when only one of
    /// the rows has an entry in a column, that entry is bubbled to the
    /// other row's position so row indices stay sorted.
    pub fn swap_rows(&mut self, row1: usize, row2: usize) -> Result<()> {
        if row1 >= self.n_rows || row2 >= self.n_rows {
            return Err(CscError::out_of_bounds(
                row1.max(row2),
                0,
                self.n_rows,
                self.n_cols,
            ));
        }
        if row1 == row2 {
            return Ok(());
        }
        let (lo, hi) = (row1.min(row2), row1.max(row2));
        self.sync_csc()?;
        self.invalidate_cache();

        let values = self.values.as_mut_slice();
        let rows = self.row_indices.as_mut_slice();
        for col in 0..self.n_cols {
            let (start, end) = (self.col_ptrs[col], self.col_ptrs[col + 1]);
            let slice = &rows[start..end];
            let loc_lo = slice.binary_search(&lo).ok().map(|i| start + i);
            let loc_hi = slice.binary_search(&hi).ok().map(|i| start + i);

            match (loc_lo, loc_hi) {
                (Some(a), Some(b)) => values.swap(a, b),
                (Some(mut k), None) => {
                    while k + 1 < end && rows[k + 1] < hi {
                        values.swap(k, k + 1);
                        rows.swap(k, k + 1);
                        k += 1;
                    }
                    rows[k] = hi;
                }
                (None, Some(mut k)) => {
                    while k > start && rows[k - 1] > lo {
                        values.swap(k, k - 1);
                        rows.swap(k, k - 1);
                        k -= 1;
                    }
                    rows[k] = lo;
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    /// Exchange two columns through element handles
    pub fn swap_cols(&mut self, col1: usize, col2: usize) -> Result<()> {
        if col1 >= self.n_cols || col2 >= self.n_cols {
            return Err(CscError::out_of_bounds(
                0,
                col1.max(col2),
                self.n_rows,
                self.n_cols,
            ));
        }
        if col1 == col2 {
            return Ok(());
        }
        let mut touched: Vec<usize> = self
            .col_iter(col1)?
            .chain(self.col_iter(col2)?)
            .map(|(row, _)| row)
            .collect();
        touched.sort_unstable();
        touched.dedup();

        for row in touched {
            let a = self.get(row, col1);
            let b = self.get(row, col2);
            self.elem_mut(row, col1)?.set(b);
            self.elem_mut(row, col2)?.set(a);
        }
        Ok(())
    }

    /// Change shape keeping the overlapping top-left block
    pub fn resize(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        if (n_rows, n_cols) == self.shape() {
            return Ok(());
        }
        checked_elem_count(n_rows, n_cols)?;
        checked_col_ptrs_len(n_cols)?;
        self.sync_csc()?;
        if self.n_elem == 0 || self.n_nonzero == 0 {
            return self.set_size(n_rows, n_cols);
        }

        let rebuilt = Self::from_sorted_triplets(
            n_rows,
            n_cols,
            self.n_nonzero,
            self.iter()
                .filter(|&(row, col, _)| row < n_rows && col < n_cols),
            self.config.clone(),
        )?;
        self.adopt(rebuilt);
        self.log_rebuild("resize");
        Ok(())
    }

    /// Change shape keeping every element at the same column-major linear index
    pub fn reshape(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        let old_rows = self.n_rows;
        self.reshape_with(n_rows, n_cols, |row, col| {
            let pos = row + col * old_rows;
            (pos % n_rows, pos / n_rows)
        })
    }

    /// Change shape keeping every element at the same row-major linear index
    pub fn reshape_rowwise(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        let old_cols = self.n_cols;
        self.reshape_with(n_rows, n_cols, |row, col| {
            let pos = row * old_cols + col;
            (pos / n_cols, pos % n_cols)
        })
    }

    fn reshape_with<F>(&mut self, n_rows: usize, n_cols: usize, remap: F) -> Result<()>
    where
        F: Fn(usize, usize) -> (usize, usize),
    {
        let n_elem = checked_elem_count(n_rows, n_cols)?;
        if n_elem != self.n_elem {
            return Err(CscError::DimensionMismatch {
                expected: self.n_elem,
                found: n_elem,
            });
        }
        if (n_rows, n_cols) == self.shape() {
            return Ok(());
        }
        self.sync_csc()?;
        if self.n_nonzero == 0 {
            return self.init_storage(n_rows, n_cols);
        }

        let mut moved: Vec<(usize, usize, T)> = self
            .iter()
            .map(|(row, col, value)| {
                let (row, col) = remap(row, col);
                (row, col, value)
            })
            .collect();
        // Column-major remapping preserves order; row-major does not.
        if moved.windows(2).any(|w| (w[0].1, w[0].0) > (w[1].1, w[1].0)) {
            moved.sort_unstable_by_key(|&(row, col, _)| (col, row));
        }
        let rebuilt =
            Self::from_sorted_triplets(n_rows, n_cols, moved.len(), moved, self.config.clone())?;
        self.adopt(rebuilt);
        self.log_rebuild("reshape");
        Ok(())
    }
}
