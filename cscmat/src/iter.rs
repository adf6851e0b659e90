//! Column-major nonzero iteration
//!
//! Both iterators read the CSC arrays directly when they are current and
//! fall back to a sorted snapshot of the cache overlay when the cache holds
//! writes not yet materialized.

use std::vec;

use cscmat_core::MatrixElement;

/// Iterator over `(row, col, value)` in column-major order
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: IterInner<'a, T>,
}

#[derive(Debug, Clone)]
enum IterInner<'a, T> {
    Csc {
        values: &'a [T],
        row_indices: &'a [usize],
        col_ptrs: &'a [usize],
        pos: usize,
        col: usize,
    },
    Cache {
        entries: vec::IntoIter<(usize, T)>,
        n_rows: usize,
    },
}

impl<'a, T: MatrixElement> Iter<'a, T> {
    /// `values` and `row_indices` exclude the sentinel slot
    pub(crate) fn csc(values: &'a [T], row_indices: &'a [usize], col_ptrs: &'a [usize]) -> Self {
        Self {
            inner: IterInner::Csc {
                values,
                row_indices,
                col_ptrs,
                pos: 0,
                col: 0,
            },
        }
    }

    /// `entries` must be sorted by linear index
    pub(crate) fn cache(entries: Vec<(usize, T)>, n_rows: usize) -> Self {
        Self {
            inner: IterInner::Cache {
                entries: entries.into_iter(),
                n_rows,
            },
        }
    }
}

impl<T: MatrixElement> Iterator for Iter<'_, T> {
    type Item = (usize, usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Csc {
                values,
                row_indices,
                col_ptrs,
                pos,
                col,
            } => {
                if *pos >= values.len() {
                    return None;
                }
                while col_ptrs[*col + 1] <= *pos {
                    *col += 1;
                }
                let item = (row_indices[*pos], *col, values[*pos]);
                *pos += 1;
                Some(item)
            }
            IterInner::Cache { entries, n_rows } => entries
                .next()
                .map(|(key, value)| (key % *n_rows, key / *n_rows, value)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            IterInner::Csc { values, pos, .. } => values.len() - *pos,
            IterInner::Cache { entries, .. } => entries.len(),
        };
        (remaining, Some(remaining))
    }
}

impl<T: MatrixElement> ExactSizeIterator for Iter<'_, T> {}

/// Iterator over `(row, value)` of a single column, in row order
#[derive(Debug, Clone)]
pub struct ColIter<'a, T> {
    inner: ColIterInner<'a, T>,
}

#[derive(Debug, Clone)]
enum ColIterInner<'a, T> {
    Csc {
        values: &'a [T],
        row_indices: &'a [usize],
        pos: usize,
    },
    Cache {
        entries: vec::IntoIter<(usize, T)>,
        n_rows: usize,
    },
}

impl<'a, T: MatrixElement> ColIter<'a, T> {
    pub(crate) fn csc(values: &'a [T], row_indices: &'a [usize]) -> Self {
        Self {
            inner: ColIterInner::Csc {
                values,
                row_indices,
                pos: 0,
            },
        }
    }

    pub(crate) fn cache(entries: Vec<(usize, T)>, n_rows: usize) -> Self {
        Self {
            inner: ColIterInner::Cache {
                entries: entries.into_iter(),
                n_rows,
            },
        }
    }
}

impl<T: MatrixElement> Iterator for ColIter<'_, T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ColIterInner::Csc {
                values,
                row_indices,
                pos,
            } => {
                let item = (*row_indices.get(*pos)?, values[*pos]);
                *pos += 1;
                Some(item)
            }
            ColIterInner::Cache { entries, n_rows } => entries
                .next()
                .map(|(key, value)| (key % *n_rows, value)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            ColIterInner::Csc { values, pos, .. } => values.len() - *pos,
            ColIterInner::Cache { entries, .. } => entries.len(),
        };
        (remaining, Some(remaining))
    }
}

impl<T: MatrixElement> ExactSizeIterator for ColIter<'_, T> {}
