//! Batch construction from `(row, col)` location lists
//!
//! Locations are given as `[row, col]` pairs with a parallel value slice.
//! Two duplicate policies exist: the default rejects a repeated location
//! with `DuplicateLocation`, the accumulating one sums repeated values.
//! Construction always builds a fresh matrix, so a failed batch never
//! leaves a partially written target behind.

use std::borrow::Cow;

use cscmat_core::{
    checked_col_ptrs_len, checked_elem_count, CscError, MatrixElement, Result, COL_PTR_SENTINEL,
};
use rayon::prelude::*;
use tracing::debug;

use crate::buffer::{try_filled, try_vec};
use crate::config::StorageConfig;
use crate::matrix::SpMat;

/// How a location list is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Sort locations into column-major order; otherwise out-of-order
    /// input fails with `UnsortedInput`
    pub sort_locations: bool,
    /// Sum values at repeated locations instead of failing
    pub accumulate_duplicates: bool,
    /// Drop zero values before anything else
    pub check_for_zeros: bool,
}

impl BatchOptions {
    pub fn with_sort_locations(mut self, sort: bool) -> Self {
        self.sort_locations = sort;
        self
    }

    pub fn with_accumulate_duplicates(mut self, accumulate: bool) -> Self {
        self.accumulate_duplicates = accumulate;
        self
    }

    pub fn with_check_for_zeros(mut self, check: bool) -> Self {
        self.check_for_zeros = check;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            sort_locations: true,
            accumulate_duplicates: false,
            check_for_zeros: true,
        }
    }
}

impl From<&StorageConfig> for BatchOptions {
    fn from(config: &StorageConfig) -> Self {
        Self::default().with_check_for_zeros(config.prune_zeros)
    }
}

impl<T: MatrixElement> SpMat<T> {
    /// Build an `n_rows x n_cols` matrix from a location list
    pub fn from_batch(
        locations: &[[usize; 2]],
        values: &[T],
        n_rows: usize,
        n_cols: usize,
        options: BatchOptions,
    ) -> Result<Self> {
        Self::from_batch_with_config(
            locations,
            values,
            n_rows,
            n_cols,
            options,
            StorageConfig::default(),
        )
    }

    /// [`SpMat::from_batch`] with an explicit storage configuration
    pub fn from_batch_with_config(
        locations: &[[usize; 2]],
        values: &[T],
        n_rows: usize,
        n_cols: usize,
        options: BatchOptions,
        config: StorageConfig,
    ) -> Result<Self> {
        if locations.len() != values.len() {
            return Err(CscError::DimensionMismatch {
                expected: locations.len(),
                found: values.len(),
            });
        }
        checked_elem_count(n_rows, n_cols)?;
        let n_ptrs = checked_col_ptrs_len(n_cols)?;

        let (locations, values) = if options.check_for_zeros {
            drop_zeros(locations, values)?
        } else {
            (Cow::Borrowed(locations), Cow::Borrowed(values))
        };

        if let Some(&[row, col]) = locations
            .iter()
            .find(|&&[row, col]| row >= n_rows || col >= n_cols)
        {
            return Err(CscError::out_of_bounds(row, col, n_rows, n_cols));
        }

        let key = |[row, col]: [usize; 2]| row + col * n_rows;
        let order = if options.sort_locations && needs_sort(&locations, key, &config) {
            Some(sorted_order(&locations, key, &config)?)
        } else {
            None
        };
        let at = |i: usize| order.as_ref().map_or(i, |o| o[i]);

        // Validate ordering and count distinct locations before writing anything.
        let mut n_unique = 0;
        let mut prev: Option<usize> = None;
        for i in 0..locations.len() {
            let loc = locations[at(i)];
            let k = key(loc);
            match prev {
                Some(p) if k == p => {
                    if !options.accumulate_duplicates {
                        return Err(CscError::DuplicateLocation {
                            row: loc[0],
                            col: loc[1],
                        });
                    }
                }
                Some(p) if k < p => return Err(CscError::UnsortedInput { position: i }),
                _ => n_unique += 1,
            }
            prev = Some(k);
        }

        let mut out_values = try_vec(n_unique + 1)?;
        let mut out_rows = try_vec(n_unique + 1)?;
        let mut col_ptrs = try_filled(n_ptrs, 0usize)?;

        let mut prev: Option<usize> = None;
        for i in 0..locations.len() {
            let j = at(i);
            let [row, col] = locations[j];
            let value = values[j];
            let k = key([row, col]);
            if prev == Some(k) {
                let last = out_values.len() - 1;
                out_values[last] = out_values[last] + value;
            } else {
                out_values.push(value);
                out_rows.push(row);
                col_ptrs[col + 1] += 1;
            }
            prev = Some(k);
        }
        out_values.push(T::zero());
        out_rows.push(0);
        for c in 1..=n_cols {
            col_ptrs[c] += col_ptrs[c - 1];
        }
        col_ptrs[n_cols + 1] = COL_PTR_SENTINEL;

        let mut mat =
            Self::from_parts_unchecked(n_rows, n_cols, out_values, out_rows, col_ptrs, config);
        // Cancelling sums, or zeros let through with check_for_zeros off.
        mat.compact_zeros();

        debug!(
            input = locations.len(),
            nnz = mat.n_nonzero,
            sorted = order.is_some(),
            "built matrix from batch"
        );
        Ok(mat)
    }

    /// Build from a location list, inferring the shape from the largest
    /// row and column indices; an empty list gives a 0x0 matrix
    pub fn from_batch_auto_size(
        locations: &[[usize; 2]],
        values: &[T],
        options: BatchOptions,
    ) -> Result<Self> {
        if locations.len() != values.len() {
            return Err(CscError::DimensionMismatch {
                expected: locations.len(),
                found: values.len(),
            });
        }
        let (n_rows, n_cols) = match locations.iter().copied().reduce(|[r0, c0], [r1, c1]| {
            [r0.max(r1), c0.max(c1)]
        }) {
            Some([max_row, max_col]) => (
                max_row.checked_add(1).ok_or(CscError::SizeOverflow)?,
                max_col.checked_add(1).ok_or(CscError::SizeOverflow)?,
            ),
            None => (0, 0),
        };
        Self::from_batch(locations, values, n_rows, n_cols, options)
    }

    /// Replace the contents with a batch; on error `self` is untouched
    pub fn assign_batch(
        &mut self,
        locations: &[[usize; 2]],
        values: &[T],
        n_rows: usize,
        n_cols: usize,
        options: BatchOptions,
    ) -> Result<()> {
        let built = Self::from_batch_with_config(
            locations,
            values,
            n_rows,
            n_cols,
            options,
            self.config.clone(),
        )?;
        self.adopt(built);
        Ok(())
    }
}

type Filtered<'a, T> = (Cow<'a, [[usize; 2]]>, Cow<'a, [T]>);

/// Copy out the nonzero entries, only when any zero is present
fn drop_zeros<'a, T: MatrixElement>(
    locations: &'a [[usize; 2]],
    values: &'a [T],
) -> Result<Filtered<'a, T>> {
    let n_nonzero = values.iter().filter(|v| !v.is_zero()).count();
    if n_nonzero == values.len() {
        return Ok((Cow::Borrowed(locations), Cow::Borrowed(values)));
    }
    let mut kept_locations = try_vec(n_nonzero)?;
    let mut kept_values = try_vec(n_nonzero)?;
    for (loc, &value) in locations.iter().zip(values) {
        if !value.is_zero() {
            kept_locations.push(*loc);
            kept_values.push(value);
        }
    }
    Ok((Cow::Owned(kept_locations), Cow::Owned(kept_values)))
}

/// A linear scan is cheaper than a sort on already ordered input
fn needs_sort<K>(locations: &[[usize; 2]], key: K, config: &StorageConfig) -> bool
where
    K: Fn([usize; 2]) -> usize,
{
    if !config.check_sorted_first {
        return true;
    }
    locations.windows(2).any(|w| key(w[1]) <= key(w[0]))
}

/// Stable column-major permutation of `locations`
fn sorted_order<K>(locations: &[[usize; 2]], key: K, config: &StorageConfig) -> Result<Vec<usize>>
where
    K: Fn([usize; 2]) -> usize + Sync,
{
    let mut order = try_vec(locations.len())?;
    order.extend(0..locations.len());
    if locations.len() > config.parallel_sort_threshold {
        order.par_sort_by_key(|&i| key(locations[i]));
    } else {
        order.sort_by_key(|&i| key(locations[i]));
    }
    Ok(order)
}

/// Accumulates triplets and builds a matrix in one step
#[derive(Debug, Clone, Default)]
pub struct BatchBuilder<T> {
    locations: Vec<[usize; 2]>,
    values: Vec<T>,
    shape: Option<(usize, usize)>,
    options: BatchOptions,
}

impl<T: MatrixElement> BatchBuilder<T> {
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
            values: Vec::new(),
            shape: None,
            options: BatchOptions::default(),
        }
    }

    /// Fix the shape; without it the shape is inferred from the locations
    pub fn with_shape(mut self, n_rows: usize, n_cols: usize) -> Self {
        self.shape = Some((n_rows, n_cols));
        self
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sort_locations(mut self, sort: bool) -> Self {
        self.options.sort_locations = sort;
        self
    }

    /// Sum repeated locations instead of failing
    pub fn accumulate(mut self, accumulate: bool) -> Self {
        self.options.accumulate_duplicates = accumulate;
        self
    }

    pub fn push(&mut self, row: usize, col: usize, value: T) -> &mut Self {
        self.locations.push([row, col]);
        self.values.push(value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn build(&self) -> Result<SpMat<T>> {
        match self.shape {
            Some((n_rows, n_cols)) => {
                SpMat::from_batch(&self.locations, &self.values, n_rows, n_cols, self.options)
            }
            None => SpMat::from_batch_auto_size(&self.locations, &self.values, self.options),
        }
    }
}

impl<T: MatrixElement> Extend<(usize, usize, T)> for BatchBuilder<T> {
    fn extend<I: IntoIterator<Item = (usize, usize, T)>>(&mut self, iter: I) {
        for (row, col, value) in iter {
            self.push(row, col, value);
        }
    }
}
