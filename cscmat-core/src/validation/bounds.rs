//! Shape and array bounds validation
//!
//! Pure arithmetic with overflow protection, shared by the storage engine
//! and the layout decoder.

use crate::error::{CscError, Result};

/// Number of elements of an `n_rows x n_cols` matrix
///
/// Fails with `SizeOverflow` when the product does not fit in `usize`.
pub const fn checked_elem_count(n_rows: usize, n_cols: usize) -> Result<usize> {
    match n_rows.checked_mul(n_cols) {
        Some(n) => Ok(n),
        None => Err(CscError::SizeOverflow),
    }
}

/// Length of a column pointer array with both sentinels, `n_cols + 2`
///
/// Fails with `SizeOverflow` when the sum does not fit in `usize`, which
/// an empty `0 x usize::MAX` shape otherwise allows.
pub const fn checked_col_ptrs_len(n_cols: usize) -> Result<usize> {
    match n_cols.checked_add(2) {
        Some(n) => Ok(n),
        None => Err(CscError::SizeOverflow),
    }
}

/// Round `n` up to the next multiple of `chunk`
///
/// A `chunk` of zero or one leaves `n` unchanged. Saturates instead of
/// wrapping near `usize::MAX`.
pub const fn enlarge_to_chunk(n: usize, chunk: usize) -> usize {
    if chunk <= 1 {
        return n;
    }
    let rem = n % chunk;
    if rem == 0 {
        n
    } else {
        match n.checked_add(chunk - rem) {
            Some(v) => v,
            None => usize::MAX,
        }
    }
}

/// Validate that a byte length holds a whole number of `T` elements
pub const fn validate_array_bounds<T>(byte_len: usize) -> Result<usize> {
    let element_size = core::mem::size_of::<T>();
    if element_size == 0 || byte_len % element_size != 0 {
        return Err(CscError::CorruptedData);
    }
    Ok(byte_len / element_size)
}
