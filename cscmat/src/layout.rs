//! Persisted CSC layout
//!
//! A header followed by the three arrays, each region starting on an
//! 8-byte boundary:
//!
//! ```text
//! +-----------+-----+---------------+-----+----------------+-----+-------------+
//! | CscHeader | pad | values[nnz]   | pad | row_idx[nnz]   | pad | col_ptrs    |
//! | 80 bytes  |     | element bytes |     | u64 LE         |     | u64 LE      |
//! +-----------+-----+---------------+-----+----------------+-----+-------------+
//! ```
//!
//! Values are written in host byte order. Sentinels are never persisted.

use std::mem::size_of;

use cscmat_core::{
    calculate_padding, validate_array_bounds, CscError, CscHeader, MatrixElement, Result,
    ALIGNMENT_BOUNDARY, NO_EXPLICIT_ZEROS, SORTED_INDICES,
};
use tracing::debug;

use crate::buffer::try_vec;
use crate::matrix::SpMat;

/// Borrowed view of a synced matrix in persisted form
#[derive(Debug, Clone, Copy)]
pub struct CscLayout<'a, T> {
    pub header: CscHeader,
    pub values: &'a [T],
    pub row_indices: &'a [usize],
    pub col_ptrs: &'a [usize],
}

impl<'a, T: MatrixElement> CscLayout<'a, T> {
    pub fn value_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.values)
    }

    /// Row indices as raw `usize` bytes in host order
    pub fn row_index_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.row_indices)
    }

    pub fn col_ptr_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.col_ptrs)
    }
}

impl<T: MatrixElement> SpMat<T> {
    /// Sync the arrays and expose them without sentinels
    pub fn layout(&mut self) -> Result<CscLayout<'_, T>> {
        self.sync_csc()?;
        let header = CscHeader::describe(
            T::data_type(),
            self.n_rows,
            self.n_cols,
            self.n_nonzero,
            SORTED_INDICES | NO_EXPLICIT_ZEROS,
        )?;
        Ok(CscLayout {
            header,
            values: self.stored_values(),
            row_indices: self.stored_rows(),
            col_ptrs: &self.col_ptrs[..=self.n_cols],
        })
    }

    /// Encode header and arrays into a single buffer
    pub fn to_layout_bytes(&mut self) -> Result<Vec<u8>> {
        let layout = self.layout()?;
        let header = layout.header;
        let mut out = try_vec(header.total_size()?)?;

        out.extend_from_slice(&header.to_bytes_array());
        pad_to(&mut out, header.values_offset);
        out.extend_from_slice(layout.value_bytes());
        pad_to(&mut out, header.row_indices_offset);
        for &row in layout.row_indices {
            out.extend_from_slice(&(row as u64).to_le_bytes());
        }
        pad_to(&mut out, header.col_ptrs_offset);
        for &ptr in layout.col_ptrs {
            out.extend_from_slice(&(ptr as u64).to_le_bytes());
        }

        debug!(
            bytes = out.len(),
            nnz = header.n_nonzero,
            "encoded CSC layout"
        );
        Ok(out)
    }

    /// Decode a buffer written by [`SpMat::to_layout_bytes`]
    ///
    /// Every array invariant is re-checked, so arbitrary input either
    /// yields a valid matrix or an error.
    pub fn from_layout_bytes(bytes: &[u8]) -> Result<Self> {
        let header = CscHeader::from_bytes(bytes)?;
        if header.element_type()? != T::data_type() {
            return Err(CscError::UnsupportedFormat);
        }
        if bytes.len() < header.total_size()? {
            return Err(CscError::InsufficientBuffer);
        }

        let values: Vec<T> = read_pod(region(
            bytes,
            header.values_offset,
            header.values_size,
        )?)?;
        let row_indices = read_indices(region(
            bytes,
            header.row_indices_offset,
            header.row_indices_size,
        )?)?;
        let col_ptrs = read_indices(region(
            bytes,
            header.col_ptrs_offset,
            header.col_ptrs_size,
        )?)?;

        let n_rows = to_usize(header.n_rows)?;
        let n_cols = to_usize(header.n_cols)?;
        let mat = Self::from_csc_parts(n_rows, n_cols, row_indices, col_ptrs, values)
            .map_err(|e| match e {
                CscError::DimensionMismatch { .. } | CscError::OutOfBounds { .. } => {
                    CscError::CorruptedData
                }
                other => other,
            })?;
        debug!(n_rows, n_cols, nnz = mat.n_nonzero, "decoded CSC layout");
        Ok(mat)
    }
}

fn pad_to(out: &mut Vec<u8>, offset: u64) {
    let padding = calculate_padding(out.len(), ALIGNMENT_BOUNDARY);
    out.resize(out.len() + padding, 0);
    debug_assert_eq!(out.len() as u64, offset);
}

fn to_usize(v: u64) -> Result<usize> {
    usize::try_from(v).map_err(|_| CscError::SizeOverflow)
}

fn region(bytes: &[u8], offset: u64, size: u64) -> Result<&[u8]> {
    let start = to_usize(offset)?;
    let end = start
        .checked_add(to_usize(size)?)
        .ok_or(CscError::SizeOverflow)?;
    bytes.get(start..end).ok_or(CscError::InsufficientBuffer)
}

fn read_pod<T: bytemuck::Pod>(bytes: &[u8]) -> Result<Vec<T>> {
    let len = validate_array_bounds::<T>(bytes.len())?;
    let mut out = try_vec(len)?;
    out.extend(
        bytes
            .chunks_exact(size_of::<T>())
            .map(bytemuck::pod_read_unaligned::<T>),
    );
    Ok(out)
}

fn read_indices(bytes: &[u8]) -> Result<Vec<usize>> {
    let raw: Vec<u64> = read_pod(bytes)?;
    let mut out = try_vec(raw.len())?;
    for v in raw {
        out.push(to_usize(u64::from_le(v))?);
    }
    Ok(out)
}
