//! Persisted CSC layout header
//!
//! A fixed 80-byte little-endian header describing where the three CSC
//! arrays sit in a contiguous byte buffer. Row indices and column
//! pointers are always persisted as `u64`, independent of the host
//! pointer width.

use core::mem::size_of;

use crate::error::{CscError, Result};
use crate::format::constants::ALIGNMENT_BOUNDARY;
use crate::validation::{align_to_boundary, checked_elem_count};

/// Element type tag stored in the header
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    F32 = 0,
    F64 = 1,
    I32 = 2,
    I64 = 3,
    U32 = 4,
    U64 = 5,
}

impl DataType {
    /// Decode a tag byte
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(DataType::F32),
            1 => Some(DataType::F64),
            2 => Some(DataType::I32),
            3 => Some(DataType::I64),
            4 => Some(DataType::U32),
            5 => Some(DataType::U64),
            _ => None,
        }
    }

    /// Width of one value in bytes
    pub const fn size_bytes(self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 | DataType::I64 | DataType::U64 => 8,
        }
    }
}

/// Fixed-size header preceding a persisted CSC matrix
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CscHeader {
    /// Magic bytes: "SPCS"
    pub magic: [u8; 4],
    /// Format version
    pub version: u8,
    /// Element type tag, see [`DataType`]
    pub data_type: u8,
    /// Structure flags, see `constants::SORTED_INDICES`
    pub structure_flags: u8,
    /// Width in bytes of each persisted index (always 8)
    pub index_width: u8,
    /// Number of rows
    pub n_rows: u64,
    /// Number of columns
    pub n_cols: u64,
    /// Number of stored nonzeros
    pub n_nonzero: u64,
    /// Offset to the values array from buffer start
    pub values_offset: u64,
    /// Size of the values array in bytes
    pub values_size: u64,
    /// Offset to the row index array
    pub row_indices_offset: u64,
    /// Size of the row index array in bytes
    pub row_indices_size: u64,
    /// Offset to the column pointer array (`n_cols + 1` entries)
    pub col_ptrs_offset: u64,
    /// Size of the column pointer array in bytes
    pub col_ptrs_size: u64,
}

const fn put_u64(mut bytes: [u8; CscHeader::SIZE], at: usize, value: u64) -> [u8; CscHeader::SIZE] {
    let le = value.to_le_bytes();
    let mut i = 0;
    while i < 8 {
        bytes[at + i] = le[i];
        i += 1;
    }
    bytes
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

fn to_u64(value: usize) -> Result<u64> {
    u64::try_from(value).map_err(|_| CscError::SizeOverflow)
}

impl CscHeader {
    /// Magic bytes for persisted CSC buffers
    pub const MAGIC: [u8; 4] = *b"SPCS";

    /// Current format version
    pub const VERSION: u8 = 1;

    /// Width of persisted indices
    pub const INDEX_WIDTH: u8 = 8;

    /// Size of the header in bytes
    pub const SIZE: usize = size_of::<Self>();

    /// Create an empty header (0x0 matrix, no arrays)
    pub const fn new() -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            data_type: 0,
            structure_flags: 0,
            index_width: Self::INDEX_WIDTH,
            n_rows: 0,
            n_cols: 0,
            n_nonzero: 0,
            values_offset: 0,
            values_size: 0,
            row_indices_offset: 0,
            row_indices_size: 0,
            col_ptrs_offset: 0,
            col_ptrs_size: 0,
        }
    }

    /// Describe a matrix and compute aligned array offsets
    pub fn describe(
        data_type: DataType,
        n_rows: usize,
        n_cols: usize,
        n_nonzero: usize,
        structure_flags: u8,
    ) -> Result<Self> {
        let n_elem = checked_elem_count(n_rows, n_cols)?;
        if n_nonzero > n_elem {
            return Err(CscError::DimensionMismatch {
                expected: n_elem,
                found: n_nonzero,
            });
        }

        let index_width = Self::INDEX_WIDTH as usize;
        let values_size = n_nonzero
            .checked_mul(data_type.size_bytes())
            .ok_or(CscError::SizeOverflow)?;
        let row_indices_size = n_nonzero
            .checked_mul(index_width)
            .ok_or(CscError::SizeOverflow)?;
        let col_ptrs_size = n_cols
            .checked_add(1)
            .and_then(|n| n.checked_mul(index_width))
            .ok_or(CscError::SizeOverflow)?;

        let values_offset = align_to_boundary(Self::SIZE, ALIGNMENT_BOUNDARY);
        let row_indices_offset = values_offset
            .checked_add(values_size)
            .map(|end| align_to_boundary(end, ALIGNMENT_BOUNDARY))
            .ok_or(CscError::SizeOverflow)?;
        let col_ptrs_offset = row_indices_offset
            .checked_add(row_indices_size)
            .map(|end| align_to_boundary(end, ALIGNMENT_BOUNDARY))
            .ok_or(CscError::SizeOverflow)?;
        col_ptrs_offset
            .checked_add(col_ptrs_size)
            .ok_or(CscError::SizeOverflow)?;

        let mut header = Self::new();
        header.data_type = data_type as u8;
        header.structure_flags = structure_flags;
        header.n_rows = to_u64(n_rows)?;
        header.n_cols = to_u64(n_cols)?;
        header.n_nonzero = to_u64(n_nonzero)?;
        header.values_offset = to_u64(values_offset)?;
        header.values_size = to_u64(values_size)?;
        header.row_indices_offset = to_u64(row_indices_offset)?;
        header.row_indices_size = to_u64(row_indices_size)?;
        header.col_ptrs_offset = to_u64(col_ptrs_offset)?;
        header.col_ptrs_size = to_u64(col_ptrs_size)?;
        Ok(header)
    }

    /// Validate the header magic and version
    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC && self.version <= Self::VERSION
    }

    /// Get the decoded element type
    pub fn element_type(&self) -> Result<DataType> {
        DataType::from_u8(self.data_type).ok_or(CscError::UnsupportedFormat)
    }

    /// Total number of bytes the header and its arrays occupy
    pub fn total_size(&self) -> Result<usize> {
        let end = self
            .col_ptrs_offset
            .checked_add(self.col_ptrs_size)
            .ok_or(CscError::SizeOverflow)?;
        usize::try_from(end).map_err(|_| CscError::SizeOverflow)
    }

    /// Check that shape, counts and array regions are mutually consistent
    pub fn validate(&self) -> Result<()> {
        if self.magic != Self::MAGIC {
            return Err(CscError::InvalidHeader);
        }
        if self.version > Self::VERSION || self.index_width != Self::INDEX_WIDTH {
            return Err(CscError::UnsupportedFormat);
        }
        let data_type = self.element_type()?;

        let n_rows = usize::try_from(self.n_rows).map_err(|_| CscError::SizeOverflow)?;
        let n_cols = usize::try_from(self.n_cols).map_err(|_| CscError::SizeOverflow)?;
        let n_nonzero = usize::try_from(self.n_nonzero).map_err(|_| CscError::SizeOverflow)?;

        let expected = Self::describe(data_type, n_rows, n_cols, n_nonzero, self.structure_flags)
            .map_err(|e| match e {
                CscError::DimensionMismatch { .. } => CscError::CorruptedData,
                other => other,
            })?;

        // Offsets may be padded further than the minimum but never overlap.
        if self.values_size != expected.values_size
            || self.row_indices_size != expected.row_indices_size
            || self.col_ptrs_size != expected.col_ptrs_size
        {
            return Err(CscError::CorruptedData);
        }
        let values_end = self.values_offset.checked_add(self.values_size);
        let rows_end = self.row_indices_offset.checked_add(self.row_indices_size);
        let ordered = self.values_offset >= Self::SIZE as u64
            && matches!(values_end, Some(end) if end <= self.row_indices_offset)
            && matches!(rows_end, Some(end) if end <= self.col_ptrs_offset);
        if !ordered {
            return Err(CscError::CorruptedData);
        }
        self.total_size()?;
        Ok(())
    }

    /// Parse and validate a header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CscError::InsufficientBuffer);
        }

        if bytes[0..4] != Self::MAGIC {
            return Err(CscError::InvalidHeader);
        }

        let header = Self {
            magic: Self::MAGIC,
            version: bytes[4],
            data_type: bytes[5],
            structure_flags: bytes[6],
            index_width: bytes[7],
            n_rows: read_u64(bytes, 8),
            n_cols: read_u64(bytes, 16),
            n_nonzero: read_u64(bytes, 24),
            values_offset: read_u64(bytes, 32),
            values_size: read_u64(bytes, 40),
            row_indices_offset: read_u64(bytes, 48),
            row_indices_size: read_u64(bytes, 56),
            col_ptrs_offset: read_u64(bytes, 64),
            col_ptrs_size: read_u64(bytes, 72),
        };
        header.validate()?;
        Ok(header)
    }

    /// Convert header to bytes (no-std compatible)
    pub const fn to_bytes_array(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];

        bytes[0] = self.magic[0];
        bytes[1] = self.magic[1];
        bytes[2] = self.magic[2];
        bytes[3] = self.magic[3];
        bytes[4] = self.version;
        bytes[5] = self.data_type;
        bytes[6] = self.structure_flags;
        bytes[7] = self.index_width;

        bytes = put_u64(bytes, 8, self.n_rows);
        bytes = put_u64(bytes, 16, self.n_cols);
        bytes = put_u64(bytes, 24, self.n_nonzero);
        bytes = put_u64(bytes, 32, self.values_offset);
        bytes = put_u64(bytes, 40, self.values_size);
        bytes = put_u64(bytes, 48, self.row_indices_offset);
        bytes = put_u64(bytes, 56, self.row_indices_size);
        bytes = put_u64(bytes, 64, self.col_ptrs_offset);
        bytes = put_u64(bytes, 72, self.col_ptrs_size);
        bytes
    }

    /// Convert header to bytes (requires alloc feature)
    #[cfg(feature = "alloc")]
    pub fn to_bytes(&self) -> alloc::vec::Vec<u8> {
        self.to_bytes_array().to_vec()
    }
}

impl Default for CscHeader {
    fn default() -> Self {
        Self::new()
    }
}
