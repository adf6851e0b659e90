//! Layout constants for CSC storage

/// Default alignment boundary for persisted arrays
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Default growth granularity of the value and row-index buffers
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Value stored in the extra slot after the last column pointer
pub const COL_PTR_SENTINEL: usize = usize::MAX;

/// Structure flags recorded in the layout header
pub const SORTED_INDICES: u8 = 1;
pub const NO_EXPLICIT_ZEROS: u8 = 2;
