//! Persisted layout definitions for CSC matrices
//!
//! Pure data structure definitions. No I/O operations.

pub mod constants;
pub mod header;

pub use header::{CscHeader, DataType};
pub use constants::{
    ALIGNMENT_BOUNDARY, COL_PTR_SENTINEL, DEFAULT_CHUNK_SIZE, NO_EXPLICIT_ZEROS, SORTED_INDICES,
};
