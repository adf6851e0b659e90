//! Validation utilities for CSC storage
//!
//! Pure arithmetic checks on shapes and layout constraints. No I/O.

pub mod bounds;
pub mod format;

pub use bounds::{
    checked_col_ptrs_len, checked_elem_count, enlarge_to_chunk, validate_array_bounds,
};
pub use format::{align_to_boundary, calculate_padding};
