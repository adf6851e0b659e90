#![no_std]

//! cscmat Core - Compressed Sparse Column definitions
//!
//! This crate provides the element trait, error taxonomy, source traits
//! and persisted layout header shared by CSC storage implementations.
//! It contains no storage and no I/O.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
pub use validation::{
    align_to_boundary, calculate_padding, checked_col_ptrs_len, checked_elem_count,
    enlarge_to_chunk, validate_array_bounds,
};
