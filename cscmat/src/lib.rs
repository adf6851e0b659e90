//! CSCMAT - Compressed Sparse Column Matrix Storage
//!
//! This library stores sparse matrices in CSC form and pairs the compressed
//! arrays with a hash-map element cache, so scattered single-element writes
//! do not pay for an array shift each time.
//!
//! ## Architecture
//!
//! CSCMAT is split into a definitions crate and a storage crate:
//!
//! - **cscmat-core**: Element traits, errors, the persisted header and
//!   overflow-checked arithmetic (`no_std`, no allocation by default)
//! - **cscmat**: The `SpMat` container, its cache and every operation on it
//!
//! A matrix is always in one of three [`SyncState`]s. Writes through
//! [`SpMat::elem_mut`] land in the cache and mark it dirty; any operation
//! that needs the arrays folds the cache back in first.
//!
//! ## Quick Start
//!
//! ```rust
//! use cscmat::{BatchOptions, SpMat};
//!
//! fn example() -> cscmat::Result<()> {
//!     let locations = [[0, 0], [2, 1], [1, 2]];
//!     let values = [1.0, 2.0, 3.0];
//!     let mut mat = SpMat::from_batch(&locations, &values, 3, 3, BatchOptions::default())?;
//!
//!     // Scattered writes go through the cache
//!     mat.elem_mut(2, 2)?.set(4.0);
//!     mat.elem_mut(0, 0)?.add_assign(1.0);
//!
//!     assert_eq!(mat.at(0, 0)?, 2.0);
//!     assert_eq!(mat.nonzero_count(), 4);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Batch construction**: Sorted, unsorted or accumulating triplet input
//! - **Structural edits**: Shed, insert and swap rows and columns, resize
//!   and reshape
//! - **Random matrices**: `sprand` with injected randomness, `rand`-backed
//!   `sprandu`/`sprandn` under the `rand` feature
//! - **Persisted layout**: Header plus aligned arrays, validated on decode
//! - **Type safety**: Strong typing with cscmat-core abstractions

// Re-export core abstractions and format definitions
pub use cscmat_core::{
    // Core traits
    MatrixElement, MatrixOperations, SparseMatrix, SparseSource, UnitSource, ValueSource,
    // Format definitions
    CscHeader, DataType,
    // Error handling
    CscError, ErrorCategory, Result,
};

pub mod batch;
pub mod buffer;
pub mod cache;
pub mod config;
pub mod hasher;
pub mod iter;
pub mod layout;
pub mod matrix;
mod mutate;
pub mod random;
mod structural;
pub mod sync;
pub mod xform;

pub use batch::{BatchBuilder, BatchOptions};
pub use cache::{CacheMap, ElemMut};
pub use config::StorageConfig;
pub use hasher::init;
pub use iter::{ColIter, Iter};
pub use layout::CscLayout;
pub use matrix::SpMat;
pub use sync::SyncState;
pub use xform::{TripletIter, TripletSource};

#[cfg(feature = "rand")]
pub use random::{RandSource, ValueDistribution};
