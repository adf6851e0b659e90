//! Error types for CSC storage operations

/// Errors that can occur while building, editing or decoding a CSC matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CscError {
    /// A (row, col) location lies outside the matrix shape
    OutOfBounds {
        row: usize,
        col: usize,
        n_rows: usize,
        n_cols: usize,
    },
    /// A linear or nonzero index lies outside its range
    IndexOutOfBounds { index: usize, len: usize },
    /// A range whose start lies after its end
    InvalidRange { start: usize, end: usize },
    /// Two sizes that must agree do not
    DimensionMismatch { expected: usize, found: usize },
    /// `n_rows * n_cols` does not fit in `usize`
    SizeOverflow,
    /// Density outside `[0, 1]`
    InvalidDensity,
    /// The same location appears twice where duplicates are rejected
    DuplicateLocation { row: usize, col: usize },
    /// Locations are not in column-major order and sorting was not requested
    UnsortedInput { position: usize },
    /// The allocator refused to grow a buffer
    AllocationFailure,
    /// Invalid layout header
    InvalidHeader,
    /// Insufficient buffer space
    InsufficientBuffer,
    /// Unsupported layout version or element type
    UnsupportedFormat,
    /// Arrays violate the CSC invariants
    CorruptedData,
}

/// Coarse classification of [`CscError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    OutOfBounds,
    DimensionMismatch,
    DuplicateLocation,
    UnsortedInput,
    Allocation,
    Format,
}

impl CscError {
    /// Get the category this error belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            CscError::OutOfBounds { .. }
            | CscError::IndexOutOfBounds { .. }
            | CscError::InvalidRange { .. } => ErrorCategory::OutOfBounds,
            CscError::DimensionMismatch { .. }
            | CscError::SizeOverflow
            | CscError::InvalidDensity => ErrorCategory::DimensionMismatch,
            CscError::DuplicateLocation { .. } => ErrorCategory::DuplicateLocation,
            CscError::UnsortedInput { .. } => ErrorCategory::UnsortedInput,
            CscError::AllocationFailure => ErrorCategory::Allocation,
            CscError::InvalidHeader
            | CscError::InsufficientBuffer
            | CscError::UnsupportedFormat
            | CscError::CorruptedData => ErrorCategory::Format,
        }
    }

    /// Shorthand for a location error against a given shape
    pub const fn out_of_bounds(row: usize, col: usize, n_rows: usize, n_cols: usize) -> Self {
        CscError::OutOfBounds {
            row,
            col,
            n_rows,
            n_cols,
        }
    }
}

impl core::fmt::Display for CscError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CscError::OutOfBounds {
                row,
                col,
                n_rows,
                n_cols,
            } => write!(
                f,
                "Location ({row}, {col}) out of bounds for {n_rows}x{n_cols} matrix"
            ),
            CscError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds (len {len})")
            }
            CscError::InvalidRange { start, end } => {
                write!(f, "Invalid range: start {start} > end {end}")
            }
            CscError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
            CscError::SizeOverflow => write!(f, "Requested size is too large"),
            CscError::InvalidDensity => write!(f, "Density must be in [0, 1]"),
            CscError::DuplicateLocation { row, col } => {
                write!(f, "Detected identical locations at ({row}, {col})")
            }
            CscError::UnsortedInput { position } => write!(
                f,
                "Out of order location at position {position}; enable sorting or sort the input"
            ),
            CscError::AllocationFailure => write!(f, "Out of memory"),
            CscError::InvalidHeader => write!(f, "Invalid CSC header"),
            CscError::InsufficientBuffer => write!(f, "Insufficient buffer space"),
            CscError::UnsupportedFormat => write!(f, "Unsupported format version"),
            CscError::CorruptedData => write!(f, "Data corruption detected"),
        }
    }
}

impl core::error::Error for CscError {}

/// Result type for CSC operations
pub type Result<T> = core::result::Result<T, CscError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            CscError::out_of_bounds(3, 0, 2, 2).category(),
            ErrorCategory::OutOfBounds
        );
        assert_eq!(
            CscError::SizeOverflow.category(),
            ErrorCategory::DimensionMismatch
        );
        assert_eq!(
            CscError::UnsortedInput { position: 1 }.category(),
            ErrorCategory::UnsortedInput
        );
        assert_eq!(CscError::CorruptedData.category(), ErrorCategory::Format);
    }
}
