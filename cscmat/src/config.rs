//! Storage tuning knobs

use cscmat_core::DEFAULT_CHUNK_SIZE;

/// Configuration carried by every matrix
///
/// None of these settings change results, only allocation and sorting
/// behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StorageConfig {
    /// Growth granularity of the value and row-index buffers
    pub chunk_size: usize,
    /// Scan batch locations for order before paying for a sort
    pub check_sorted_first: bool,
    /// Batch sizes above this are sorted on the rayon pool
    pub parallel_sort_threshold: usize,
    /// Default for `BatchOptions::check_for_zeros`
    pub prune_zeros: bool,
}

impl StorageConfig {
    /// Set buffer growth granularity
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Enable or disable the pre-sort order scan
    pub fn with_check_sorted_first(mut self, check: bool) -> Self {
        self.check_sorted_first = check;
        self
    }

    /// Set the batch size above which sorting goes parallel
    pub fn with_parallel_sort_threshold(mut self, threshold: usize) -> Self {
        self.parallel_sort_threshold = threshold;
        self
    }

    /// Set the default zero-pruning behavior of batch construction
    pub fn with_prune_zeros(mut self, prune: bool) -> Self {
        self.prune_zeros = prune;
        self
    }

    /// Load a configuration from JSON; missing fields take defaults
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "serde")]
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            check_sorted_first: true,
            parallel_sort_threshold: 1_000_000,
            prune_zeros: true,
        }
    }
}
