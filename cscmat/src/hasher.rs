//! Process-wide hasher state for cache maps
//!
//! Every cache overlay hashes linear indices with the same randomly keyed
//! `RandomState`. The keys are drawn once, on first use or on an explicit
//! call to [`init`].

use std::collections::hash_map::RandomState;

use once_cell::sync::OnceCell;

static HASH_STATE: OnceCell<RandomState> = OnceCell::new();

/// Initialize the shared hasher state
///
/// Idempotent and thread-safe; later calls are no-ops. Calling it is
/// optional since the first cache map initializes it lazily.
pub fn init() {
    HASH_STATE.get_or_init(RandomState::new);
}

/// True once the shared state exists
pub fn is_initialized() -> bool {
    HASH_STATE.get().is_some()
}

pub(crate) fn build_hasher() -> RandomState {
    HASH_STATE.get_or_init(RandomState::new).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasher;

    #[test]
    fn test_init_is_idempotent() {
        init();
        assert!(is_initialized());
        let a = build_hasher().hash_one(42usize);
        init();
        let b = build_hasher().hash_one(42usize);
        assert_eq!(a, b);
    }

    #[test]
    fn test_init_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| build_hasher().hash_one(7usize)))
            .collect();
        let hashes: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(hashes.windows(2).all(|w| w[0] == w[1]));
    }
}
