//! Owned array storage with chunked growth
//!
//! The value and row-index arrays of a CSC matrix grow one element at a
//! time during element insertion. `ChunkedBuf` keeps their capacity at a
//! multiple of a fixed chunk size so that most insertions shift in place
//! and only every `chunk`-th one reallocates.

use cscmat_core::{enlarge_to_chunk, CscError, Result, DEFAULT_CHUNK_SIZE};

/// Growable array whose capacity is kept at a multiple of `chunk`
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedBuf<T> {
    data: Vec<T>,
    chunk: usize,
}

impl<T> Default for ChunkedBuf<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            chunk: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl<T: Copy> ChunkedBuf<T> {
    /// Allocate `len` copies of `fill`
    pub fn filled(len: usize, fill: T, chunk: usize) -> Result<Self> {
        let mut buf = Self {
            data: Vec::new(),
            chunk: chunk.max(1),
        };
        buf.reserve_len(len)?;
        buf.data.resize(len, fill);
        Ok(buf)
    }

    /// Wrap an existing vector without copying
    pub fn from_vec(data: Vec<T>, chunk: usize) -> Self {
        Self {
            data,
            chunk: chunk.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Make room for `len` elements, rounding the allocation up to the chunk
    pub fn reserve_len(&mut self, len: usize) -> Result<()> {
        if len <= self.data.capacity() {
            return Ok(());
        }
        let target = enlarge_to_chunk(len, self.chunk);
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| CscError::AllocationFailure)
    }

    /// Set the logical length, filling new slots with `fill`
    pub fn resize(&mut self, len: usize, fill: T) -> Result<()> {
        self.reserve_len(len)?;
        self.data.resize(len, fill);
        Ok(())
    }

    /// Shorten to `len`, releasing whole chunks that are no longer needed
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
        self.release_spare();
    }

    /// Insert at `pos`, shifting the tail right
    pub fn insert(&mut self, pos: usize, value: T) -> Result<()> {
        self.reserve_len(self.data.len() + 1)?;
        self.data.insert(pos, value);
        Ok(())
    }

    /// Remove at `pos`, shifting the tail left
    pub fn remove(&mut self, pos: usize) -> T {
        let value = self.data.remove(pos);
        self.release_spare();
        value
    }

    /// Remove a contiguous range
    pub fn remove_range(&mut self, start: usize, end: usize) {
        self.data.drain(start..end);
        self.release_spare();
    }

    /// Move the contents out, leaving this buffer empty
    pub fn take(&mut self) -> Self {
        Self {
            data: std::mem::take(&mut self.data),
            chunk: self.chunk,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn release_spare(&mut self) {
        let wanted = enlarge_to_chunk(self.data.len(), self.chunk);
        if self.data.capacity() >= wanted.saturating_add(self.chunk) {
            self.data.shrink_to(wanted);
        }
    }
}

/// Empty vector with room for `capacity` elements, reporting allocation failure
pub(crate) fn try_vec<T>(capacity: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
        .map_err(|_| CscError::AllocationFailure)?;
    Ok(v)
}

/// Vector of `len` copies of `fill`, reporting allocation failure
pub(crate) fn try_filled<T: Clone>(len: usize, fill: T) -> Result<Vec<T>> {
    let mut v = try_vec(len)?;
    v.resize(len, fill);
    Ok(v)
}

impl<T> std::ops::Index<usize> for ChunkedBuf<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> std::ops::IndexMut<usize> for ChunkedBuf<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_is_chunked() {
        let mut buf = ChunkedBuf::filled(1, 0u32, 16).unwrap();
        assert!(buf.capacity() >= 16);
        let cap = buf.capacity();
        for i in 0..10 {
            buf.insert(0, i).unwrap();
        }
        assert_eq!(buf.len(), 11);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_insert_and_remove_shift() {
        let mut buf = ChunkedBuf::from_vec(vec![1, 2, 4, 0], 4);
        buf.insert(2, 3).unwrap();
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 0]);
        assert_eq!(buf.remove(0), 1);
        assert_eq!(buf.as_slice(), &[2, 3, 4, 0]);
        buf.remove_range(0, 2);
        assert_eq!(buf.as_slice(), &[4, 0]);
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut buf = ChunkedBuf::from_vec(vec![7.0f64, 0.0], 16);
        let moved = buf.take();
        assert!(buf.is_empty());
        assert_eq!(moved.as_slice(), &[7.0, 0.0]);
    }

    #[test]
    fn test_truncate_releases_chunks() {
        let mut buf = ChunkedBuf::filled(64, 1u8, 16).unwrap();
        buf.truncate(1);
        assert_eq!(buf.len(), 1);
        assert!(buf.capacity() < 64);
    }
}
