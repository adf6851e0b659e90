//! Injected randomness for random sparse construction
//!
//! Random number generation itself lives outside the storage engine. The
//! random constructors only need these two capabilities.

/// Fills a slice with element values drawn from some distribution
pub trait ValueSource<T> {
    /// Overwrite every slot of `out` with a fresh draw
    fn fill_values(&mut self, out: &mut [T]);
}

/// Produces uniform draws in `[0, 1)`
pub trait UnitSource {
    /// Next uniform draw
    fn next_unit(&mut self) -> f64;
}

/// Pairs a value source with a separate unit source
impl<T, V: ValueSource<T>, U> ValueSource<T> for (V, U) {
    fn fill_values(&mut self, out: &mut [T]) {
        self.0.fill_values(out)
    }
}

impl<V, U: UnitSource> UnitSource for (V, U) {
    fn next_unit(&mut self) -> f64 {
        self.1.next_unit()
    }
}
