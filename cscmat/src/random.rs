//! Random sparse construction
//!
//! Randomness is injected through [`ValueSource`] and [`UnitSource`]. The
//! positions of the nonzeros start evenly spaced over the linear index
//! range and each interior one is jittered within the gap to its
//! neighbours, so positions stay unique and sorted without a sort.

use cscmat_core::{checked_elem_count, CscError, MatrixElement, Result, UnitSource, ValueSource};
use tracing::debug;

use crate::buffer::try_filled;
use crate::config::StorageConfig;
use crate::matrix::SpMat;

impl<T: MatrixElement> SpMat<T> {
    /// Random matrix with `ceil(density * rows * cols)` nonzero slots
    ///
    /// The count is clamped to `rows * cols`, so any positive density
    /// yields at least one slot. `source` supplies both the values and the
    /// position jitter. Values drawn as exactly zero are dropped.
    pub fn sprand<S>(n_rows: usize, n_cols: usize, density: f64, source: &mut S) -> Result<Self>
    where
        S: ValueSource<T> + UnitSource,
    {
        if !(0.0..=1.0).contains(&density) {
            return Err(CscError::InvalidDensity);
        }
        let n_elem = checked_elem_count(n_rows, n_cols)?;
        let n = ((density * n_elem as f64).ceil() as usize).min(n_elem);
        if n == 0 {
            return Self::new(n_rows, n_cols);
        }

        let mut values = try_filled(n, T::zero())?;
        source.fill_values(&mut values);

        let mut positions = linspace_indices(n_elem - 1, n)?;
        for i in 1..n.saturating_sub(1) {
            let left = positions[i - 1];
            let right = positions[i + 1];
            let center = (left + right) / 2;
            let max_delta = (center - left - 1).min(right - center - 1);
            let jitter = max_delta as f64 * (2.0 * source.next_unit() - 1.0);
            let candidate = (center as f64 + jitter) as usize;
            if candidate > left && candidate < right {
                positions[i] = candidate;
            }
        }

        let mat = Self::from_sorted_triplets(
            n_rows,
            n_cols,
            n,
            positions
                .iter()
                .zip(values)
                .map(|(&pos, value)| (pos % n_rows, pos / n_rows, value)),
            StorageConfig::default(),
        )?;
        debug!(n_rows, n_cols, density, nnz = mat.n_nonzero, "built random matrix");
        Ok(mat)
    }
}

/// `n` strictly increasing indices spread over `0..=last`, ending at `last`
fn linspace_indices(last: usize, n: usize) -> Result<Vec<usize>> {
    let mut out = try_filled(n, 0usize)?;
    if n == 1 {
        out[0] = last;
        return Ok(out);
    }
    let step = last as f64 / (n - 1) as f64;
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = (i as f64 * step) as usize;
    }
    out[n - 1] = last;
    Ok(out)
}

#[cfg(feature = "rand")]
pub use self::rng::{RandSource, ValueDistribution};

#[cfg(feature = "rand")]
mod rng {
    use cscmat_core::{MatrixElement, Result, UnitSource, ValueSource};
    use rand::Rng;

    use crate::matrix::SpMat;

    /// Distribution used for generated values
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ValueDistribution {
        /// Uniform in `[0, 1)`
        Uniform,
        /// Standard normal
        Normal,
    }

    /// `rand`-backed implementation of the injected randomness traits
    ///
    /// Draws are converted with [`MatrixElement::from_f64`], which truncates
    /// for integer elements. Uniform draws in `[0, 1)` therefore all become
    /// zero and are dropped, and normal draws mostly do. Integer matrices
    /// need [`SpMat::sprand`] with a `ValueSource` that produces integers.
    #[derive(Debug, Clone)]
    pub struct RandSource<R> {
        rng: R,
        distribution: ValueDistribution,
    }

    impl<R: Rng> RandSource<R> {
        pub fn uniform(rng: R) -> Self {
            Self {
                rng,
                distribution: ValueDistribution::Uniform,
            }
        }

        pub fn normal(rng: R) -> Self {
            Self {
                rng,
                distribution: ValueDistribution::Normal,
            }
        }

        /// Box-Muller over two uniform draws
        fn standard_normal(&mut self) -> f64 {
            let u1: f64 = self.rng.gen();
            let u2: f64 = self.rng.gen();
            (-2.0 * (1.0 - u1).ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
        }
    }

    impl<R: Rng> UnitSource for RandSource<R> {
        fn next_unit(&mut self) -> f64 {
            self.rng.gen()
        }
    }

    impl<R: Rng, T: MatrixElement> ValueSource<T> for RandSource<R> {
        fn fill_values(&mut self, out: &mut [T]) {
            for slot in out {
                let draw = match self.distribution {
                    ValueDistribution::Uniform => self.rng.gen::<f64>(),
                    ValueDistribution::Normal => self.standard_normal(),
                };
                *slot = T::from_f64(draw);
            }
        }
    }

    impl<T: MatrixElement> SpMat<T> {
        /// Random matrix with values uniform in `[0, 1)`
        ///
        /// Meant for floating point elements. For integer `T` every draw
        /// truncates to zero, so the result has no nonzeros.
        pub fn sprandu<R: Rng>(
            n_rows: usize,
            n_cols: usize,
            density: f64,
            rng: &mut R,
        ) -> Result<Self> {
            Self::sprand(n_rows, n_cols, density, &mut RandSource::uniform(rng))
        }

        /// Random matrix with standard normal values
        ///
        /// Integer `T` keeps only the truncated part of each draw.
        pub fn sprandn<R: Rng>(
            n_rows: usize,
            n_cols: usize,
            density: f64,
            rng: &mut R,
        ) -> Result<Self> {
            Self::sprand(n_rows, n_cols, density, &mut RandSource::normal(rng))
        }
    }
}
