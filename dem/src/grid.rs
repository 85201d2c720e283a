//! In-memory elevation grid.

use crate::DemError;

/// A row-major `rows x cols` grid of elevation samples.
///
/// A `Grid` always holds exactly one sample per pixel; multi-band
/// sources are rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    samples: Box<[f64]>,
}

impl Grid {
    /// Returns a single-band grid over `samples`.
    pub fn new(rows: usize, cols: usize, samples: Vec<f64>) -> Result<Self, DemError> {
        Self::from_interleaved(rows, cols, 1, samples)
    }

    /// Returns a grid over pixel-interleaved `samples`.
    ///
    /// Fails with [`DemError::MultiBand`] unless `samples_per_pixel`
    /// is 1.
    pub fn from_interleaved(
        rows: usize,
        cols: usize,
        samples_per_pixel: u16,
        samples: Vec<f64>,
    ) -> Result<Self, DemError> {
        check_single_band(samples_per_pixel)?;
        let expected = rows * cols;
        if samples.len() != expected {
            return Err(DemError::Dimensions {
                rows,
                cols,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            samples: samples.into_boxed_slice(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of samples in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns the sample at (`row`, `col`), if in bounds.
    #[cfg(test)]
    pub(crate) fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.samples[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns all samples in row-major order.
    #[cfg(test)]
    pub(crate) fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Returns an iterator over rows, north to south.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // `chunks_exact` panics on a zero chunk size.
        self.samples.chunks_exact(self.cols.max(1))
    }
}

/// Fails unless a source stores one sample per pixel.
pub(crate) fn check_single_band(samples_per_pixel: u16) -> Result<(), DemError> {
    if samples_per_pixel == 1 {
        Ok(())
    } else {
        Err(DemError::MultiBand(samples_per_pixel))
    }
}
