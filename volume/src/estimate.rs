use crate::VolumeError;
use dem::{Grid, NODATA};
use log::debug;
use serde::Serialize;

/// Starting value of the running minimum; any real elevation is lower.
const MIN_ELEVATION_INIT: f64 = 10_000.0;

/// Starting value of the running maximum; any real elevation is higher.
const MAX_ELEVATION_INIT: f64 = -10_000.0;

/// Result of a single pass over an elevation grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Reference elevation volume is measured from.
    pub floor: f64,

    /// Ground width of one pixel.
    pub pixel_width: f64,

    /// Ground height of one pixel (reported, not used for area).
    pub pixel_height: f64,

    /// Every sample in the grid, no-data included.
    pub total_pixels: usize,

    /// Samples that took part in aggregation.
    pub valid_pixels: usize,

    /// Sum of `(elevation - floor) * pixel_width²` over valid samples
    /// above the floor.
    pub total_volume: f64,

    /// Lowest valid elevation, meaningless if `valid_pixels` is zero.
    pub min_elevation: f64,

    /// Highest valid elevation, meaningless if `valid_pixels` is zero.
    pub max_elevation: f64,
}

impl Estimate {
    pub fn builder() -> EstimateBuilder {
        EstimateBuilder {
            floor: None,
            pixel_size: None,
        }
    }

    /// Returns the (min, max) valid elevation.
    ///
    /// Fails if no sample was valid, as the bounds would still be
    /// their starting values.
    pub fn range(&self) -> Result<(f64, f64), VolumeError> {
        if self.valid_pixels == 0 {
            Err(VolumeError::NoValidSamples(self.total_pixels))
        } else {
            Ok((self.min_elevation, self.max_elevation))
        }
    }
}

/// Returns the volume estimate for `grid` above `floor`.
pub fn estimate(
    grid: &Grid,
    pixel_width: f64,
    pixel_height: f64,
    floor: f64,
) -> Result<Estimate, VolumeError> {
    Estimate::builder()
        .floor(floor)
        .pixel_size(pixel_width, pixel_height)
        .build(grid)
}

pub struct EstimateBuilder {
    /// Reference elevation (required).
    floor: Option<f64>,

    /// Pixel (width, height) in ground units (required).
    pixel_size: Option<(f64, f64)>,
}

impl EstimateBuilder {
    /// Reference elevation (required).
    #[must_use]
    pub fn floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Pixel (width, height) in ground units (required).
    #[must_use]
    pub fn pixel_size(mut self, width: f64, height: f64) -> Self {
        self.pixel_size = Some((width, height));
        self
    }

    pub fn build(&self, grid: &Grid) -> Result<Estimate, VolumeError> {
        self.build_with_progress(grid, |_| ())
    }

    /// Like [`build`](Self::build), calling `on_row` with the number
    /// of samples visited after each row.
    pub fn build_with_progress<F>(&self, grid: &Grid, mut on_row: F) -> Result<Estimate, VolumeError>
    where
        F: FnMut(u64),
    {
        let floor = self.floor.ok_or(VolumeError::Builder("floor"))?;
        let (pixel_width, pixel_height) =
            self.pixel_size.ok_or(VolumeError::Builder("pixel_size"))?;
        if !floor.is_finite() {
            return Err(VolumeError::Floor(floor));
        }
        if !(pixel_width.is_finite() && pixel_width > 0.0) {
            return Err(VolumeError::PixelWidth(pixel_width));
        }

        let total_pixels = grid.rows() * grid.cols();
        let mut valid_pixels = 0;
        let mut total_volume = 0.0;
        let mut min_elevation = MIN_ELEVATION_INIT;
        let mut max_elevation = MAX_ELEVATION_INIT;

        // Strictly row-major so the floating point sum is reproducible.
        for row in grid.iter_rows() {
            for &elevation in row {
                if elevation == NODATA || elevation.is_nan() {
                    continue;
                }
                if elevation > floor {
                    total_volume += (elevation - floor) * pixel_width * pixel_width;
                }
                max_elevation = max_elevation.max(elevation);
                min_elevation = min_elevation.min(elevation);
                valid_pixels += 1;
            }
            on_row(row.len() as u64);
        }

        debug!("{valid_pixels} of {total_pixels} samples valid, volume {total_volume}");

        Ok(Estimate {
            floor,
            pixel_width,
            pixel_height,
            total_pixels,
            valid_pixels,
            total_volume,
            min_elevation,
            max_elevation,
        })
    }
}
