use geo::geometry::Coord;

/// Affine pixel-to-world transform, in GDAL coefficient order:
///
/// ```text
/// [origin_x, pixel_width, row_rotation, origin_y, column_rotation, pixel_height]
/// ```
///
/// `pixel_height` is negative for north-up rasters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(pub [f64; 6]);

impl Default for GeoTransform {
    /// The transform of a raster with no geo-referencing: one unit per
    /// pixel, origin at the top-left corner.
    fn default() -> Self {
        Self([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }
}

impl GeoTransform {
    /// Returns a north-up transform.
    pub fn north_up(origin: Coord, pixel_width: f64, pixel_height: f64) -> Self {
        Self([origin.x, pixel_width, 0.0, origin.y, 0.0, -pixel_height])
    }

    /// Returns a transform from a GeoTIFF `ModelPixelScaleTag` and
    /// `ModelTiepointTag`, if both are well formed.
    pub fn from_scale_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }
        // tiepoint: [I, J, K, X, Y, Z], scale: [SX, SY, SZ]
        let origin = Coord {
            x: tiepoint[3] - tiepoint[0] * scale[0],
            y: tiepoint[4] + tiepoint[1] * scale[1],
        };
        Some(Self::north_up(origin, scale[0], scale[1]))
    }

    /// Returns a transform from a GeoTIFF `ModelTransformationTag`
    /// (a row-major 4x4 matrix), if well formed.
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        Some(Self([
            matrix[3], matrix[0], matrix[1], matrix[7], matrix[4], matrix[5],
        ]))
    }

    /// World coordinate of the raster's top-left corner.
    pub fn origin(&self) -> Coord {
        Coord {
            x: self.0[0],
            y: self.0[3],
        }
    }

    /// Horizontal ground size of one pixel.
    pub fn pixel_width(&self) -> f64 {
        self.0[1].abs()
    }

    /// Vertical ground size of one pixel.
    pub fn pixel_height(&self) -> f64 {
        self.0[5].abs()
    }
}
