//! Single-band elevation raster loading.
//!
//! [`open`] reads a GeoTIFF or SRTM `.hgt` file into an in-memory
//! [`Grid`] plus its [`GeoTransform`]. The underlying file handle is
//! closed before `open` returns.

mod error;
pub mod geotiff;
mod grid;
pub mod hgt;
mod transform;

pub use crate::{error::DemError, grid::Grid, transform::GeoTransform};
use log::{info, warn};
use std::{ffi::OsStr, path::Path};

/// Literal value marking a missing elevation sample.
pub const NODATA: f64 = -9999.0;

/// An elevation raster read into memory.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Elevation samples.
    pub grid: Grid,

    /// Pixel-to-world transform.
    pub transform: GeoTransform,

    /// No-data value declared by the file, if any.
    pub nodata: Option<f64>,
}

/// Returns the raster read from the file at `path`.
///
/// Files with an `.hgt` extension are read as SRTM height tiles,
/// everything else as GeoTIFF.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Raster, DemError> {
    let path = path.as_ref();
    let is_hgt = path
        .extension()
        .and_then(OsStr::to_str)
        .map_or(false, |ext| ext.eq_ignore_ascii_case("hgt"));
    let raster = if is_hgt {
        hgt::load(path)?
    } else {
        geotiff::load(path)?
    };

    info!(
        "opened {}: {}x{} samples",
        path.display(),
        raster.grid.rows(),
        raster.grid.cols()
    );
    match raster.nodata {
        Some(nodata) if nodata != NODATA => {
            warn!(
                "{} declares no-data value {nodata}, only {NODATA} is skipped",
                path.display()
            );
        }
        _ => (),
    }
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::{open, DemError};
    use std::{fs::File, io::Write};

    #[test]
    fn test_open_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        // Same bytes, different readers.
        let hgt_path = dir.path().join("N10E010.HGT");
        File::create(&hgt_path).unwrap().write_all(&[0; 8]).unwrap();
        assert!(matches!(open(&hgt_path), Err(DemError::HgtLen(8, _))));

        let tif_path = dir.path().join("N10E010.tif");
        File::create(&tif_path).unwrap().write_all(&[0; 8]).unwrap();
        assert!(matches!(open(&tif_path), Err(DemError::Tiff(_))));
    }

    #[test]
    fn test_open_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open(dir.path().join("nope.tif")),
            Err(DemError::Io(_))
        ));
    }
}
