use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("not a readable raster, {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("invalid HGT name {0}")]
    HgtName(PathBuf),

    #[error("invalid HGT file len {0} for {1}")]
    HgtLen(u64, PathBuf),

    #[error("wrong file type, expected single-band raster but found {0} samples per pixel")]
    MultiBand(u16),

    #[error("{rows}x{cols} grid needs {expected} samples, got {actual}")]
    Dimensions {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
}

impl DemError {
    /// Returns `true` if the file was a raster, just not a
    /// single-band elevation raster.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::MultiBand(_))
    }
}
