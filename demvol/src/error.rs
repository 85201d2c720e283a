use dem::DemError;
use std::path::PathBuf;
use thiserror::Error;
use volume::VolumeError;

#[derive(Error, Debug)]
pub enum DemvolError {
    #[error("{0}")]
    Dem(#[from] DemError),

    #[error("{0}")]
    Volume(#[from] VolumeError),

    #[error("could not write report to {0}, {1}")]
    Output(PathBuf, #[source] VolumeError),
}

impl DemvolError {
    /// Process exit code for this error.
    ///
    /// `2` is left to clap for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Dem(e) if e.is_format_mismatch() => 4,
            Self::Dem(_) => 3,
            Self::Volume(VolumeError::NoValidSamples(_)) => 5,
            Self::Output(..) => 6,
            Self::Volume(VolumeError::Io(_) | VolumeError::Json(_)) => 6,
            Self::Volume(
                VolumeError::PixelWidth(_) | VolumeError::Floor(_) | VolumeError::Builder(_),
            ) => 7,
        }
    }
}
