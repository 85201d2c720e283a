use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolumeError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("pixel width must be a positive number, got {0}")]
    PixelWidth(f64),

    #[error("floor must be a finite number, got {0}")]
    Floor(f64),

    #[error("no valid elevation samples among {0} pixels")]
    NoValidSamples(usize),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
