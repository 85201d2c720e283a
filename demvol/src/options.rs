use clap::Parser;
use std::{
    num::ParseFloatError,
    path::{Path, PathBuf},
    str::FromStr,
};
use volume::Format;

/// Estimate the volume of material above a floor elevation from a DEM.
///
/// Expects a single-band (raw) elevation raster, generally a DSM
/// rather than a DTM, not an RGB rendering of one.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a single-band DEM (GeoTIFF or SRTM .hgt).
    #[arg(short, long)]
    pub dem: PathBuf,

    /// Floor elevation, in meters, volume is measured from.
    #[arg(short, long, allow_negative_numbers = true)]
    pub floor: Floor,

    /// Append the report to this file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit the report as a line of JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Don't draw a progress bar.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// A floor elevation along with the text it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Floor {
    pub meters: f64,
    pub text: String,
}

impl FromStr for Floor {
    type Err = ParseFloatError;
    fn from_str(s: &str) -> Result<Self, ParseFloatError> {
        let meters = f64::from_str(s.trim())?;
        Ok(Self {
            meters,
            text: s.to_string(),
        })
    }
}

impl Cli {
    pub fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else {
            Format::Text
        }
    }

    /// Returns the report file, treating an empty path as none.
    pub fn output(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(Path::new)
    }
}
