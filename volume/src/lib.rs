//! # DEM volume estimation
//!
//! `volume` measures how much material sits above a floor elevation in
//! a single-band elevation grid, and renders the result as a report.

mod error;
mod estimate;
mod report;

pub use crate::{
    error::VolumeError,
    estimate::{estimate, Estimate, EstimateBuilder},
    report::{Format, Report},
};
pub use dem;
