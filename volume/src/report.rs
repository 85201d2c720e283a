use crate::{Estimate, VolumeError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::{
    fmt,
    fs::OpenOptions,
    io::Write,
    path::Path,
};

const RULE: &str = "=====================================";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// How a [`Report`] is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Labeled multi-line text block.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Summary of one volume calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub floor: f64,
    /// Floor as the user wrote it, echoed verbatim in the text block.
    #[serde(skip)]
    pub floor_text: String,
    pub input: String,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub total_pixels: usize,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub total_volume: f64,
}

impl Report {
    /// Returns a report for `estimate`.
    ///
    /// Fails if the estimate saw no valid samples.
    pub fn new(
        input: impl Into<String>,
        started: DateTime<Local>,
        finished: DateTime<Local>,
        estimate: &Estimate,
    ) -> Result<Self, VolumeError> {
        let (min_elevation, max_elevation) = estimate.range()?;
        Ok(Self {
            floor: estimate.floor,
            floor_text: format!("{:?}", estimate.floor),
            input: input.into(),
            started,
            finished,
            pixel_width: estimate.pixel_width,
            pixel_height: estimate.pixel_height,
            total_pixels: estimate.total_pixels,
            min_elevation,
            max_elevation,
            total_volume: estimate.total_volume,
        })
    }

    /// Echo `text` on the floor line instead of the parsed value.
    #[must_use]
    pub fn with_floor_text(mut self, text: impl Into<String>) -> Self {
        self.floor_text = text.into();
        self
    }

    /// Returns this report rendered as `format`, newline terminated.
    pub fn render(&self, format: Format) -> Result<String, VolumeError> {
        match format {
            Format::Text => Ok(self.to_string()),
            Format::Json => {
                let mut json = serde_json::to_string(self)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Appends this report to the file at `path`, creating it if
    /// needed.
    pub fn append_to<P: AsRef<Path>>(&self, path: P, format: Format) -> Result<(), VolumeError> {
        let rendered = self.render(format)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the trailing `.0` on integral floats.
        writeln!(f, "{RULE}")?;
        writeln!(f, "Floor set as: {}", self.floor_text)?;
        writeln!(f, "Input data: {}", self.input)?;
        writeln!(f, "Start time: {}", self.started.format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Finish time: {}", self.finished.format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Pixel width: {:?} m", self.pixel_width)?;
        writeln!(f, "Pixel height: {:?} m", self.pixel_height)?;
        writeln!(f, "Total pixels read: {}", self.total_pixels)?;
        writeln!(f, "Min elev read: {:?} m", self.min_elevation)?;
        writeln!(f, "Max elev read: {:?} m", self.max_elevation)?;
        writeln!(f, "Total calculated volume: {:?} m^3", self.total_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::{Format, Report, VolumeError};
    use crate::estimate;
    use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
    use dem::{Grid, NODATA};
    use std::fs;

    fn start_time() -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    fn sample_report() -> Report {
        let grid = Grid::new(2, 2, vec![5.0, NODATA, 3.0, 8.0]).unwrap();
        let est = estimate(&grid, 1.0, 0.5, 0.0).unwrap();
        let started = start_time();
        let finished = started + Duration::milliseconds(1500);
        Report::new("stockpile.tif", started, finished, &est).unwrap()
    }

    #[test]
    fn test_text_layout() {
        let expected = "\
=====================================
Floor set as: 0.0
Input data: stockpile.tif
Start time: 2024-05-01 09:30:00.000000
Finish time: 2024-05-01 09:30:01.500000
Pixel width: 1.0 m
Pixel height: 0.5 m
Total pixels read: 4
Min elev read: 3.0 m
Max elev read: 8.0 m
Total calculated volume: 16.0 m^3
";
        assert_eq!(sample_report().render(Format::Text).unwrap(), expected);
    }

    #[test]
    fn test_floor_text_echoed_verbatim() {
        let report = sample_report().with_floor_text("10");
        let rendered = report.render(Format::Text).unwrap();
        assert!(rendered.contains("\nFloor set as: 10\n"));

        let json: serde_json::Value =
            serde_json::from_str(&report.render(Format::Json).unwrap()).unwrap();
        assert_eq!(json["floor"], 0.0);
        assert!(json.get("floor_text").is_none());
    }

    #[test]
    fn test_json() {
        let rendered = sample_report().render(Format::Json).unwrap();
        assert!(rendered.ends_with('\n'));
        assert_eq!(rendered.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["input"], "stockpile.tif");
        assert_eq!(json["total_pixels"], 4);
        assert_eq!(json["min_elevation"], 3.0);
        assert_eq!(json["max_elevation"], 8.0);
        assert_eq!(json["total_volume"], 16.0);
    }

    #[test]
    fn test_degenerate_estimate_has_no_report() {
        let grid = Grid::new(2, 2, vec![NODATA; 4]).unwrap();
        let est = estimate(&grid, 1.0, 1.0, 0.0).unwrap();
        let started = start_time();
        assert!(matches!(
            Report::new("empty.tif", started, started, &est),
            Err(VolumeError::NoValidSamples(4))
        ));
    }

    #[test]
    fn test_append_preserves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volumes.txt");
        fs::write(&path, "previous run\n").unwrap();

        let report = sample_report();
        report.append_to(&path, Format::Text).unwrap();
        report.append_to(&path, Format::Text).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("previous run\n"));
        assert_eq!(contents.matches("Total calculated volume: 16.0 m^3").count(), 2);
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.jsonl");
        sample_report().append_to(&path, Format::Json).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
