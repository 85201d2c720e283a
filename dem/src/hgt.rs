//! SRTM/NASADEM elevation (`.hgt`) file format.
//!
//! # References
//!
//! 1. [30-Meter SRTM Tile Downloader](https://dwtkns.com/srtm30m)
//! 1. [Archive Team](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

use crate::{DemError, GeoTransform, Grid, Raster};
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::Coord;
use log::debug;
use memmap2::Mmap;
use std::{fs::File, mem::size_of, path::Path};

const ARCSEC_PER_DEG: f64 = 3600.0;

/// Returns the raster read from the height file at `path`.
///
/// The file is memory-mapped only for the duration of this call.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Raster, DemError> {
    let path = path.as_ref();
    let sw_corner = parse_sw_corner(path)?;
    let (resolution, dimensions @ (rows, cols)) = extract_resolution(path)?;
    debug!("HGT tile {sw_corner:?}: {resolution} arcsecond, {rows}x{cols}");

    let samples = {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        decode_samples(&mmap, dimensions)?
    };

    let grid = Grid::new(rows, cols, samples)?;
    Ok(Raster {
        grid,
        transform: transform(sw_corner, resolution),
        nodata: None,
    })
}

fn decode_samples(raw: &[u8], (rows, cols): (usize, usize)) -> Result<Vec<f64>, DemError> {
    let mut samples = Vec::with_capacity(rows * cols);
    for mut bytes in raw.chunks_exact(size_of::<i16>()) {
        samples.push(f64::from(bytes.read_i16::<BE>()?));
    }
    Ok(samples)
}

/// Returns the geo-transform of a tile whose SW-most sample is
/// centered on `sw_corner`.
fn transform(sw_corner: Coord<i16>, resolution: u8) -> GeoTransform {
    let pixel_size = f64::from(resolution) / ARCSEC_PER_DEG;
    let half_pixel = pixel_size / 2.0;
    // Tiles overlap their neighbors by one row and column, so the
    // NW-most sample is centered exactly one degree north.
    let origin = Coord {
        x: f64::from(sw_corner.x) - half_pixel,
        y: f64::from(sw_corner.y) + 1.0 + half_pixel,
    };
    GeoTransform::north_up(origin, pixel_size, pixel_size)
}

/// Returns (arcseconds per sample, (rows, cols)) based on file size.
fn extract_resolution(path: &Path) -> Result<(u8, (usize, usize)), DemError> {
    const RES_1_ARCSECONDS_FILE_LEN: u64 = 3601 * 3601 * size_of::<u16>() as u64;
    const RES_3_ARCSECONDS_FILE_LEN: u64 = 1201 * 1201 * size_of::<u16>() as u64;
    match path.metadata().map(|m| m.len())? {
        RES_1_ARCSECONDS_FILE_LEN => Ok((1, (3601, 3601))),
        RES_3_ARCSECONDS_FILE_LEN => Ok((3, (1201, 1201))),
        invalid_len => Err(DemError::HgtLen(invalid_len, path.to_owned())),
    }
}

fn parse_sw_corner(path: &Path) -> Result<Coord<i16>, DemError> {
    let mk_err = || DemError::HgtName(path.to_owned());
    let name = path
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?;
    if name.len() != 7 || !name.is_ascii() {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" | "n" => 1,
        "S" | "s" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &name[3..4] {
        "E" | "e" => 1,
        "W" | "w" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord { x: lon, y: lat })
}

#[cfg(test)]
mod tests {
    use super::{extract_resolution, load, parse_sw_corner, Coord, DemError};
    use assert_approx_eq::assert_approx_eq;
    use byteorder::{BigEndian as BE, WriteBytesExt};
    use std::{
        fs::File,
        io::{BufWriter, Write},
        path::{Path, PathBuf},
    };

    /// Writes a 3 arc-second tile whose samples are `row * 10 + col % 10`.
    fn write_3_arcsecond_tile(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut wtr = BufWriter::new(File::create(&path).unwrap());
        for row in 0..1201_i16 {
            for col in 0..1201_i16 {
                wtr.write_i16::<BE>(row * 10 + col % 10).unwrap();
            }
        }
        wtr.flush().unwrap();
        path
    }

    #[test]
    fn test_parse_hgt_name() {
        assert_eq!(
            parse_sw_corner(Path::new("N44W072.hgt")).unwrap(),
            Coord { x: -72, y: 44 }
        );
        assert_eq!(
            parse_sw_corner(Path::new("s01e010.hgt")).unwrap(),
            Coord { x: 10, y: -1 }
        );
        assert!(matches!(
            parse_sw_corner(Path::new("dsm.hgt")),
            Err(DemError::HgtName(_))
        ));
        assert!(matches!(
            parse_sw_corner(Path::new("X44W072.hgt")),
            Err(DemError::HgtName(_))
        ));
    }

    #[test]
    fn test_load_tile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_3_arcsecond_tile(dir.path(), "N44W072.hgt");
        assert_eq!(extract_resolution(&path).unwrap(), (3, (1201, 1201)));

        let raster = load(&path).unwrap();
        assert_eq!(raster.grid.rows(), 1201);
        assert_eq!(raster.grid.cols(), 1201);
        assert_eq!(raster.grid.get(0, 0), Some(0.0));
        assert_eq!(raster.grid.get(0, 7), Some(7.0));
        assert_eq!(raster.grid.get(1200, 13), Some(12003.0));
        assert_eq!(raster.nodata, None);

        let gt = raster.transform;
        assert_approx_eq!(gt.pixel_width(), 3.0 / 3600.0);
        assert_approx_eq!(gt.pixel_height(), 3.0 / 3600.0);
        assert_approx_eq!(gt.origin().x, -72.000_416_666_666_67);
        assert_approx_eq!(gt.origin().y, 45.000_416_666_666_67);
    }

    #[test]
    fn test_invalid_len() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("N44W072.hgt");
        File::create(&path).unwrap().write_all(&[0; 10]).unwrap();
        assert!(matches!(load(&path), Err(DemError::HgtLen(10, _))));
    }
}
