//! Single-band GeoTIFF elevation rasters.
//!
//! # References
//!
//! 1. [GeoTIFF format specification](https://docs.ogc.org/is/19-008r4/19-008r4.html)
//! 1. [GDAL_NODATA tag](https://gdal.org/drivers/raster/gtiff.html#nodata-value)

use crate::{grid::check_single_band, DemError, GeoTransform, Grid, Raster};
use log::{debug, warn};
use num_traits::AsPrimitive;
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};
use tiff::{
    decoder::{Decoder, DecodingResult, Limits},
    tags::Tag,
};

// The decoder files known tag numbers under their named variants, so
// `Tag::Unknown(33550)` and friends never match.
const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const MODEL_TRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

/// Returns the raster read from the GeoTIFF at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Raster, DemError> {
    let file = BufReader::new(File::open(path)?);
    decode(file)
}

/// Returns the raster decoded from any GeoTIFF source.
pub fn decode<R: Read + Seek>(reader: R) -> Result<Raster, DemError> {
    // Drone orthomosaic DSMs are routinely several gigabytes, well
    // past `tiff`'s default buffer limits.
    let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());

    // Checked before decoding so an RGB orthophoto is rejected
    // without reading its pixels.
    let samples_per_pixel = decoder
        .get_tag_u32(Tag::SamplesPerPixel)
        .ok()
        .and_then(|spp| u16::try_from(spp).ok())
        .unwrap_or(1);
    check_single_band(samples_per_pixel)?;

    let (width, height) = decoder.dimensions()?;
    let (cols, rows) = (width as usize, height as usize);
    debug!("GeoTIFF dimensions: {rows} rows x {cols} cols");

    let transform = read_transform(&mut decoder);
    let nodata = read_nodata(&mut decoder);

    let samples = match decoder.read_image()? {
        DecodingResult::U8(buf) => widen(buf),
        DecodingResult::U16(buf) => widen(buf),
        DecodingResult::U32(buf) => widen(buf),
        DecodingResult::U64(buf) => widen(buf),
        DecodingResult::I8(buf) => widen(buf),
        DecodingResult::I16(buf) => widen(buf),
        DecodingResult::I32(buf) => widen(buf),
        DecodingResult::I64(buf) => widen(buf),
        DecodingResult::F32(buf) => widen(buf),
        DecodingResult::F64(buf) => buf,
    };

    let grid = Grid::from_interleaved(rows, cols, samples_per_pixel, samples)?;
    Ok(Raster {
        grid,
        transform,
        nodata,
    })
}

fn widen<T: AsPrimitive<f64>>(buf: Vec<T>) -> Vec<f64> {
    buf.into_iter().map(|v| v.as_()).collect()
}

fn read_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> GeoTransform {
    if let Some(gt) = decoder
        .get_tag_f64_vec(MODEL_TRANSFORMATION)
        .ok()
        .and_then(|matrix| GeoTransform::from_model_transformation(&matrix))
    {
        debug!("geo-transform from ModelTransformationTag: {:?}", gt.0);
        return gt;
    }

    let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE);
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT);
    if let (Ok(scale), Ok(tiepoint)) = (scale, tiepoint) {
        if let Some(gt) = GeoTransform::from_scale_tiepoint(&scale, &tiepoint) {
            debug!("geo-transform from ModelPixelScale/ModelTiepoint: {:?}", gt.0);
            return gt;
        }
    }

    warn!("raster has no geo-referencing, assuming 1x1 unit pixels");
    GeoTransform::default()
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let raw = decoder.get_tag_ascii_string(GDAL_NODATA).ok()?;
    // GDAL pads the value with a trailing NUL.
    raw.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse()
        .ok()
}
