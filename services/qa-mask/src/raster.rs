//! Single-band raster I/O for QA bands and masks.
//!
//! Reads 8- or 16-bit grayscale TIFF/PNG files into a [`QaGrid`] and
//! writes [`MaskGrid`]s back as 8-bit grayscale. GeoTIFF tags found on a
//! TIFF band are returned with it and re-emitted unchanged on a TIFF mask,
//! so the mask lands on the same spot of the map as its source.

use anyhow::{bail, Context, Result};
use image::{DynamicImage, GrayImage, ImageFormat};
use qa_masker::{CellOrder, MaskGrid, QaGrid};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::Path;
use tiff::decoder::Decoder;
use tiff::encoder::{colortype, DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tracing::{debug, info};

pub const MODEL_PIXEL_SCALE: u16 = 33550;
pub const MODEL_TIEPOINT: u16 = 33922;
pub const MODEL_TRANSFORMATION: u16 = 34264;
pub const GEO_KEY_DIRECTORY: u16 = 34735;
pub const GEO_DOUBLE_PARAMS: u16 = 34736;
pub const GEO_ASCII_PARAMS: u16 = 34737;

const GEO_TAG_CODES: [u16; 6] = [
    MODEL_PIXEL_SCALE,
    MODEL_TIEPOINT,
    MODEL_TRANSFORMATION,
    GEO_KEY_DIRECTORY,
    GEO_DOUBLE_PARAMS,
    GEO_ASCII_PARAMS,
];

/// Payload of one GeoTIFF tag.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoValue {
    Doubles(Vec<f64>),
    Shorts(Vec<u16>),
    Ascii(String),
}

/// GeoTIFF tags of a raster, keyed by tag number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTags(BTreeMap<u16, GeoValue>);

impl GeoTags {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, code: u16, value: GeoValue) {
        self.0.insert(code, value);
    }

    fn write_to<W: Write + Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<'_, W, K>,
    ) -> tiff::TiffResult<()> {
        for (code, value) in &self.0 {
            let tag = Tag::from_u16_exhaustive(*code);
            match value {
                GeoValue::Doubles(v) => dir.write_tag(tag, v.as_slice())?,
                GeoValue::Shorts(v) => dir.write_tag(tag, v.as_slice())?,
                GeoValue::Ascii(s) => dir.write_tag(tag, s.as_str())?,
            }
        }
        Ok(())
    }
}

/// A decoded QA band and the georeferencing it came with.
#[derive(Debug, Clone)]
pub struct QaBand {
    pub grid: QaGrid,
    /// Empty for PNG input or an untagged TIFF.
    pub geo: GeoTags,
}

/// Raster format for a path, from its extension.
fn raster_format(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "tif" | "tiff" => Ok(ImageFormat::Tiff),
        "png" => Ok(ImageFormat::Png),
        _ => bail!("unsupported raster format '.{}' for {}", ext, path.display()),
    }
}

/// Read the first band of a QA raster.
pub fn read_qa_band(path: &Path) -> Result<QaBand> {
    let format = raster_format(path)?;
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let img = reader
        .with_guessed_format()
        .with_context(|| format!("failed to read {}", path.display()))?;
    if img.format() != Some(format) {
        bail!(
            "{} does not contain {:?} data (detected {:?})",
            path.display(),
            format,
            img.format()
        );
    }
    let img = img
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let (width, height) = (img.width() as usize, img.height() as usize);
    let grid = match img {
        DynamicImage::ImageLuma16(buf) => QaGrid::from_u16(width, height, buf.as_raw())?,
        DynamicImage::ImageLuma8(buf) => QaGrid::from_u8(width, height, buf.as_raw())?,
        other => bail!(
            "{} has pixel type {:?}; expected a single-band 8- or 16-bit QA raster",
            path.display(),
            other.color()
        ),
    };

    let geo = match format {
        ImageFormat::Tiff => read_geo_tags(path)?,
        _ => GeoTags::default(),
    };

    info!(path = %path.display(), width, height, geo_tags = geo.len(), "Loaded QA band");
    Ok(QaBand { grid, geo })
}

/// Read the GeoTIFF tags of the first image in a TIFF file.
pub fn read_geo_tags(path: &Path) -> Result<GeoTags> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("failed to read TIFF header of {}", path.display()))?;

    let mut tags = GeoTags::default();
    for code in GEO_TAG_CODES {
        let Some(value) = decoder
            .find_tag(Tag::from_u16_exhaustive(code))
            .with_context(|| format!("failed to read tag {} of {}", code, path.display()))?
        else {
            continue;
        };
        let value = match code {
            GEO_KEY_DIRECTORY => GeoValue::Shorts(value.into_u16_vec()?),
            GEO_ASCII_PARAMS => GeoValue::Ascii(value.into_string()?),
            _ => GeoValue::Doubles(value.into_f64_vec()?),
        };
        tags.insert(code, value);
    }

    debug!(path = %path.display(), count = tags.len(), "Read GeoTIFF tags");
    Ok(tags)
}

/// Mask cells in row-major order, as image buffers expect.
fn row_major_bytes(mask: &MaskGrid) -> Vec<u8> {
    match mask.order() {
        CellOrder::RowMajor => mask.data().to_vec(),
        CellOrder::ColumnMajor => {
            let mut data = Vec::with_capacity(mask.len());
            for row in 0..mask.height() {
                for col in 0..mask.width() {
                    data.push(mask.get(col, row).unwrap_or(0));
                }
            }
            data
        }
    }
}

/// Write a mask as an 8-bit single-band raster.
///
/// `geo` is written onto TIFF output; PNG has nowhere to put it.
pub fn write_mask(path: &Path, mask: &MaskGrid, geo: &GeoTags) -> Result<()> {
    let format = raster_format(path)?;
    let data = row_major_bytes(mask);
    let (width, height) = (mask.width() as u32, mask.height() as u32);

    match format {
        ImageFormat::Tiff => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut encoder = TiffEncoder::new(BufWriter::new(file))
                .with_context(|| format!("failed to start TIFF {}", path.display()))?;
            let mut image = encoder
                .new_image::<colortype::Gray8>(width, height)
                .context("failed to start TIFF image")?;
            geo.write_to(image.encoder())
                .context("failed to write GeoTIFF tags")?;
            image
                .write_data(&data)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        _ => {
            if !geo.is_empty() {
                debug!(path = %path.display(), "Dropping GeoTIFF tags for non-TIFF output");
            }
            let img = GrayImage::from_raw(width, height, data)
                .context("mask buffer does not match its dimensions")?;
            img.save_with_format(path, format)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    info!(
        path = %path.display(),
        width = mask.width(),
        height = mask.height(),
        set = mask.count_set(),
        geo_tags = geo.len(),
        "Wrote mask"
    );
    Ok(())
}
