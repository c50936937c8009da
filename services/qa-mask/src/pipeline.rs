//! Read a QA band, compute a mask, write it back.

use crate::raster;
use anyhow::{Context, Result};
use qa_masker::{CompareOp, Condition, MaskGrid, MaskerConfig, QaMasker, SensorProfile};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// What to compute over the band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskRequest {
    /// One condition compared with an operator.
    Single {
        condition: String,
        value: u32,
        op: CompareOp,
    },
    /// Several conditions, all matched exactly.
    Multi(Vec<Condition>),
}

/// Compute `request` over the band at `input` and write the mask to `output`,
/// carrying over the band's georeferencing.
pub fn mask_file(
    input: &Path,
    output: &Path,
    profile: &SensorProfile,
    config: MaskerConfig,
    request: &MaskRequest,
) -> Result<MaskGrid> {
    let band = raster::read_qa_band(input)?;
    let masker = QaMasker::new(&band.grid, profile).with_config(config);

    let start = Instant::now();
    let mask = match request {
        MaskRequest::Single {
            condition,
            value,
            op,
        } => masker
            .condition_mask(condition, *value, *op)
            .with_context(|| format!("failed to compute '{}' mask", condition))?,
        MaskRequest::Multi(conditions) => masker
            .multi_condition_mask(conditions)
            .context("failed to compute composite mask")?,
    };
    info!(
        profile = %profile.name(),
        cells = mask.len(),
        set = mask.count_set(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Computed mask"
    );

    raster::write_mask(output, &mask, &band.geo)?;
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::{landsat_geo_tags, write_geo_band};
    use image::{ImageBuffer, Luma};
    use qa_masker::QaMaskError;
    use tempfile::TempDir;

    fn write_landsat_band(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("LC08_QA.tif");
        let img: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(2, 2, vec![0xC010, 0x0000, 0x4000, 0x3010]).unwrap();
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_single_condition_file() {
        let dir = TempDir::new().unwrap();
        let input = write_landsat_band(&dir);
        let output = dir.path().join("cloud.tif");

        let request = MaskRequest::Single {
            condition: "cloud".to_string(),
            value: 3,
            op: CompareOp::Eq,
        };
        let mask = mask_file(
            &input,
            &output,
            &SensorProfile::landsat8(),
            MaskerConfig::default(),
            &request,
        )
        .unwrap();
        assert_eq!(mask.data(), &[1, 0, 0, 0]);

        let written = image::open(&output).unwrap().into_luma8();
        assert_eq!(written.as_raw(), &vec![1u8, 0, 0, 0]);
    }

    #[test]
    fn test_multi_condition_file() {
        let dir = TempDir::new().unwrap();
        let input = write_landsat_band(&dir);
        let output = dir.path().join("cloud_water.tif");

        let request = MaskRequest::Multi(vec![
            Condition::new("cloud", 3u32),
            Condition::new("water", 1u32),
        ]);
        let mask = mask_file(
            &input,
            &output,
            &SensorProfile::landsat8(),
            MaskerConfig::default(),
            &request,
        )
        .unwrap();
        assert_eq!(mask.data(), &[1, 0, 0, 0]);
    }

    #[test]
    fn test_mask_keeps_georeferencing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("LC08_QA.tif");
        let output = dir.path().join("cloud.tif");
        let geo = landsat_geo_tags();
        write_geo_band(&input, 2, 2, &[0xC010, 0x0000, 0x4000, 0x3010], &geo);

        let request = MaskRequest::Multi(vec![Condition::new("cloud", 3u32)]);
        mask_file(
            &input,
            &output,
            &SensorProfile::landsat8(),
            MaskerConfig::default(),
            &request,
        )
        .unwrap();

        assert_eq!(raster::read_geo_tags(&output).unwrap(), geo);
        let written = image::open(&output).unwrap().into_luma8();
        assert_eq!(written.as_raw(), &vec![1u8, 0, 0, 0]);
    }

    #[test]
    fn test_unknown_condition_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_landsat_band(&dir);
        let output = dir.path().join("never.tif");

        let request = MaskRequest::Single {
            condition: "smoke".to_string(),
            value: 1,
            op: CompareOp::Eq,
        };
        let err = mask_file(
            &input,
            &output,
            &SensorProfile::landsat8(),
            MaskerConfig::default(),
            &request,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QaMaskError>(),
            Some(QaMaskError::UnknownCondition { .. })
        ));
        assert!(!output.exists());
    }
}
