//! Common test fixtures for QA masking tests.
//!
//! This module provides the small hand-checked grids used by the
//! end-to-end scenarios.

use crate::generators::{create_landsat_grid, LandsatCode};
use qa_common::QaGrid;

/// Raw codes of the 2x2 Landsat cloud scenario.
///
/// Cloud fields: `0xC010` = 3 (high), `0x0000` = 0, `0x4000` = 1 (low),
/// `0x3010` = 0.
pub const LANDSAT_CLOUD_CODES: [u32; 4] = [0xC010, 0x0000, 0x4000, 0x3010];

/// Expected `cloud == high` mask for [`LANDSAT_CLOUD_CODES`].
pub const LANDSAT_CLOUD_HIGH_MASK: [u8; 4] = [1, 0, 0, 0];

/// Raw codes of the MODIS quality scenario, one per quality level.
pub const MODIS_QUALITY_CODES: [u32; 4] = [0, 1, 2, 3];

/// 2x2 Landsat grid for the cloud scenario.
pub fn landsat_cloud_grid() -> QaGrid {
    QaGrid::new(2, 2, LANDSAT_CLOUD_CODES.to_vec()).expect("fixture is 2x2")
}

/// 4x1 MODIS grid with quality 0..=3.
pub fn modis_quality_grid() -> QaGrid {
    QaGrid::new(4, 1, MODIS_QUALITY_CODES.to_vec()).expect("fixture is 4x1")
}

/// 2x2 Landsat grid for the cloud-and-water composite scenario.
///
/// Only cell 0 has both `cloud == 3` and `water == 1`. Cell 1 has the
/// cloud only, cell 2 the water only, and cell 3 water at the wrong
/// confidence.
pub fn landsat_cloud_water_grid() -> QaGrid {
    create_landsat_grid(
        2,
        2,
        &[
            LandsatCode {
                cloud: 3,
                water: 1,
                ..Default::default()
            },
            LandsatCode {
                cloud: 3,
                ..Default::default()
            },
            LandsatCode {
                water: 1,
                cirrus: 2,
                ..Default::default()
            },
            LandsatCode {
                cloud: 3,
                water: 2,
                ..Default::default()
            },
        ],
    )
}
