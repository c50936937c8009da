//! Test data generators for synthetic QA bands.
//!
//! These generators create predictable, verifiable QA codes that can be
//! used across the test suite.

use qa_common::QaGrid;

/// Values for each Landsat 8 QA field of a single pixel.
///
/// Fields left at zero encode "undefined" confidence and non-fill data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandsatCode {
    pub fill: u32,
    pub water: u32,
    pub vegetation: u32,
    pub snow: u32,
    pub cirrus: u32,
    pub cloud: u32,
}

impl LandsatCode {
    /// Pack the fields into a 16-bit QA code.
    ///
    /// Values are masked to their field width.
    pub fn encode(&self) -> u32 {
        (self.fill & 0x1)
            | (self.water & 0x3) << 4
            | (self.vegetation & 0x3) << 8
            | (self.snow & 0x3) << 10
            | (self.cirrus & 0x3) << 12
            | (self.cloud & 0x3) << 14
    }
}

/// Creates a row-major grid from Landsat field values.
///
/// # Panics
///
/// Panics if `codes.len() != width * height`.
pub fn create_landsat_grid(width: usize, height: usize, codes: &[LandsatCode]) -> QaGrid {
    let data = codes.iter().map(LandsatCode::encode).collect();
    QaGrid::new(width, height, data).expect("codes must fill the grid")
}

/// Creates a grid of pseudo-random 32-bit codes.
///
/// Uses a simple hash-based approach for reproducibility.
pub fn create_random_grid(width: usize, height: usize, seed: u32) -> QaGrid {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(simple_hash(col as u32, row as u32, seed));
        }
    }
    QaGrid::new(width, height, data).expect("generated grid has matching dimensions")
}

/// Creates a grid of pseudo-random Landsat codes (only the defined QA bits).
pub fn create_random_landsat_grid(width: usize, height: usize, seed: u32) -> QaGrid {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            // fill | water | vegetation | snow | cirrus | cloud
            data.push(simple_hash(col as u32, row as u32, seed) & 0xFF31);
        }
    }
    QaGrid::new(width, height, data).expect("generated grid has matching dimensions")
}

/// Creates a grid filled with a constant code.
pub fn create_constant_grid(width: usize, height: usize, code: u32) -> QaGrid {
    QaGrid::new(width, height, vec![code; width * height])
        .expect("generated grid has matching dimensions")
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
