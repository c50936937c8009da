//! QA code grids and the mask grids produced from them.

use crate::error::{QaMaskError, Result};
use serde::{Deserialize, Serialize};

/// Order in which cells are laid out in a flat grid buffer.
///
/// A mask grid always inherits the order of the grid it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellOrder {
    /// Rows are contiguous (x varies fastest).
    #[default]
    RowMajor,
    /// Columns are contiguous (y varies fastest).
    ColumnMajor,
}

impl CellOrder {
    /// Get the 1D buffer index for a (col, row) position.
    #[inline]
    pub fn flat_index(&self, col: usize, row: usize, width: usize, height: usize) -> usize {
        match self {
            Self::RowMajor => row * width + col,
            Self::ColumnMajor => col * height + row,
        }
    }

    /// Length of one contiguous line of cells in the buffer.
    #[inline]
    pub fn line_len(&self, width: usize, height: usize) -> usize {
        match self {
            Self::RowMajor => width,
            Self::ColumnMajor => height,
        }
    }
}

fn check_dimensions(width: usize, height: usize, len: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(QaMaskError::EmptyGrid);
    }
    if width.checked_mul(height) != Some(len) {
        return Err(QaMaskError::DimensionMismatch { width, height, len });
    }
    Ok(())
}

/// A single QA band read in full: `width × height` packed 32-bit codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaGrid {
    width: usize,
    height: usize,
    order: CellOrder,
    data: Vec<u32>,
}

impl QaGrid {
    /// Create a row-major grid.
    pub fn new(width: usize, height: usize, data: Vec<u32>) -> Result<Self> {
        Self::with_order(width, height, CellOrder::RowMajor, data)
    }

    /// Create a grid with an explicit cell order.
    pub fn with_order(
        width: usize,
        height: usize,
        order: CellOrder,
        data: Vec<u32>,
    ) -> Result<Self> {
        check_dimensions(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    /// Create a row-major grid from 16-bit codes (Landsat QA bands are uint16).
    pub fn from_u16(width: usize, height: usize, data: &[u16]) -> Result<Self> {
        Self::new(width, height, data.iter().map(|&v| u32::from(v)).collect())
    }

    /// Create a row-major grid from 8-bit codes (MODIS QA layers are uint8).
    pub fn from_u8(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        Self::new(width, height, data.iter().map(|&v| u32::from(v)).collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> CellOrder {
        self.order
    }

    /// Flat cell buffer in `order()`.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed grid; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Code at (col, row), or None if out of bounds.
    pub fn get(&self, col: usize, row: usize) -> Option<u32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data
            .get(self.order.flat_index(col, row, self.width, self.height))
            .copied()
    }

    /// Consume the grid and return its buffer.
    pub fn into_data(self) -> Vec<u32> {
        self.data
    }
}

/// Per-pixel result of a mask computation, same shape as its source grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskGrid {
    width: usize,
    height: usize,
    order: CellOrder,
    data: Vec<u8>,
}

impl MaskGrid {
    /// Create a mask from raw cells.
    pub fn new(width: usize, height: usize, order: CellOrder, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    /// A mask shaped like `grid` with every cell set to `value`.
    pub fn filled_like(grid: &QaGrid, value: u8) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            order: grid.order,
            data: vec![value; grid.len()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> CellOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable cell buffer, used by the scanners to fill a fresh mask.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at (col, row), or None if out of bounds.
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data
            .get(self.order.flat_index(col, row, self.width, self.height))
            .copied()
    }

    /// Number of non-zero cells.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Whether `other` has the same dimensions and cell order.
    pub fn same_shape(&self, other: &MaskGrid) -> bool {
        self.width == other.width && self.height == other.height && self.order == other.order
    }

    /// Bitwise AND `other` into this mask.
    pub fn and_assign(&mut self, other: &MaskGrid) -> Result<()> {
        if !self.same_shape(other) {
            return Err(QaMaskError::DimensionMismatch {
                width: self.width,
                height: self.height,
                len: other.len(),
            });
        }
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a &= *b;
        }
        Ok(())
    }

    /// Consume the mask and return its buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
