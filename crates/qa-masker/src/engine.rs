//! Bitfield mask engine.
//!
//! Extracts a bit field from every cell of a [`QaGrid`] and compares it
//! against a target value. The comparison happens with both sides still
//! positioned at the field's offset:
//!
//! ```text
//! bit_mask   = ((1 << length) - 1) << position
//! value_mask = value << position          (not masked)
//! cell       = (code & bit_mask) <op> value_mask
//! ```
//!
//! A `value` larger than the field is shifted as-is. It may collide with
//! neighbouring bits or land above bit 31; such comparisons are well
//! defined and never an error.

use crate::config::MaskerConfig;
use qa_common::{BitField, CompareOp, MaskGrid, QaGrid, Result};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Compute a 0/1 mask for the field at `position`/`length`.
///
/// Fails with `InvalidFieldDescriptor` before touching the grid if the
/// field does not fit a 32-bit code.
pub fn compute_mask(
    grid: &QaGrid,
    position: u32,
    length: u32,
    value: u32,
    op: CompareOp,
) -> Result<MaskGrid> {
    compute_mask_with(grid, position, length, value, op, &MaskerConfig::default())
}

/// [`compute_mask`] with an explicit configuration.
pub fn compute_mask_with(
    grid: &QaGrid,
    position: u32,
    length: u32,
    value: u32,
    op: CompareOp,
    config: &MaskerConfig,
) -> Result<MaskGrid> {
    let field = BitField::new(position, length)?;
    Ok(compute_field_mask(grid, field, value, op, config))
}

/// Compute a 0/1 mask for an already validated field.
pub fn compute_field_mask(
    grid: &QaGrid,
    field: BitField,
    value: u32,
    op: CompareOp,
    config: &MaskerConfig,
) -> MaskGrid {
    debug!(
        position = field.position(),
        length = field.length(),
        value,
        op = %op,
        cells = grid.len(),
        "Computing bitfield mask"
    );
    scan(grid, field.bit_mask(), field.value_mask(value), op, config)
}

/// Single pass over the grid: `out = (code & bit_mask) <op> value_mask`.
///
/// Shared by the single-field and aggregated composite paths.
pub(crate) fn scan(
    grid: &QaGrid,
    bit_mask: u64,
    value_mask: u64,
    op: CompareOp,
    config: &MaskerConfig,
) -> MaskGrid {
    let mut mask = MaskGrid::filled_like(grid, 0);

    if config.use_parallel(grid.len()) {
        // Whole lines per chunk so workers own disjoint line ranges
        let line = grid.order().line_len(grid.width(), grid.height());
        let lines = grid.len() / line;
        let chunk = (lines / rayon::current_num_threads()).max(1) * line;
        trace!(chunk, "Parallel scan");

        mask.data_mut()
            .par_chunks_mut(chunk)
            .zip(grid.data().par_chunks(chunk))
            .for_each(|(out, codes)| scan_into(out, codes, bit_mask, value_mask, op));
    } else {
        scan_into(mask.data_mut(), grid.data(), bit_mask, value_mask, op);
    }

    mask
}

#[inline]
fn scan_into(out: &mut [u8], codes: &[u32], bit_mask: u64, value_mask: u64, op: CompareOp) {
    match op {
        CompareOp::Eq => fill(out, codes, bit_mask, |v| v == value_mask),
        CompareOp::Gt => fill(out, codes, bit_mask, |v| v > value_mask),
        CompareOp::Ge => fill(out, codes, bit_mask, |v| v >= value_mask),
        CompareOp::Lt => fill(out, codes, bit_mask, |v| v < value_mask),
        CompareOp::Le => fill(out, codes, bit_mask, |v| v <= value_mask),
    }
}

#[inline]
fn fill<F: Fn(u64) -> bool>(out: &mut [u8], codes: &[u32], bit_mask: u64, check: F) {
    for (cell, &code) in out.iter_mut().zip(codes) {
        *cell = u8::from(check(u64::from(code) & bit_mask));
    }
}
